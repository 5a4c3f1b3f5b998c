//! Market-data SDK collaborator contract.
//!
//! The adapter never talks to the network itself. It asks a [`TqConnector`]
//! for an authenticated [`TqSession`], issues one tabular fetch and closes the
//! session. Transports plug in behind these traits: the offline
//! [`ReplayConnector`](crate::adapters::ReplayConnector), test doubles, or a
//! binding to the vendor SDK.

use std::fmt::{Debug, Formatter};

use thiserror::Error;
use time::PrimitiveDateTime;

/// Credentials presented when a session is opened.
#[derive(Clone, PartialEq, Eq)]
pub struct TqAuth {
    username: String,
    password: String,
}

impl TqAuth {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn is_complete(&self) -> bool {
        !self.username.trim().is_empty() && !self.password.is_empty()
    }
}

impl Debug for TqAuth {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TqAuth")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Failure reported by the SDK.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SdkError {
    #[error("authentication rejected: {0}")]
    Authentication(String),
    #[error("connection failed: {0}")]
    Connection(String),
    #[error("fetch failed: {0}")]
    Fetch(String),
    #[error("malformed data at line {line}: {message}")]
    Data { line: usize, message: String },
}

/// One kline row. `datetime` is the bar start in nanoseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KlineRow {
    pub datetime: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub open_oi: f64,
    pub close_oi: f64,
}

/// One tick row. `datetime` is nanoseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickRow {
    pub datetime: i64,
    pub last_price: f64,
    pub highest: f64,
    pub lowest: f64,
    pub bid_price1: f64,
    pub bid_volume1: f64,
    pub ask_price1: f64,
    pub ask_volume1: f64,
    pub volume: f64,
    pub amount: f64,
    pub open_interest: f64,
}

/// Ordered table returned by a fetch, oldest row first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame<R> {
    rows: Vec<R>,
}

pub type KlineFrame = Frame<KlineRow>;
pub type TickFrame = Frame<TickRow>;

impl<R> Frame<R> {
    pub fn new(rows: Vec<R>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<R> IntoIterator for Frame<R> {
    type Item = R;
    type IntoIter = std::vec::IntoIter<R>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

/// Opens authenticated sessions.
pub trait TqConnector: Send + Sync {
    fn connect(&self, auth: &TqAuth) -> Result<Box<dyn TqSession>, SdkError>;
}

/// An open SDK session. Not safe for concurrent use; one query owns it.
///
/// `start`/`end` are naive exchange-local bounds, `end` exclusive. A fetch may
/// return `Ok(None)` in place of an empty table.
pub trait TqSession {
    fn get_kline_data_series(
        &mut self,
        symbol: &str,
        duration_seconds: u32,
        start: PrimitiveDateTime,
        end: PrimitiveDateTime,
    ) -> Result<Option<KlineFrame>, SdkError>;

    fn get_tick_data_series(
        &mut self,
        symbol: &str,
        start: PrimitiveDateTime,
        end: PrimitiveDateTime,
    ) -> Result<Option<TickFrame>, SdkError>;

    fn close(&mut self);
}

/// Connector used when no transport is configured; every connect fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopConnector;

impl TqConnector for NoopConnector {
    fn connect(&self, _auth: &TqAuth) -> Result<Box<dyn TqSession>, SdkError> {
        Err(SdkError::Connection(String::from(
            "no SDK transport is configured",
        )))
    }
}
