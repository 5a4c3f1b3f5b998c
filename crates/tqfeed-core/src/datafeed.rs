//! Datafeed trait and adapter-level errors.
//!
//! # Operations
//!
//! | Operation | Request | Response |
//! |-----------|---------|----------|
//! | [`init`](Datafeed::init) | - | `bool` |
//! | [`query_bar_history`](Datafeed::query_bar_history) | [`HistoryRequest`] | `Option<Vec<BarData>>` |
//! | [`query_tick_history`](Datafeed::query_tick_history) | [`HistoryRequest`] | `Option<Vec<TickData>>` |
//!
//! # Result semantics
//!
//! Queries never return an error to the caller. Failures are written to the
//! `output` sink and collapse into one of two values:
//!
//! - `None`: the query could not be executed (credentials, connection, fetch).
//! - `Some(vec![])`: the query ran, or was rejected as a no-op, and produced no rows.

use std::fmt::{Display, Formatter};

use thiserror::Error;

use crate::sdk::SdkError;
use crate::{BarData, HistoryRequest, Interval, TickData, ValidationError};

/// Sink for human-readable diagnostics, in the manner of the host platform's `output` callback.
pub type Output<'a> = &'a mut dyn FnMut(&str);

/// Output sink that forwards diagnostics to `tracing`.
pub fn log_output(message: &str) {
    tracing::info!(target: "tqfeed::output", "{message}");
}

/// Historical data service consumed by the host platform.
///
/// Implementations must be `Send + Sync`; each call is synchronous and owns
/// whatever upstream session it opens.
pub trait Datafeed: Send + Sync {
    /// Verifies that the service is usable. Keeps no session open afterwards.
    fn init(&self, output: Output<'_>) -> bool {
        let _ = output;
        true
    }

    /// Queries bars for the request range, oldest first.
    fn query_bar_history(&self, req: &HistoryRequest, output: Output<'_>)
        -> Option<Vec<BarData>>;

    /// Queries ticks for the request range, oldest first.
    fn query_tick_history(
        &self,
        req: &HistoryRequest,
        output: Output<'_>,
    ) -> Option<Vec<TickData>> {
        output(&format!(
            "tick history for {} is not supported by this datafeed",
            req.vt_symbol()
        ));
        Some(Vec::new())
    }
}

/// Which history endpoint an error was raised by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryKind {
    Bar,
    Tick,
}

impl HistoryKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bar => "bar",
            Self::Tick => "tick",
        }
    }
}

impl Display for HistoryKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Adapter-internal failure classification.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DatafeedError {
    #[error("{kind} history does not support interval '{interval}'")]
    UnsupportedInterval { kind: HistoryKind, interval: Interval },

    #[error("datafeed username or password is not configured")]
    MissingCredentials,

    #[error("failed to open datafeed session: {0}")]
    Connection(SdkError),

    #[error("failed to fetch '{symbol}': {source}")]
    Fetch { symbol: String, source: SdkError },

    #[error("row {row} of '{symbol}' is invalid: {source}")]
    InvalidRow {
        symbol: String,
        row: usize,
        source: ValidationError,
    },
}

impl DatafeedError {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::UnsupportedInterval { .. } => "datafeed.unsupported_interval",
            Self::MissingCredentials => "datafeed.missing_credentials",
            Self::Connection(_) => "datafeed.connection",
            Self::Fetch { .. } => "datafeed.fetch",
            Self::InvalidRow { .. } => "datafeed.invalid_row",
        }
    }

    /// `true` when the request was a no-op rather than a failed attempt.
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::UnsupportedInterval { .. })
    }
}
