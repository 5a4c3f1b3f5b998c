//! # tqfeed core
//!
//! Historical bar and tick datafeed for a vnpy-style trading platform, backed
//! by the TianQin (tqsdk) market-data SDK.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | The TianQin datafeed and the CSV replay transport |
//! | [`datafeed`] | `Datafeed` trait, output sink, adapter errors |
//! | [`domain`] | Requests, bar/tick records, symbols, exchanges, timestamps |
//! | [`envelope`] | Output envelope with metadata |
//! | [`error`] | Validation errors |
//! | [`sdk`] | SDK collaborator traits and tabular frames |
//! | [`settings`] | `datafeed.*` settings and credential overrides |
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use tqfeed_core::{
//!     log_output, Datafeed, Exchange, HistoryRequest, Interval, ReplayConnector, Settings,
//!     Symbol, TqsdkDatafeed,
//! };
//! use time::macros::datetime;
//!
//! let settings = Settings::new("trader", "secret");
//! let feed = TqsdkDatafeed::new(&settings, Arc::new(ReplayConnector::new("./exports")));
//!
//! let req = HistoryRequest::new(
//!     Symbol::parse("cu1805")?,
//!     Exchange::Shfe,
//!     Interval::Minute,
//!     datetime!(2018-01-01 06:00),
//!     datetime!(2018-06-01 16:00),
//! )?;
//!
//! match feed.query_bar_history(&req, &mut log_output) {
//!     Some(bars) => println!("{} bars", bars.len()),
//!     None => eprintln!("query could not be executed"),
//! }
//! # Ok::<(), tqfeed_core::ValidationError>(())
//! ```
//!
//! ## Flow
//!
//! ```text
//! HistoryRequest ──▶ TqsdkDatafeed ──connect──▶ TqConnector
//!                         │                        │
//!                         │◀──── one fetch ──── TqSession ── close
//!                         ▼
//!              Vec<BarData> / Vec<TickData>
//! ```
//!
//! ## Security
//!
//! The datafeed password is redacted from every `Debug` rendering and never logged.

pub mod adapters;
pub mod datafeed;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod sdk;
pub mod settings;

pub use adapters::{
    bar_duration_seconds, fetch_end, tq_symbol, ReplayConnector, TqsdkDatafeed, GATEWAY_NAME,
    TICK_DURATION_SECONDS,
};
pub use datafeed::{log_output, Datafeed, DatafeedError, HistoryKind, Output};
pub use domain::{
    format_local_datetime, parse_local_datetime, BarData, Exchange, ExchangeDateTime,
    HistoryRequest, Interval, Symbol, TickData, CHINA_OFFSET,
};
pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta};
pub use error::ValidationError;
pub use sdk::{
    Frame, KlineFrame, KlineRow, NoopConnector, SdkError, TickFrame, TickRow, TqAuth,
    TqConnector, TqSession,
};
pub use settings::{Settings, SettingsError};
