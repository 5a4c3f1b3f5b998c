//! # Domain Models
//!
//! Records and identifiers shared by the host platform and the adapter.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`HistoryRequest`] | Symbol/exchange/interval/range query |
//! | [`BarData`] | OHLCV bar with open interest |
//! | [`TickData`] | Level-1 tick snapshot |
//! | [`Symbol`] | Exchange-local ticker, case preserved |
//! | [`Exchange`] | Exchange code with its UTC offset |
//! | [`Interval`] | Bar interval (1m, 1h, d, w, tick) |
//! | [`ExchangeDateTime`] | Timestamp zoned to the exchange clock |
//!
//! ## Timestamps
//!
//! Query bounds are naive [`time::PrimitiveDateTime`] values read on the
//! exchange's clock. Records carry an [`ExchangeDateTime`], an instant with
//! the exchange offset (UTC+08:00) attached.

mod exchange;
mod interval;
mod models;
mod symbol;
mod timestamp;

pub use exchange::Exchange;
pub use interval::Interval;
pub use models::{BarData, HistoryRequest, TickData};
pub use symbol::Symbol;
pub use timestamp::{format_local_datetime, parse_local_datetime, ExchangeDateTime, CHINA_OFFSET};
