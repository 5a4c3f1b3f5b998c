//! Datafeed adapters and SDK transports.
//!
//! | Type | Role |
//! |------|------|
//! | [`TqsdkDatafeed`] | [`Datafeed`](crate::Datafeed) over any [`TqConnector`](crate::TqConnector) |
//! | [`ReplayConnector`] | SDK transport reading CSV exports from disk |

mod replay;
mod tqsdk;

pub use replay::ReplayConnector;
pub use tqsdk::{
    bar_duration_seconds, fetch_end, tq_symbol, TqsdkDatafeed, GATEWAY_NAME,
    TICK_DURATION_SECONDS,
};
