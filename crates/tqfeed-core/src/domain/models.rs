use serde::{Deserialize, Serialize};
use time::PrimitiveDateTime;

use super::timestamp::format_local_datetime;
use crate::{Exchange, ExchangeDateTime, Interval, Symbol, ValidationError};

/// Historical data query issued by the host platform.
///
/// `start` and `end` are naive wall-clock values on the exchange's clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRequest {
    pub symbol: Symbol,
    pub exchange: Exchange,
    pub interval: Interval,
    pub start: PrimitiveDateTime,
    pub end: PrimitiveDateTime,
}

impl HistoryRequest {
    pub fn new(
        symbol: Symbol,
        exchange: Exchange,
        interval: Interval,
        start: PrimitiveDateTime,
        end: PrimitiveDateTime,
    ) -> Result<Self, ValidationError> {
        if end < start {
            return Err(ValidationError::InvertedRange {
                start: format_local_datetime(start),
                end: format_local_datetime(end),
            });
        }

        Ok(Self {
            symbol,
            exchange,
            interval,
            start,
            end,
        })
    }

    pub fn vt_symbol(&self) -> String {
        vt_symbol(&self.symbol, self.exchange)
    }
}

/// Candlestick record in the host platform's shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarData {
    pub symbol: Symbol,
    pub exchange: Exchange,
    pub interval: Interval,
    pub datetime: ExchangeDateTime,
    pub open_price: f64,
    pub high_price: f64,
    pub low_price: f64,
    pub close_price: f64,
    pub volume: f64,
    pub turnover: f64,
    pub open_interest: f64,
    pub gateway_name: String,
}

impl BarData {
    pub fn vt_symbol(&self) -> String {
        vt_symbol(&self.symbol, self.exchange)
    }
}

/// Level-1 tick record in the host platform's shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickData {
    pub symbol: Symbol,
    pub exchange: Exchange,
    pub datetime: ExchangeDateTime,
    pub last_price: f64,
    pub high_price: f64,
    pub low_price: f64,
    pub volume: f64,
    pub turnover: f64,
    pub open_interest: f64,
    pub bid_price_1: f64,
    pub bid_volume_1: f64,
    pub ask_price_1: f64,
    pub ask_volume_1: f64,
    pub gateway_name: String,
}

impl TickData {
    pub fn vt_symbol(&self) -> String {
        vt_symbol(&self.symbol, self.exchange)
    }
}

fn vt_symbol(symbol: &Symbol, exchange: Exchange) -> String {
    format!("{symbol}.{exchange}")
}
