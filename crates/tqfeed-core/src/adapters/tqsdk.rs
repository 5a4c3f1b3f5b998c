use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use time::{Duration, PrimitiveDateTime};
use tracing::{debug, error, info, warn};

use crate::datafeed::{Datafeed, DatafeedError, HistoryKind, Output};
use crate::sdk::{KlineRow, NoopConnector, TickRow, TqAuth, TqConnector, TqSession};
use crate::settings::Settings;
use crate::{BarData, ExchangeDateTime, HistoryRequest, Interval, TickData, ValidationError};

/// Source tag stamped on every record produced by this adapter.
pub const GATEWAY_NAME: &str = "TQ";

/// Duration the SDK uses for tick series.
pub const TICK_DURATION_SECONDS: u32 = 0;

/// SDK duration for bar intervals. `None` means bar history is not served.
pub const fn bar_duration_seconds(interval: Interval) -> Option<u32> {
    match interval {
        Interval::Minute => Some(60),
        Interval::Hour => Some(60 * 60),
        Interval::Daily => Some(60 * 60 * 24),
        Interval::Weekly | Interval::Tick => None,
    }
}

/// SDK instrument id, `"{EXCHANGE}.{symbol}"`.
pub fn tq_symbol(req: &HistoryRequest) -> String {
    format!("{}.{}", req.exchange, req.symbol)
}

/// Exclusive upper bound handed to the SDK.
///
/// One calendar day past the query end, so night-session rows filed under the
/// last requested trading day are not cut off.
pub fn fetch_end(end: PrimitiveDateTime) -> PrimitiveDateTime {
    end.saturating_add(Duration::days(1))
}

/// TianQin datafeed.
///
/// Every query opens its own session, issues exactly one fetch and closes the
/// session before converting rows. SDK timestamps are epoch nanoseconds of the
/// bar start; records carry that instant on the exchange clock (UTC+08:00).
#[derive(Clone)]
pub struct TqsdkDatafeed {
    auth: TqAuth,
    connector: Arc<dyn TqConnector>,
}

impl Default for TqsdkDatafeed {
    fn default() -> Self {
        Self {
            auth: TqAuth::new("", ""),
            connector: Arc::new(NoopConnector),
        }
    }
}

impl TqsdkDatafeed {
    pub fn new(settings: &Settings, connector: Arc<dyn TqConnector>) -> Self {
        Self {
            auth: settings.auth(),
            connector,
        }
    }

    pub fn with_credentials(
        username: impl Into<String>,
        password: impl Into<String>,
        connector: Arc<dyn TqConnector>,
    ) -> Self {
        Self {
            auth: TqAuth::new(username, password),
            connector,
        }
    }

    pub fn username(&self) -> &str {
        self.auth.username()
    }

    /// Opens and immediately closes a session to validate the credentials.
    pub fn try_init(&self) -> Result<(), DatafeedError> {
        let _session = self.open_session()?;
        Ok(())
    }

    pub fn try_query_bar_history(
        &self,
        req: &HistoryRequest,
    ) -> Result<Vec<BarData>, DatafeedError> {
        let duration = bar_duration_seconds(req.interval).ok_or(
            DatafeedError::UnsupportedInterval {
                kind: HistoryKind::Bar,
                interval: req.interval,
            },
        )?;

        let symbol = tq_symbol(req);
        let end = fetch_end(req.end);
        let mut session = self.open_session()?;
        debug!(%symbol, duration, start = %req.start, %end, "fetching kline series");
        let fetched = session.get_kline_data_series(&symbol, duration, req.start, end);
        drop(session);

        let frame = fetched.map_err(|source| DatafeedError::Fetch {
            symbol: symbol.clone(),
            source,
        })?;

        let Some(frame) = frame else {
            info!(%symbol, "kline fetch returned no table");
            return Ok(Vec::new());
        };

        let bars = frame
            .into_iter()
            .enumerate()
            .map(|(row, kline)| {
                build_bar(req, kline).map_err(|source| DatafeedError::InvalidRow {
                    symbol: symbol.clone(),
                    row,
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        info!(%symbol, interval = %req.interval, count = bars.len(), "bar history loaded");
        Ok(bars)
    }

    pub fn try_query_tick_history(
        &self,
        req: &HistoryRequest,
    ) -> Result<Vec<TickData>, DatafeedError> {
        if req.interval != Interval::Tick {
            return Err(DatafeedError::UnsupportedInterval {
                kind: HistoryKind::Tick,
                interval: req.interval,
            });
        }

        let symbol = tq_symbol(req);
        let end = fetch_end(req.end);
        let mut session = self.open_session()?;
        debug!(%symbol, start = %req.start, %end, "fetching tick series");
        let fetched = session.get_tick_data_series(&symbol, req.start, end);
        drop(session);

        let frame = fetched.map_err(|source| DatafeedError::Fetch {
            symbol: symbol.clone(),
            source,
        })?;

        let Some(frame) = frame else {
            info!(%symbol, "tick fetch returned no table");
            return Ok(Vec::new());
        };

        let ticks = frame
            .into_iter()
            .enumerate()
            .map(|(row, tick)| {
                build_tick(req, tick).map_err(|source| DatafeedError::InvalidRow {
                    symbol: symbol.clone(),
                    row,
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        info!(%symbol, count = ticks.len(), "tick history loaded");
        Ok(ticks)
    }

    fn open_session(&self) -> Result<SessionGuard, DatafeedError> {
        if !self.auth.is_complete() {
            return Err(DatafeedError::MissingCredentials);
        }

        let session = self
            .connector
            .connect(&self.auth)
            .map_err(DatafeedError::Connection)?;
        debug!(username = self.auth.username(), "session opened");
        Ok(SessionGuard { inner: session })
    }
}

impl Datafeed for TqsdkDatafeed {
    fn init(&self, output: Output<'_>) -> bool {
        match self.try_init() {
            Ok(()) => {
                info!(username = self.auth.username(), "datafeed initialised");
                true
            }
            Err(error) => {
                report(&error, output);
                false
            }
        }
    }

    fn query_bar_history(
        &self,
        req: &HistoryRequest,
        output: Output<'_>,
    ) -> Option<Vec<BarData>> {
        settle(self.try_query_bar_history(req), output)
    }

    fn query_tick_history(
        &self,
        req: &HistoryRequest,
        output: Output<'_>,
    ) -> Option<Vec<TickData>> {
        settle(self.try_query_tick_history(req), output)
    }
}

/// Owns an open session and closes it when dropped, on every exit path.
struct SessionGuard {
    inner: Box<dyn TqSession>,
}

impl Deref for SessionGuard {
    type Target = dyn TqSession;

    fn deref(&self) -> &Self::Target {
        self.inner.as_ref()
    }
}

impl DerefMut for SessionGuard {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.inner.as_mut()
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.inner.close();
        debug!("session closed");
    }
}

fn settle<T>(result: Result<Vec<T>, DatafeedError>, output: Output<'_>) -> Option<Vec<T>> {
    match result {
        Ok(records) => Some(records),
        Err(error) if error.is_rejection() => {
            report(&error, output);
            Some(Vec::new())
        }
        Err(error) => {
            report(&error, output);
            None
        }
    }
}

fn report(error: &DatafeedError, output: Output<'_>) {
    if error.is_rejection() {
        warn!(code = error.code(), "{error}");
    } else {
        error!(code = error.code(), "{error}");
    }
    output(&error.to_string());
}

fn build_bar(req: &HistoryRequest, row: KlineRow) -> Result<BarData, ValidationError> {
    let datetime =
        ExchangeDateTime::from_epoch_nanos(i128::from(row.datetime), req.exchange.utc_offset())?;

    Ok(BarData {
        symbol: req.symbol.clone(),
        exchange: req.exchange,
        interval: req.interval,
        datetime,
        open_price: row.open,
        high_price: row.high,
        low_price: row.low,
        close_price: row.close,
        volume: row.volume,
        turnover: 0.0,
        open_interest: row.open_oi,
        gateway_name: String::from(GATEWAY_NAME),
    })
}

fn build_tick(req: &HistoryRequest, row: TickRow) -> Result<TickData, ValidationError> {
    let datetime =
        ExchangeDateTime::from_epoch_nanos(i128::from(row.datetime), req.exchange.utc_offset())?;

    Ok(TickData {
        symbol: req.symbol.clone(),
        exchange: req.exchange,
        datetime,
        last_price: row.last_price,
        high_price: row.highest,
        low_price: row.lowest,
        volume: row.volume,
        turnover: row.amount,
        open_interest: row.open_interest,
        bid_price_1: row.bid_price1,
        bid_volume_1: row.bid_volume1,
        ask_price_1: row.ask_price1,
        ask_volume_1: row.ask_volume1,
        gateway_name: String::from(GATEWAY_NAME),
    })
}
