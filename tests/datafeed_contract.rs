//! Contract tests for the `Datafeed` surface of `TqsdkDatafeed`.
//!
//! The SDK is replaced by a scripted connector so every test can assert on the
//! exact sequence of session calls the adapter makes.

use std::sync::{Arc, Mutex};

use time::macros::datetime;
use time::PrimitiveDateTime;
use tqfeed_core::{
    Datafeed, Exchange, HistoryRequest, Interval, KlineFrame, KlineRow, SdkError, Settings,
    Symbol, TickFrame, TickRow, TqAuth, TqConnector, TqSession, TqsdkDatafeed, CHINA_OFFSET,
    GATEWAY_NAME,
};

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Connect,
    Fetch {
        symbol: String,
        duration: Option<u32>,
        end: PrimitiveDateTime,
    },
    Close,
}

#[derive(Clone)]
enum Script {
    Klines(Result<Option<Vec<KlineRow>>, SdkError>),
    Ticks(Result<Option<Vec<TickRow>>, SdkError>),
    RefuseConnect,
}

struct ScriptedConnector {
    script: Script,
    events: Arc<Mutex<Vec<Event>>>,
}

impl ScriptedConnector {
    fn new(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script,
            events: Arc::new(Mutex::new(Vec::new())),
        })
    }

    fn events(&self) -> Vec<Event> {
        self.events.lock().expect("events lock").clone()
    }
}

impl TqConnector for ScriptedConnector {
    fn connect(&self, _auth: &TqAuth) -> Result<Box<dyn TqSession>, SdkError> {
        self.events.lock().expect("events lock").push(Event::Connect);
        if matches!(self.script, Script::RefuseConnect) {
            return Err(SdkError::Authentication(String::from("bad credentials")));
        }
        Ok(Box::new(ScriptedSession {
            script: self.script.clone(),
            events: Arc::clone(&self.events),
        }))
    }
}

struct ScriptedSession {
    script: Script,
    events: Arc<Mutex<Vec<Event>>>,
}

impl ScriptedSession {
    fn record(&self, event: Event) {
        self.events.lock().expect("events lock").push(event);
    }
}

impl TqSession for ScriptedSession {
    fn get_kline_data_series(
        &mut self,
        symbol: &str,
        duration_seconds: u32,
        _start: PrimitiveDateTime,
        end: PrimitiveDateTime,
    ) -> Result<Option<KlineFrame>, SdkError> {
        self.record(Event::Fetch {
            symbol: symbol.to_owned(),
            duration: Some(duration_seconds),
            end,
        });
        match &self.script {
            Script::Klines(reply) => reply.clone().map(|rows| rows.map(KlineFrame::new)),
            _ => Ok(None),
        }
    }

    fn get_tick_data_series(
        &mut self,
        symbol: &str,
        _start: PrimitiveDateTime,
        end: PrimitiveDateTime,
    ) -> Result<Option<TickFrame>, SdkError> {
        self.record(Event::Fetch {
            symbol: symbol.to_owned(),
            duration: None,
            end,
        });
        match &self.script {
            Script::Ticks(reply) => reply.clone().map(|rows| rows.map(TickFrame::new)),
            _ => Ok(None),
        }
    }

    fn close(&mut self) {
        self.record(Event::Close);
    }
}

fn request(interval: Interval) -> HistoryRequest {
    HistoryRequest::new(
        Symbol::parse("cu1805").expect("valid symbol"),
        Exchange::Shfe,
        interval,
        datetime!(2018-01-01 06:00),
        datetime!(2018-06-01 16:00),
    )
    .expect("valid request")
}

fn feed(connector: &Arc<ScriptedConnector>) -> TqsdkDatafeed {
    let settings = Settings::new("trader", "secret");
    TqsdkDatafeed::new(&settings, Arc::clone(connector) as Arc<dyn TqConnector>)
}

fn kline(seconds: i64, close: f64) -> KlineRow {
    KlineRow {
        datetime: seconds * 1_000_000_000,
        open: close - 10.0,
        high: close + 20.0,
        low: close - 20.0,
        close,
        volume: 5.0,
        open_oi: 30_000.0,
        close_oi: 30_010.0,
    }
}

// =============================================================================
// Bar history
// =============================================================================

#[test]
fn when_sdk_returns_three_klines_system_builds_three_minute_bars() {
    // Given: an SDK holding three one-minute rows for SHFE.cu1805
    let connector = ScriptedConnector::new(Script::Klines(Ok(Some(vec![
        kline(1_514_854_800, 56_010.0),
        kline(1_514_854_860, 56_020.0),
        kline(1_514_854_920, 56_030.0),
    ]))));

    // When: the platform asks for minute bars
    let mut messages = Vec::new();
    let bars = feed(&connector)
        .query_bar_history(&request(Interval::Minute), &mut |message: &str| {
            messages.push(message.to_owned())
        })
        .expect("query should run");

    // Then: three bars come back in SDK order with the request identity
    assert!(messages.is_empty());
    assert_eq!(bars.len(), 3);
    for bar in &bars {
        assert_eq!(bar.symbol.as_str(), "cu1805");
        assert_eq!(bar.exchange, Exchange::Shfe);
        assert_eq!(bar.interval, Interval::Minute);
        assert_eq!(bar.gateway_name, GATEWAY_NAME);
        assert_eq!(bar.datetime.into_inner().offset(), CHINA_OFFSET);
    }
    assert_eq!(
        bars.iter().map(|bar| bar.close_price).collect::<Vec<_>>(),
        vec![56_010.0, 56_020.0, 56_030.0]
    );
    assert_eq!(bars[0].datetime.format_rfc3339(), "2018-01-02T09:00:00+08:00");

    // And: exactly one session was opened, used once and closed
    assert_eq!(
        connector.events(),
        vec![
            Event::Connect,
            Event::Fetch {
                symbol: String::from("SHFE.cu1805"),
                duration: Some(60),
                end: datetime!(2018-06-02 16:00),
            },
            Event::Close,
        ]
    );
}

#[test]
fn when_interval_is_weekly_system_rejects_without_a_session() {
    let connector = ScriptedConnector::new(Script::Klines(Ok(Some(Vec::new()))));

    let mut messages = Vec::new();
    let bars = feed(&connector).query_bar_history(&request(Interval::Weekly), &mut |message: &str| {
        messages.push(message.to_owned())
    });

    assert_eq!(bars, Some(Vec::new()));
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("'w'"));
    assert!(connector.events().is_empty());
}

#[test]
fn when_sdk_refuses_login_system_returns_none_with_one_diagnostic() {
    let connector = ScriptedConnector::new(Script::RefuseConnect);

    let mut messages = Vec::new();
    let bars = feed(&connector).query_bar_history(&request(Interval::Daily), &mut |message: &str| {
        messages.push(message.to_owned())
    });

    assert!(bars.is_none());
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("bad credentials"));
    assert_eq!(connector.events(), vec![Event::Connect]);
}

#[test]
fn when_fetch_fails_system_still_closes_the_session() {
    let connector = ScriptedConnector::new(Script::Klines(Err(SdkError::Fetch(String::from(
        "timeout",
    )))));

    let mut messages = Vec::new();
    let bars = feed(&connector).query_bar_history(&request(Interval::Hour), &mut |message: &str| {
        messages.push(message.to_owned())
    });

    assert!(bars.is_none());
    assert_eq!(messages.len(), 1);
    assert_eq!(connector.events().last(), Some(&Event::Close));
}

#[test]
fn when_sdk_returns_no_table_system_returns_empty_bars() {
    let connector = ScriptedConnector::new(Script::Klines(Ok(None)));

    let bars = feed(&connector).query_bar_history(&request(Interval::Hour), &mut |_: &str| {});

    assert_eq!(bars, Some(Vec::new()));
    assert_eq!(connector.events().len(), 3);
}

// =============================================================================
// Tick history
// =============================================================================

#[test]
fn when_sdk_returns_ticks_system_maps_quote_fields() {
    let connector = ScriptedConnector::new(Script::Ticks(Ok(Some(vec![TickRow {
        datetime: 1_514_854_800_500_000_000,
        last_price: 56_010.0,
        highest: 56_100.0,
        lowest: 55_900.0,
        bid_price1: 56_000.0,
        bid_volume1: 3.0,
        ask_price1: 56_020.0,
        ask_volume1: 4.0,
        volume: 1_200.0,
        amount: 336_060_000.0,
        open_interest: 30_100.0,
    }]))));

    let ticks = feed(&connector)
        .query_tick_history(&request(Interval::Tick), &mut |_: &str| {})
        .expect("query should run");

    assert_eq!(ticks.len(), 1);
    let tick = &ticks[0];
    assert_eq!(tick.vt_symbol(), "cu1805.SHFE");
    assert_eq!(tick.bid_price_1, 56_000.0);
    assert_eq!(tick.ask_volume_1, 4.0);
    assert_eq!(tick.turnover, 336_060_000.0);
    assert_eq!(tick.datetime.format_rfc3339(), "2018-01-02T09:00:00.5+08:00");
    assert_eq!(
        connector.events()[1],
        Event::Fetch {
            symbol: String::from("SHFE.cu1805"),
            duration: None,
            end: datetime!(2018-06-02 16:00),
        }
    );
}

#[test]
fn when_tick_query_names_a_bar_interval_system_rejects_it() {
    let connector = ScriptedConnector::new(Script::Ticks(Ok(Some(Vec::new()))));

    let mut messages = Vec::new();
    let ticks = feed(&connector).query_tick_history(&request(Interval::Minute), &mut |message: &str| {
        messages.push(message.to_owned())
    });

    assert_eq!(ticks, Some(Vec::new()));
    assert_eq!(messages.len(), 1);
    assert!(connector.events().is_empty());
}

// =============================================================================
// Credentials
// =============================================================================

#[test]
fn when_credentials_are_missing_system_never_connects() {
    let connector = ScriptedConnector::new(Script::Klines(Ok(Some(Vec::new()))));
    let feed = TqsdkDatafeed::new(
        &Settings::new("trader", ""),
        Arc::clone(&connector) as Arc<dyn TqConnector>,
    );

    let mut messages = Vec::new();
    assert!(!feed.init(&mut |message: &str| messages.push(message.to_owned())));
    assert_eq!(messages.len(), 1);
    assert!(connector.events().is_empty());
}
