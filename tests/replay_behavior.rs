//! Behavior tests for the adapter running on top of CSV exports.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use time::macros::datetime;
use tqfeed_core::{
    Datafeed, Exchange, HistoryRequest, Interval, ReplayConnector, Settings, Symbol,
    TqsdkDatafeed, GATEWAY_NAME,
};

const KLINE_HEADER: &str = "datetime,datetime_nano,SHFE.cu1805.open,SHFE.cu1805.high,SHFE.cu1805.low,SHFE.cu1805.close,SHFE.cu1805.volume,SHFE.cu1805.open_oi,SHFE.cu1805.close_oi";

const TICK_HEADER: &str = "datetime,datetime_nano,SHFE.cu1805.last_price,SHFE.cu1805.highest,SHFE.cu1805.lowest,SHFE.cu1805.bid_price1,SHFE.cu1805.bid_volume1,SHFE.cu1805.ask_price1,SHFE.cu1805.ask_volume1,SHFE.cu1805.volume,SHFE.cu1805.amount,SHFE.cu1805.open_interest";

fn write_export(dir: &Path, name: &str, header: &str, rows: &[&str]) {
    let mut body = format!("{header}\n");
    for row in rows {
        body.push_str(row);
        body.push('\n');
    }
    fs::write(dir.join(name), body).expect("write export");
}

fn request(interval: Interval, end: time::PrimitiveDateTime) -> HistoryRequest {
    HistoryRequest::new(
        Symbol::parse("cu1805").expect("valid symbol"),
        Exchange::Shfe,
        interval,
        datetime!(2018-01-01 06:00),
        end,
    )
    .expect("valid request")
}

fn feed(dir: &Path) -> TqsdkDatafeed {
    TqsdkDatafeed::new(
        &Settings::new("trader", "secret"),
        Arc::new(ReplayConnector::new(dir)),
    )
}

#[test]
fn minute_bars_are_read_within_the_requested_window() {
    // Given: an export with one row before the window, three inside, one past it
    let dir = tempfile::tempdir().expect("temp dir");
    write_export(
        dir.path(),
        "SHFE.cu1805.60.csv",
        KLINE_HEADER,
        &[
            "2018-01-01 05:00:00,1514754000000000000,55900,55950,55880,55940,12,30000,30005",
            "2018-01-02 09:00:00,1514854800000000000,56000,56020,55990,56010,150,30120,30160",
            "2018-01-02 09:01:00,1514854860000000000,56010,56040,56000,56030,90,30160,30170",
            "2018-01-02 09:02:00,1514854920000000000,56030,56050,56020,56020,75,30170,30150",
            "2018-06-02 16:00:00,1527926400000000000,51000,51010,50990,51000,1,20000,20000",
        ],
    );

    // When
    let mut messages = Vec::new();
    let bars = feed(dir.path())
        .query_bar_history(
            &request(Interval::Minute, datetime!(2018-06-01 16:00)),
            &mut |message: &str| messages.push(message.to_owned()),
        )
        .expect("query should run");

    // Then
    assert!(messages.is_empty());
    assert_eq!(bars.len(), 3);
    assert_eq!(
        bars.iter()
            .map(|bar| bar.datetime.format_rfc3339())
            .collect::<Vec<_>>(),
        vec![
            "2018-01-02T09:00:00+08:00",
            "2018-01-02T09:01:00+08:00",
            "2018-01-02T09:02:00+08:00",
        ]
    );

    let first = &bars[0];
    assert_eq!(first.vt_symbol(), "cu1805.SHFE");
    assert_eq!(first.interval, Interval::Minute);
    assert_eq!(first.open_price, 56_000.0);
    assert_eq!(first.high_price, 56_020.0);
    assert_eq!(first.low_price, 55_990.0);
    assert_eq!(first.close_price, 56_010.0);
    assert_eq!(first.volume, 150.0);
    assert_eq!(first.open_interest, 30_120.0);
    assert_eq!(first.turnover, 0.0);
    assert_eq!(first.gateway_name, GATEWAY_NAME);
}

#[test]
fn the_day_after_the_requested_end_is_included() {
    let dir = tempfile::tempdir().expect("temp dir");
    write_export(
        dir.path(),
        "SHFE.cu1805.86400.csv",
        KLINE_HEADER,
        &["2018-01-02 09:00:00,1514854800000000000,56000,56500,55800,56300,9000,31000,31200"],
    );

    let bars = feed(dir.path())
        .query_bar_history(
            &request(Interval::Daily, datetime!(2018-01-02 00:00)),
            &mut |_: &str| {},
        )
        .expect("query should run");

    assert_eq!(bars.len(), 1);
    assert_eq!(bars[0].datetime.format_rfc3339(), "2018-01-02T09:00:00+08:00");
}

#[test]
fn missing_export_yields_no_bars() {
    let dir = tempfile::tempdir().expect("temp dir");

    let bars = feed(dir.path()).query_bar_history(
        &request(Interval::Hour, datetime!(2018-06-01 16:00)),
        &mut |_: &str| {},
    );

    assert_eq!(bars, Some(Vec::new()));
}

#[test]
fn malformed_export_fails_the_query() {
    let dir = tempfile::tempdir().expect("temp dir");
    write_export(
        dir.path(),
        "SHFE.cu1805.3600.csv",
        KLINE_HEADER,
        &["2018-01-02 09:00:00,not-a-number,56000,56020,55990,56010,150,30120,30160"],
    );

    let mut messages = Vec::new();
    let bars = feed(dir.path()).query_bar_history(
        &request(Interval::Hour, datetime!(2018-06-01 16:00)),
        &mut |message: &str| messages.push(message.to_owned()),
    );

    assert!(bars.is_none());
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("line 2"));
}

#[test]
fn ticks_are_read_from_the_zero_duration_export() {
    let dir = tempfile::tempdir().expect("temp dir");
    write_export(
        dir.path(),
        "SHFE.cu1805.0.csv",
        TICK_HEADER,
        &[
            "2018-01-02 09:00:00.500000,1514854800500000000,56010,56100,55900,56000,3,56020,4,1200,336060000,30100",
            "2018-01-02 09:00:01.000000,1514854801000000000,56020,56100,55900,56010,2,,5,1210,336240000,30105",
        ],
    );

    let ticks = feed(dir.path())
        .query_tick_history(
            &request(Interval::Tick, datetime!(2018-06-01 16:00)),
            &mut |_: &str| {},
        )
        .expect("query should run");

    assert_eq!(ticks.len(), 2);
    assert_eq!(ticks[0].last_price, 56_010.0);
    assert_eq!(ticks[0].bid_volume_1, 3.0);
    assert_eq!(ticks[0].turnover, 336_060_000.0);
    assert!(ticks[1].ask_price_1.is_nan());
    assert_eq!(ticks[1].datetime.format_rfc3339(), "2018-01-02T09:00:01+08:00");
}

#[test]
fn settings_file_credentials_open_the_replay_session() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("vt_setting.json");
    fs::write(
        &path,
        r#"{"datafeed.name": "tqsdk", "datafeed.username": "trader", "datafeed.password": "secret"}"#,
    )
    .expect("write settings");

    let settings = Settings::load(&path).expect("settings should load");
    let feed = TqsdkDatafeed::new(&settings, Arc::new(ReplayConnector::new(dir.path())));

    assert_eq!(feed.username(), "trader");
    assert!(feed.init(&mut |_: &str| {}));
}

#[test]
fn absent_data_directory_fails_init() {
    let dir = tempfile::tempdir().expect("temp dir");
    let feed = feed(&dir.path().join("absent"));

    let mut messages = Vec::new();
    assert!(!feed.init(&mut |message: &str| messages.push(message.to_owned())));
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("does not exist"));
}
