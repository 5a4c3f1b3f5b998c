//! Offline SDK backed by CSV exports.
//!
//! Files follow the SDK downloader layout, one per instrument and duration:
//!
//! ```text
//! {data_dir}/SHFE.cu1805.60.csv
//! datetime,datetime_nano,SHFE.cu1805.open,SHFE.cu1805.high,...,SHFE.cu1805.close_oi
//! 2018-01-02 09:00:00.000000,1514854800000000000,56000.0,...
//! ```
//!
//! The `datetime` column is the exchange wall clock and is not read; rows are
//! keyed by `datetime_nano`. Tick files use duration `0`.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use time::PrimitiveDateTime;
use tracing::debug;

use super::tqsdk::TICK_DURATION_SECONDS;
use crate::sdk::{
    Frame, KlineFrame, KlineRow, SdkError, TickFrame, TickRow, TqAuth, TqConnector, TqSession,
};
use crate::{ExchangeDateTime, CHINA_OFFSET};

const DATETIME_NANO_COLUMN: &str = "datetime_nano";

const KLINE_FIELDS: [&str; 7] = [
    "open", "high", "low", "close", "volume", "open_oi", "close_oi",
];

const TICK_FIELDS: [&str; 10] = [
    "last_price",
    "highest",
    "lowest",
    "bid_price1",
    "bid_volume1",
    "ask_price1",
    "ask_volume1",
    "volume",
    "amount",
    "open_interest",
];

/// Connector serving sessions from a directory of CSV exports.
#[derive(Debug, Clone)]
pub struct ReplayConnector {
    data_dir: PathBuf,
}

impl ReplayConnector {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Location of the export for `symbol` (`"SHFE.cu1805"`) at `duration_seconds`.
    pub fn file_path(&self, symbol: &str, duration_seconds: u32) -> PathBuf {
        file_path(&self.data_dir, symbol, duration_seconds)
    }
}

impl TqConnector for ReplayConnector {
    fn connect(&self, auth: &TqAuth) -> Result<Box<dyn TqSession>, SdkError> {
        if !auth.is_complete() {
            return Err(SdkError::Authentication(String::from(
                "username and password are required",
            )));
        }

        if !self.data_dir.is_dir() {
            return Err(SdkError::Connection(format!(
                "replay data directory '{}' does not exist",
                self.data_dir.display()
            )));
        }

        Ok(Box::new(ReplaySession {
            data_dir: self.data_dir.clone(),
            closed: false,
        }))
    }
}

struct ReplaySession {
    data_dir: PathBuf,
    closed: bool,
}

impl ReplaySession {
    fn read<R>(
        &self,
        symbol: &str,
        duration_seconds: u32,
        fields: &[&str],
        start: PrimitiveDateTime,
        end: PrimitiveDateTime,
        build: impl Fn(i64, &[f64]) -> R,
    ) -> Result<Option<Frame<R>>, SdkError> {
        if self.closed {
            return Err(SdkError::Fetch(String::from("session is closed")));
        }

        let path = file_path(&self.data_dir, symbol, duration_seconds);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no replay export for symbol");
                return Ok(None);
            }
            Err(error) => {
                return Err(SdkError::Fetch(format!(
                    "failed to open '{}': {error}",
                    path.display()
                )))
            }
        };

        let lower = ExchangeDateTime::from_local(start, CHINA_OFFSET).epoch_nanos();
        let upper = ExchangeDateTime::from_local(end, CHINA_OFFSET).epoch_nanos();
        let rows = parse_rows(BufReader::new(file), symbol, fields)?
            .into_iter()
            .filter(|(nanos, _)| (lower..upper).contains(&i128::from(*nanos)))
            .map(|(nanos, values)| build(nanos, &values))
            .collect();

        Ok(Some(Frame::new(rows)))
    }
}

impl TqSession for ReplaySession {
    fn get_kline_data_series(
        &mut self,
        symbol: &str,
        duration_seconds: u32,
        start: PrimitiveDateTime,
        end: PrimitiveDateTime,
    ) -> Result<Option<KlineFrame>, SdkError> {
        self.read(
            symbol,
            duration_seconds,
            &KLINE_FIELDS,
            start,
            end,
            |datetime, values| KlineRow {
                datetime,
                open: values[0],
                high: values[1],
                low: values[2],
                close: values[3],
                volume: values[4],
                open_oi: values[5],
                close_oi: values[6],
            },
        )
    }

    fn get_tick_data_series(
        &mut self,
        symbol: &str,
        start: PrimitiveDateTime,
        end: PrimitiveDateTime,
    ) -> Result<Option<TickFrame>, SdkError> {
        self.read(
            symbol,
            TICK_DURATION_SECONDS,
            &TICK_FIELDS,
            start,
            end,
            |datetime, values| TickRow {
                datetime,
                last_price: values[0],
                highest: values[1],
                lowest: values[2],
                bid_price1: values[3],
                bid_volume1: values[4],
                ask_price1: values[5],
                ask_volume1: values[6],
                volume: values[7],
                amount: values[8],
                open_interest: values[9],
            },
        )
    }

    fn close(&mut self) {
        self.closed = true;
    }
}

fn file_path(data_dir: &Path, symbol: &str, duration_seconds: u32) -> PathBuf {
    data_dir.join(format!("{symbol}.{duration_seconds}.csv"))
}

/// Reads `(datetime_nano, values)` pairs with `values` ordered like `fields`.
fn parse_rows<R: BufRead>(
    reader: R,
    symbol: &str,
    fields: &[&str],
) -> Result<Vec<(i64, Vec<f64>)>, SdkError> {
    let mut lines = reader.lines();
    let header = match lines.next() {
        Some(line) => line.map_err(|error| io_error(1, error))?,
        None => return Ok(Vec::new()),
    };

    let columns = header
        .trim()
        .split(',')
        .enumerate()
        .map(|(index, name)| (name.trim().to_owned(), index))
        .collect::<HashMap<_, _>>();

    let nano_index = column_index(&columns, DATETIME_NANO_COLUMN)?;
    let field_indexes = fields
        .iter()
        .map(|field| column_index(&columns, &format!("{symbol}.{field}")))
        .collect::<Result<Vec<_>, _>>()?;

    let mut rows = Vec::new();
    for (offset, line) in lines.enumerate() {
        let line_number = offset + 2;
        let line = line.map_err(|error| io_error(line_number, error))?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let cells = trimmed.split(',').map(str::trim).collect::<Vec<_>>();
        let cell = |index: usize| {
            cells.get(index).copied().ok_or_else(|| SdkError::Data {
                line: line_number,
                message: format!("expected at least {} fields, got {}", index + 1, cells.len()),
            })
        };

        let nanos_cell = cell(nano_index)?;
        let nanos = nanos_cell.parse::<i64>().map_err(|_| SdkError::Data {
            line: line_number,
            message: format!("invalid {DATETIME_NANO_COLUMN} '{nanos_cell}'"),
        })?;

        let values = field_indexes
            .iter()
            .map(|&index| parse_value(cell(index)?, line_number))
            .collect::<Result<Vec<_>, _>>()?;

        rows.push((nanos, values));
    }

    Ok(rows)
}

fn column_index(columns: &HashMap<String, usize>, name: &str) -> Result<usize, SdkError> {
    columns.get(name).copied().ok_or_else(|| SdkError::Data {
        line: 1,
        message: format!("missing column '{name}'"),
    })
}

fn parse_value(cell: &str, line: usize) -> Result<f64, SdkError> {
    if cell.is_empty() {
        return Ok(f64::NAN);
    }
    cell.parse::<f64>().map_err(|_| SdkError::Data {
        line,
        message: format!("invalid number '{cell}'"),
    })
}

fn io_error(line: usize, error: std::io::Error) -> SdkError {
    SdkError::Data {
        line,
        message: error.to_string(),
    }
}
