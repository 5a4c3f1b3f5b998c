//! CLI argument definitions for tqfeed.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `bars` | Query historical bars |
//! | `ticks` | Query historical ticks |
//! | `check` | Verify credentials by opening one session |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `json` | Output format (json, table) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--settings` | `$HOME/.vntrader/vt_setting.json` | Settings file |
//! | `--data-dir` | none | Directory of CSV exports for the replay transport |
//!
//! # Examples
//!
//! ```bash
//! tqfeed --data-dir ./exports bars --symbol cu1805 --exchange SHFE \
//!     --interval 1m --start "2018-01-01 06:00" --end "2018-06-01 16:00" --pretty
//!
//! RUST_LOG=tqfeed_core=debug tqfeed --data-dir ./exports check
//! ```

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tqfeed_core::{parse_local_datetime, Exchange, HistoryRequest, Interval, Symbol, ValidationError};

/// Historical bar and tick data through the TianQin SDK.
#[derive(Debug, Parser)]
#[command(
    name = "tqfeed",
    author,
    version,
    about = "Historical bar and tick data through the TianQin SDK"
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Settings file holding `datafeed.username` and `datafeed.password`.
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    /// Serve queries from CSV exports in this directory.
    ///
    /// Without it no SDK transport is configured and every query fails to connect.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary for terminal display.
    Table,
    /// Single JSON envelope.
    Json,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Query historical bars.
    Bars(BarsArgs),
    /// Query historical ticks.
    Ticks(TicksArgs),
    /// Open and close one session to verify the credentials.
    Check,
}

/// Instrument and range shared by every query.
#[derive(Debug, Args)]
pub struct QueryArgs {
    /// Exchange-local ticker, e.g. `cu1805`.
    #[arg(long)]
    pub symbol: String,

    /// Exchange code, e.g. `SHFE`.
    #[arg(long)]
    pub exchange: String,

    /// Range start on the exchange clock (`YYYY-MM-DD[ HH:MM[:SS]]`).
    #[arg(long)]
    pub start: String,

    /// Range end on the exchange clock (`YYYY-MM-DD[ HH:MM[:SS]]`).
    #[arg(long)]
    pub end: String,
}

impl QueryArgs {
    pub fn to_request(&self, interval: Interval) -> Result<HistoryRequest, ValidationError> {
        HistoryRequest::new(
            Symbol::parse(&self.symbol)?,
            Exchange::from_str(&self.exchange)?,
            interval,
            parse_local_datetime(&self.start)?,
            parse_local_datetime(&self.end)?,
        )
    }
}

#[derive(Debug, Args)]
pub struct BarsArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    /// Bar interval (1m, 1h, d).
    #[arg(long, default_value = "1m")]
    pub interval: String,
}

#[derive(Debug, Args)]
pub struct TicksArgs {
    #[command(flatten)]
    pub query: QueryArgs,
}
