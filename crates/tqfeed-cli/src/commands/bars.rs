use std::str::FromStr;

use tqfeed_core::{Datafeed, Interval};

use crate::cli::BarsArgs;
use crate::error::CliError;

use super::CommandResult;

pub fn run(args: &BarsArgs, feed: &dyn Datafeed) -> Result<CommandResult, CliError> {
    let interval = Interval::from_str(&args.interval)?;
    let request = args.query.to_request(interval)?;

    let mut diagnostics = Vec::new();
    let bars = feed.query_bar_history(&request, &mut |message: &str| {
        diagnostics.push(message.to_owned())
    });

    match bars {
        Some(bars) => Ok(CommandResult::ok(serde_json::to_value(bars)?).with_warnings(diagnostics)),
        None => CommandResult::failed(diagnostics),
    }
}
