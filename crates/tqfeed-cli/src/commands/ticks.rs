use tqfeed_core::{Datafeed, Interval};

use crate::cli::TicksArgs;
use crate::error::CliError;

use super::CommandResult;

pub fn run(args: &TicksArgs, feed: &dyn Datafeed) -> Result<CommandResult, CliError> {
    let request = args.query.to_request(Interval::Tick)?;

    let mut diagnostics = Vec::new();
    let ticks = feed.query_tick_history(&request, &mut |message: &str| {
        diagnostics.push(message.to_owned())
    });

    match ticks {
        Some(ticks) => {
            Ok(CommandResult::ok(serde_json::to_value(ticks)?).with_warnings(diagnostics))
        }
        None => CommandResult::failed(diagnostics),
    }
}
