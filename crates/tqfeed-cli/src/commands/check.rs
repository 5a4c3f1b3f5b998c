use serde::Serialize;
use tqfeed_core::Datafeed;

use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct CheckResponseData {
    initialised: bool,
}

pub fn run(feed: &dyn Datafeed) -> Result<CommandResult, CliError> {
    let mut diagnostics = Vec::new();
    let initialised = feed.init(&mut |message: &str| diagnostics.push(message.to_owned()));

    if !initialised {
        return CommandResult::failed(diagnostics);
    }

    let data = serde_json::to_value(CheckResponseData { initialised })?;
    Ok(CommandResult::ok(data).with_warnings(diagnostics))
}
