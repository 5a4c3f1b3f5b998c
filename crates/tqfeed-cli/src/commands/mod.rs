mod bars;
mod check;
mod ticks;

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tqfeed_core::{
    Envelope, EnvelopeError, EnvelopeMeta, NoopConnector, ReplayConnector, Settings,
    TqConnector, TqsdkDatafeed,
};
use uuid::Uuid;

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub const SCHEMA_VERSION: &str = "v1.0.0";
pub const SOURCE_NAME: &str = "tqsdk";

/// Error code reported when a query returns no result at all.
pub const QUERY_FAILED_CODE: &str = "datafeed.query_failed";

pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
    pub errors: Vec<EnvelopeError>,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Failed query; the collected diagnostics become the error message.
    pub fn failed(diagnostics: Vec<String>) -> Result<Self, CliError> {
        let message = if diagnostics.is_empty() {
            String::from("query could not be executed")
        } else {
            diagnostics.join("; ")
        };

        Ok(Self {
            data: Value::Null,
            warnings: Vec::new(),
            errors: vec![EnvelopeError::new(QUERY_FAILED_CODE, message)?],
        })
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings.extend(warnings);
        self
    }
}

pub fn run(cli: &Cli) -> Result<Envelope<Value>, CliError> {
    let settings = load_settings(cli.settings.as_deref())?;
    let feed = TqsdkDatafeed::new(&settings, connector(cli.data_dir.as_deref()));

    let started = Instant::now();
    let CommandResult {
        data,
        warnings,
        errors,
    } = match &cli.command {
        Command::Bars(args) => bars::run(args, &feed)?,
        Command::Ticks(args) => ticks::run(args, &feed)?,
        Command::Check => check::run(&feed)?,
    };
    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    let mut meta = EnvelopeMeta::new(
        Uuid::new_v4().to_string(),
        SCHEMA_VERSION,
        SOURCE_NAME,
        latency_ms,
    )?;
    for warning in warnings {
        meta.push_warning(warning);
    }

    let mut envelope = Envelope::success(meta, data);
    for error in errors {
        envelope.push_error(error)?;
    }
    Ok(envelope)
}

fn load_settings(path: Option<&Path>) -> Result<Settings, CliError> {
    let settings = match path.map(Path::to_path_buf).or_else(Settings::default_path) {
        Some(path) => Settings::load(&path)?,
        None => Settings::default(),
    };
    Ok(settings.with_env_overrides())
}

fn connector(data_dir: Option<&Path>) -> Arc<dyn TqConnector> {
    match data_dir {
        Some(dir) => Arc::new(ReplayConnector::new(dir)),
        None => {
            tracing::warn!("no --data-dir given; queries will fail to connect");
            Arc::new(NoopConnector)
        }
    }
}
