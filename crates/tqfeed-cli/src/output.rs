use std::io::{self, Write};

use serde_json::Value;
use tqfeed_core::Envelope;

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Record fields shown by the table format, in column order.
const TABLE_COLUMNS: [&str; 7] = [
    "datetime",
    "open_price",
    "high_price",
    "low_price",
    "close_price",
    "last_price",
    "volume",
];

pub fn render(
    envelope: &Envelope<Value>,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    let stdout = io::stdout();
    write_envelope(&mut stdout.lock(), envelope, format, pretty)
}

pub fn write_envelope<W: Write>(
    writer: &mut W,
    envelope: &Envelope<Value>,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            if pretty {
                serde_json::to_writer_pretty(&mut *writer, envelope)?;
            } else {
                serde_json::to_writer(&mut *writer, envelope)?;
            }
            writeln!(writer)?;
        }
        OutputFormat::Table => write_table(writer, envelope)?,
    }

    Ok(())
}

fn write_table<W: Write>(writer: &mut W, envelope: &Envelope<Value>) -> Result<(), CliError> {
    writeln!(writer, "request_id  : {}", envelope.meta.request_id)?;
    writeln!(writer, "schema      : {}", envelope.meta.schema_version)?;
    writeln!(writer, "generated_at: {}", envelope.meta.generated_at)?;
    writeln!(writer, "source      : {}", envelope.meta.source)?;
    writeln!(writer, "latency_ms  : {}", envelope.meta.latency_ms)?;

    if !envelope.meta.warnings.is_empty() {
        writeln!(writer, "warnings:")?;
        for warning in &envelope.meta.warnings {
            writeln!(writer, "  - {warning}")?;
        }
    }

    match &envelope.data {
        Value::Array(records) => write_records(writer, records)?,
        Value::Null => {}
        other => {
            writeln!(writer, "data:")?;
            for line in serde_json::to_string_pretty(other)?.lines() {
                writeln!(writer, "  {line}")?;
            }
        }
    }

    if !envelope.errors.is_empty() {
        writeln!(writer, "errors:")?;
        for error in &envelope.errors {
            writeln!(writer, "  - {}: {}", error.code, error.message)?;
        }
    }

    Ok(())
}

fn write_records<W: Write>(writer: &mut W, records: &[Value]) -> Result<(), CliError> {
    let Some(first) = records.first() else {
        writeln!(writer, "records     : 0")?;
        return Ok(());
    };

    let title = first
        .get("symbol")
        .zip(first.get("exchange"))
        .and_then(|(symbol, exchange)| Some(format!("{}.{}", symbol.as_str()?, exchange.as_str()?)))
        .unwrap_or_default();
    writeln!(writer, "records     : {} {title}", records.len())?;

    let columns = TABLE_COLUMNS
        .iter()
        .copied()
        .filter(|column| first.get(*column).is_some())
        .collect::<Vec<_>>();

    writeln!(writer, "{}", columns.join("\t"))?;
    for record in records {
        let cells = columns
            .iter()
            .map(|column| cell(record.get(*column)))
            .collect::<Vec<_>>();
        writeln!(writer, "{}", cells.join("\t"))?;
    }

    Ok(())
}

fn cell(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Null) | None => String::from("-"),
        Some(other) => other.to_string(),
    }
}
