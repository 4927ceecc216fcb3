// ampere_sim/src/simulation/io/ingest.rs

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use ampere_core::messages::MeasurementSample;
use ampere_core::time::{parse_timestamp, TimeError};
use csv::{ReaderBuilder, StringRecord, Trim};
use thiserror::Error;
use tracing::{debug, info};

pub const TIMESTAMP_COLUMN: &str = "timestamp";
pub const VOLTAGE_COLUMN: &str = "voltage_load";
pub const CURRENT_COLUMN: &str = "current_load";

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("could not open measurement log {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read measurement log: {0}")]
    Csv(#[from] csv::Error),

    #[error("header row is missing required column `{column}`")]
    MissingColumn { column: &'static str },

    #[error("line {line}: column `{column}` {reason}")]
    MalformedRow {
        line: u64,
        column: &'static str,
        reason: String,
    },

    #[error("line {line}: {source}")]
    MalformedTimestamp {
        line: u64,
        #[source]
        source: TimeError,
    },
}

/// How to split the measurement log into fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestOptions {
    pub delimiter: u8,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

/// Positions of the required columns in the header row.
struct ColumnIndex {
    timestamp: usize,
    voltage: usize,
    current: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Result<Self, IngestError> {
        let find = |column: &'static str| {
            headers
                .iter()
                .position(|h| h == column)
                .ok_or(IngestError::MissingColumn { column })
        };
        Ok(Self {
            timestamp: find(TIMESTAMP_COLUMN)?,
            voltage: find(VOLTAGE_COLUMN)?,
            current: find(CURRENT_COLUMN)?,
        })
    }
}

/// Opens and parses a measurement log from disk. See [`read_samples`].
pub fn load_samples(path: &Path, options: &IngestOptions) -> Result<Vec<MeasurementSample>, IngestError> {
    let file = File::open(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Reading measurement log from: {}", path.display());
    let samples = read_samples(file, options)?;
    info!("Loaded {} samples", samples.len());
    Ok(samples)
}

/// Parses a delimited measurement log whose first row is a header naming at
/// least `timestamp`, `voltage_load` and `current_load`.
///
/// Column order is free and other columns are ignored. Parsing is
/// all-or-nothing: the first row with an empty or unparsable required field
/// fails the whole log, so no partial series is ever returned.
///
/// A completely empty line is not a row: the csv reader skips it, and the
/// samples on either side stay consecutive. A line holding only delimiters
/// or whitespace is a row with empty fields and fails as `MalformedRow`.
pub fn read_samples<R: Read>(
    reader: R,
    options: &IngestOptions,
) -> Result<Vec<MeasurementSample>, IngestError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let columns = ColumnIndex::from_headers(reader.headers()?)?;
    debug!(
        timestamp = columns.timestamp,
        voltage = columns.voltage,
        current = columns.current,
        "resolved measurement log columns"
    );

    let mut samples = Vec::new();
    for record in reader.records() {
        let record = record?;
        samples.push(parse_row(&record, &columns)?);
    }
    Ok(samples)
}

fn parse_row(record: &StringRecord, columns: &ColumnIndex) -> Result<MeasurementSample, IngestError> {
    let line = record.position().map_or(0, |p| p.line());

    let timestamp = required_field(record, columns.timestamp, TIMESTAMP_COLUMN, line)?;
    let voltage = required_field(record, columns.voltage, VOLTAGE_COLUMN, line)?;
    let current = required_field(record, columns.current, CURRENT_COLUMN, line)?;

    Ok(MeasurementSample {
        timestamp: parse_timestamp(timestamp)
            .map_err(|source| IngestError::MalformedTimestamp { line, source })?,
        voltage: parse_number(voltage, VOLTAGE_COLUMN, line)?,
        current: parse_number(current, CURRENT_COLUMN, line)?,
    })
}

fn required_field<'r>(
    record: &'r StringRecord,
    index: usize,
    column: &'static str,
    line: u64,
) -> Result<&'r str, IngestError> {
    match record.get(index) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(IngestError::MalformedRow {
            line,
            column,
            reason: "is empty".to_string(),
        }),
    }
}

fn parse_number(value: &str, column: &'static str, line: u64) -> Result<f64, IngestError> {
    match value.parse::<f64>() {
        Ok(number) if number.is_finite() => Ok(number),
        _ => Err(IngestError::MalformedRow {
            line,
            column,
            reason: format!("is not a finite number: `{value}`"),
        }),
    }
}
