use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use serde::Serialize;
use serde_json::{Map, Number, Value as JsonValue};
use thiserror::Error;
use tracing::{debug, info};

use crate::error::StreamError;
use crate::options::StreamOptions;
use crate::schema::{encoded_row_len, validate_schema, TypeTag, Value};
use crate::stream::Stream;

/// Configuration for encoding a CSV file into a stream file.
#[derive(Debug, Clone)]
pub struct EncodeConfig {
    /// CSV file with one row per record.
    pub input: PathBuf,
    /// Destination for the encoded bytes.
    pub output: PathBuf,
    /// Column types, one per CSV field.
    pub schema: Vec<TypeTag>,
    /// Whether the first CSV record is a header to skip.
    pub has_headers: bool,
    /// Stream construction options.
    pub options: StreamOptions,
}

/// Outcome of an encode run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EncodeSummary {
    /// Rows written.
    pub rows: u64,
    /// Bytes written.
    pub bytes: u64,
}

/// Layout for decoded rows.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum RowFormat {
    /// One CSV record per row.
    Csv,
    /// A JSON array of rows.
    Json,
}

/// Configuration for decoding a stream file.
#[derive(Debug, Clone)]
pub struct DecodeConfig {
    /// Encoded stream file.
    pub input: PathBuf,
    /// Destination file; `None` writes to stdout.
    pub output: Option<PathBuf>,
    /// Column types the stream was encoded with.
    pub schema: Vec<TypeTag>,
    /// Output layout.
    pub format: RowFormat,
    /// Optional column names: a CSV header, or object keys for JSON.
    pub columns: Option<Vec<String>>,
    /// Stream construction options; only the byte order matters here.
    pub options: StreamOptions,
}

/// Outcome of a decode run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DecodeSummary {
    /// Rows decoded.
    pub rows: u64,
    /// Bytes consumed.
    pub bytes: u64,
}

/// Configuration for inspecting a stream file.
#[derive(Debug, Clone)]
pub struct InspectConfig {
    /// Encoded stream file.
    pub input: PathBuf,
    /// When present, rows are decoded and counted.
    pub schema: Option<Vec<TypeTag>>,
    /// Number of leading bytes to render as hex.
    pub preview: usize,
    /// Stream construction options.
    pub options: StreamOptions,
}

/// Summary of a stream file.
#[derive(Debug, Clone, Serialize)]
pub struct InspectReport {
    /// Inspected path.
    pub path: String,
    /// File size in bytes.
    pub bytes: u64,
    /// Byte order used to decode.
    pub endian: String,
    /// Decoded row count when a schema was given.
    pub rows: Option<u64>,
    /// Hex rendering of the leading bytes.
    pub preview_hex: String,
    /// Whether the preview stops short of the end of the file.
    pub truncated: bool,
}

/// Error type for CLI import/export operations.
#[derive(Error, Debug)]
pub enum CliError {
    /// Generic error message.
    #[error("{0}")]
    Message(String),
    /// IO error from file operations.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// CSV parsing or writing error.
    #[error(transparent)]
    Csv(#[from] csv::Error),
    /// JSON serialization error.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// Stream codec error.
    #[error(transparent)]
    Stream(#[from] StreamError),
}

impl From<&str> for CliError {
    fn from(value: &str) -> Self {
        CliError::Message(value.to_string())
    }
}

impl From<String> for CliError {
    fn from(value: String) -> Self {
        CliError::Message(value)
    }
}

/// Reads every CSV record, converts each field per `cfg.schema`, and writes the
/// marshalled stream to `cfg.output`.
pub fn run_encode(cfg: &EncodeConfig) -> Result<EncodeSummary, CliError> {
    validate_schema("encode", &cfg.schema)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(cfg.has_headers)
        .flexible(true)
        .from_path(&cfg.input)?;

    let mut rows = Vec::new();
    let mut record = StringRecord::new();
    while reader.read_record(&mut record)? {
        let row_idx = rows.len();
        if record.len() != cfg.schema.len() {
            return Err(StreamError::ShapeMismatch {
                row: row_idx,
                len: record.len(),
                expected: cfg.schema.len(),
            }
            .into());
        }
        let row = cfg
            .schema
            .iter()
            .zip(record.iter())
            .enumerate()
            .map(|(column, (&tag, raw))| parse_field(tag, raw, row_idx, column))
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(row);
    }

    let needed: usize = rows.iter().map(|row| encoded_row_len(row)).sum();
    let mut stream =
        Stream::with_options(cfg.options.capacity(cfg.options.capacity.max(needed)));
    stream.marshal(&cfg.schema, &rows)?;

    ensure_parent_dir(&cfg.output)?;
    fs::write(&cfg.output, stream.as_bytes())?;
    info!(
        rows = rows.len(),
        bytes = stream.len(),
        output = %cfg.output.display(),
        "encoded stream"
    );
    Ok(EncodeSummary {
        rows: rows.len() as u64,
        bytes: stream.len() as u64,
    })
}

/// Decodes a stream file and writes its rows as CSV or JSON.
pub fn run_decode(cfg: &DecodeConfig) -> Result<DecodeSummary, CliError> {
    if let Some(columns) = &cfg.columns {
        if columns.len() != cfg.schema.len() {
            return Err(CliError::Message(format!(
                "{} column names given for a {}-column schema",
                columns.len(),
                cfg.schema.len()
            )));
        }
    }
    let data = fs::read(&cfg.input)?;
    let mut stream = Stream::from_slice(&data, cfg.options.capacity(data.len()));
    let rows = stream.unmarshal(&cfg.schema)?;
    debug!(rows = rows.len(), bytes = data.len(), "decoded stream");

    let sink: Box<dyn Write> = match &cfg.output {
        Some(path) => {
            ensure_parent_dir(path)?;
            Box::new(fs::File::create(path)?)
        }
        None => Box::new(io::stdout().lock()),
    };
    match cfg.format {
        RowFormat::Csv => write_csv(sink, cfg.columns.as_deref(), &rows)?,
        RowFormat::Json => write_json(sink, cfg.columns.as_deref(), &rows)?,
    }
    Ok(DecodeSummary {
        rows: rows.len() as u64,
        bytes: data.len() as u64,
    })
}

/// Reports the size, a hex preview, and optionally the row count of a stream file.
pub fn run_inspect(cfg: &InspectConfig) -> Result<InspectReport, CliError> {
    let data = fs::read(&cfg.input)?;
    let mut stream = Stream::from_slice(&data, cfg.options.capacity(data.len()));
    let rows = match &cfg.schema {
        Some(schema) => Some(stream.unmarshal(schema)?.len() as u64),
        None => None,
    };
    let shown = cfg.preview.min(data.len());
    Ok(InspectReport {
        path: cfg.input.display().to_string(),
        bytes: data.len() as u64,
        endian: stream.endian().to_string(),
        rows,
        preview_hex: hex::encode(&data[..shown]),
        truncated: shown < data.len(),
    })
}

/// Converts one CSV field into a value for a column of type `tag`.
///
/// Booleans accept `true/false`, `t/f`, `yes/no`, and `1/0` in any case.
/// Strings are taken verbatim; numeric fields are trimmed first.
pub fn parse_field(
    tag: TypeTag,
    raw: &str,
    row: usize,
    column: usize,
) -> Result<Value, CliError> {
    let invalid = || {
        CliError::Message(format!(
            "row {row}, column {column}: '{raw}' is not a valid {tag}"
        ))
    };
    match tag {
        TypeTag::Bool => match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "t" | "yes" | "1" => Ok(Value::Bool(true)),
            "false" | "f" | "no" | "0" => Ok(Value::Bool(false)),
            _ => Err(invalid()),
        },
        TypeTag::Int => raw
            .trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| invalid()),
        TypeTag::Float => raw
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| invalid()),
        TypeTag::String => Ok(Value::Str(raw.to_string())),
        TypeTag::Byte => Err(StreamError::UnsupportedColumn {
            op: "encode",
            column,
            tag,
        }
        .into()),
    }
}

/// Maps a row value onto JSON. Non-finite floats become `null`.
pub fn value_to_json(value: &Value) -> JsonValue {
    match value {
        Value::Bool(v) => JsonValue::Bool(*v),
        Value::Int(v) => JsonValue::Number((*v).into()),
        Value::Float(v) => Number::from_f64(*v)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        Value::Str(v) => JsonValue::String(v.clone()),
    }
}

fn ensure_parent_dir(path: &Path) -> Result<(), CliError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|err| {
                CliError::Message(format!("cannot create {}: {err}", parent.display()))
            })
        }
        _ => Ok(()),
    }
}

fn write_csv<W: Write>(
    sink: W,
    columns: Option<&[String]>,
    rows: &[Vec<Value>],
) -> Result<(), CliError> {
    let mut writer = WriterBuilder::new().flexible(true).from_writer(sink);
    if let Some(columns) = columns {
        writer.write_record(columns)?;
    }
    for row in rows {
        writer.write_record(row.iter().map(Value::to_string))?;
    }
    writer.flush()?;
    Ok(())
}

fn write_json<W: Write>(
    mut sink: W,
    columns: Option<&[String]>,
    rows: &[Vec<Value>],
) -> Result<(), CliError> {
    let doc: Vec<JsonValue> = rows
        .iter()
        .map(|row| match columns {
            Some(names) => {
                let object: Map<String, JsonValue> = names
                    .iter()
                    .cloned()
                    .zip(row.iter().map(value_to_json))
                    .collect();
                JsonValue::Object(object)
            }
            None => JsonValue::Array(row.iter().map(value_to_json).collect()),
        })
        .collect();
    serde_json::to_writer_pretty(&mut sink, &doc)?;
    writeln!(sink)?;
    sink.flush()?;
    Ok(())
}
