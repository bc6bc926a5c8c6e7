//! Binary entry point for the bstream command-line tool.
#![forbid(unsafe_code)]

mod config;

use std::error::Error;
use std::path::PathBuf;

use bstream::{
    cli::import_export::{
        run_decode, run_encode, run_inspect, DecodeConfig, EncodeConfig, InspectConfig,
        InspectReport, RowFormat,
    },
    options::DEFAULT_CAPACITY,
    parse_schema, Endian, StreamOptions, TypeTag,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use config::CliConfig;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "bstream",
    version,
    about = "Encode and decode schema-typed binary row streams",
    disable_help_subcommand = true
)]
struct Cli {
    #[arg(
        long,
        global = true,
        env = "BSTREAM_CONFIG",
        value_name = "FILE",
        help = "Path to the CLI config file"
    )]
    config: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        value_enum,
        default_value_t = OutputFormat::Text,
        help = "Output format for summaries"
    )]
    format: OutputFormat,

    #[command(flatten)]
    stream: StreamArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct StreamArgs {
    #[arg(
        long,
        global = true,
        value_enum,
        help = "Byte order of fixed-width fields"
    )]
    endian: Option<EndianArg>,

    #[arg(
        long,
        global = true,
        value_name = "BYTES",
        help = "Initial buffer capacity"
    )]
    capacity: Option<usize>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encode CSV rows into a binary stream.
    Encode(EncodeCmd),
    /// Decode a binary stream into CSV or JSON rows.
    Decode(DecodeCmd),
    /// Show size, hex preview, and row count of a stream file.
    Inspect(InspectCmd),
    /// Manage named schemas in the config file.
    Schemas {
        #[command(subcommand)]
        cmd: SchemasCmd,
    },
}

#[derive(Args, Debug)]
struct EncodeCmd {
    #[arg(
        long,
        value_name = "TYPES|@NAME",
        help = "Comma-separated column types or @name of a configured schema"
    )]
    schema: Option<String>,

    #[arg(long, value_name = "FILE", help = "CSV file to encode")]
    input: PathBuf,

    #[arg(long, value_name = "FILE", help = "Destination stream file")]
    output: PathBuf,

    #[arg(long, help = "Treat the first CSV record as data rather than a header")]
    no_headers: bool,
}

#[derive(Args, Debug)]
struct DecodeCmd {
    #[arg(long, value_name = "TYPES|@NAME")]
    schema: Option<String>,

    #[arg(long, value_name = "FILE", help = "Stream file to decode")]
    input: PathBuf,

    #[arg(long, value_name = "FILE", help = "Write rows here instead of stdout")]
    output: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = RowsArg::Csv, help = "Row output layout")]
    rows: RowsArg,

    #[arg(
        long,
        value_name = "a,b,c",
        help = "Column names for the CSV header or JSON object keys"
    )]
    columns: Option<String>,
}

#[derive(Args, Debug)]
struct InspectCmd {
    #[arg(long, value_name = "TYPES|@NAME", help = "Decode and count rows")]
    schema: Option<String>,

    #[arg(long, value_name = "FILE")]
    input: PathBuf,

    #[arg(long, default_value_t = 32, help = "Bytes to show in the hex preview")]
    preview: usize,
}

#[derive(Subcommand, Debug)]
enum SchemasCmd {
    /// List configured schemas.
    List,
    /// Add or replace a named schema.
    Set {
        name: String,
        #[arg(value_name = "TYPES")]
        spec: String,
        #[arg(long, help = "Also make it the default schema")]
        default: bool,
    },
    /// Remove a named schema.
    Delete { name: String },
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum EndianArg {
    Little,
    Big,
    Native,
}

impl From<EndianArg> for Endian {
    fn from(value: EndianArg) -> Self {
        match value {
            EndianArg::Little => Endian::Little,
            EndianArg::Big => Endian::Big,
            EndianArg::Native => Endian::Native,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum RowsArg {
    Csv,
    Json,
}

impl From<RowsArg> for RowFormat {
    fn from(value: RowsArg) -> Self {
        match value {
            RowsArg::Csv => RowFormat::Csv,
            RowsArg::Json => RowFormat::Json,
        }
    }
}

#[derive(Serialize)]
struct SchemaListing {
    name: String,
    types: String,
    default: bool,
}

fn main() {
    init_tracing();
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bstream=warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}

fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let mut config = CliConfig::load(cli.config.clone())?;
    let options = build_stream_options(&cli.stream, &config);

    match cli.command {
        Command::Encode(cmd) => {
            let schema = resolve_schema(cmd.schema.as_deref(), &config)?
                .ok_or("--schema is required when no default schema is configured")?;
            let summary = run_encode(&EncodeConfig {
                input: cmd.input,
                output: cmd.output.clone(),
                schema,
                has_headers: !cmd.no_headers,
                options,
            })?;
            emit(&cli.format, &summary, || {
                println!(
                    "Encoded {} rows ({} bytes) into {}",
                    summary.rows,
                    summary.bytes,
                    cmd.output.display()
                )
            })?;
        }
        Command::Decode(cmd) => {
            let schema = resolve_schema(cmd.schema.as_deref(), &config)?
                .ok_or("--schema is required when no default schema is configured")?;
            let columns = cmd.columns.as_deref().map(split_columns);
            let summary = run_decode(&DecodeConfig {
                input: cmd.input,
                output: cmd.output.clone(),
                schema,
                format: cmd.rows.into(),
                columns,
                options,
            })?;
            // without --output the rows occupy stdout
            if let Some(path) = &cmd.output {
                emit(&cli.format, &summary, || {
                    println!(
                        "Decoded {} rows ({} bytes) into {}",
                        summary.rows,
                        summary.bytes,
                        path.display()
                    )
                })?;
            }
        }
        Command::Inspect(cmd) => {
            let schema = resolve_schema(cmd.schema.as_deref(), &config)?;
            let report = run_inspect(&InspectConfig {
                input: cmd.input,
                schema,
                preview: cmd.preview,
                options,
            })?;
            emit(&cli.format, &report, || print_inspect_text(&report))?;
        }
        Command::Schemas { cmd } => match cmd {
            SchemasCmd::List => {
                let default_name = config.default_schema_name().map(str::to_string);
                let listing: Vec<SchemaListing> = config
                    .schemas()
                    .map(|(name, tags)| SchemaListing {
                        name: name.to_string(),
                        types: format_schema(tags),
                        default: default_name.as_deref() == Some(name),
                    })
                    .collect();
                emit(&cli.format, &listing, || {
                    if listing.is_empty() {
                        println!("No schemas configured.");
                    }
                    for entry in &listing {
                        let marker = if entry.default { " (default)" } else { "" };
                        println!("{}{}: {}", entry.name, marker, entry.types);
                    }
                })?;
            }
            SchemasCmd::Set {
                name,
                spec,
                default,
            } => {
                config.set_schema(&name, &spec, default)?;
                let path = config.persist()?;
                println!("Saved schema '{name}' to {}", path.display());
            }
            SchemasCmd::Delete { name } => {
                config.delete_schema(&name)?;
                let path = config.persist()?;
                println!("Removed schema '{name}' from {}", path.display());
            }
        },
    }
    Ok(())
}

fn build_stream_options(args: &StreamArgs, config: &CliConfig) -> StreamOptions {
    let endian = args
        .endian
        .map(Endian::from)
        .or_else(|| config.endian())
        .unwrap_or_default();
    let capacity = args
        .capacity
        .or_else(|| config.capacity())
        .unwrap_or(DEFAULT_CAPACITY);
    StreamOptions::new().capacity(capacity).endian(endian)
}

/// `None` only when no schema was given and the config has no default.
fn resolve_schema(
    raw: Option<&str>,
    config: &CliConfig,
) -> Result<Option<Vec<TypeTag>>, Box<dyn Error>> {
    match raw {
        Some(spec) => match spec.strip_prefix('@') {
            Some(name) => Ok(Some(config.schema(name)?.to_vec())),
            None => Ok(Some(parse_schema(spec)?)),
        },
        None => Ok(config.default_schema().map(<[TypeTag]>::to_vec)),
    }
}

fn split_columns(raw: &str) -> Vec<String> {
    raw.split(',').map(|name| name.trim().to_string()).collect()
}

fn format_schema(tags: &[TypeTag]) -> String {
    tags.iter().map(|tag| tag.name()).collect::<Vec<_>>().join(",")
}

fn emit<T, F>(format: &OutputFormat, value: &T, printer: F) -> Result<(), Box<dyn Error>>
where
    T: Serialize,
    F: Fn(),
{
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(value)?;
            println!("{json}");
        }
        OutputFormat::Text => printer(),
    }
    Ok(())
}

fn print_inspect_text(report: &InspectReport) {
    println!(
        "Stream: {} ({} bytes, {}-endian)",
        report.path, report.bytes, report.endian
    );
    if let Some(rows) = report.rows {
        println!("  rows={rows}");
    }
    let ellipsis = if report.truncated { "..." } else { "" };
    println!("  head={}{}", report.preview_hex, ellipsis);
}
