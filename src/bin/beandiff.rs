//! beandiff - Audit diff CLI tool
//!
//! Diffs two YAML/JSON documents against a type schema and prints the
//! path-keyed differences.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path as FsPath, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use audit_diff::value;
use audit_diff::{DiffResult, Differ, MismatchPolicy, Schema, Value};

/// Lookup tables keyed by resolver name, each mapping a raw value's string
/// form to its label.
type LookupTables = BTreeMap<String, BTreeMap<String, String>>;

#[derive(Debug, Parser)]
#[command(name = "beandiff", version, about = "Path-keyed diffs of structured documents")]
struct Cli {
    /// Path to the type schema (YAML)
    #[arg(short, long)]
    schema: Option<PathBuf>,

    /// Path to resolver lookup tables (YAML)
    #[arg(short, long)]
    resolvers: Option<PathBuf>,

    /// Root tag prefixed to every reported path
    #[arg(long, default_value = "")]
    root: String,

    /// What to do when both sides hold different types
    #[arg(long, value_enum, default_value_t = OnMismatch::Abort)]
    on_mismatch: OnMismatch,

    /// Deepest nesting level to descend into
    #[arg(long, default_value_t = audit_diff::diff::DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Output location. Use '-' for stdout
    #[arg(short, long, default_value = "-")]
    output: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List all types in the schema
    ListTypes,
    /// Diff two YAML/JSON documents
    Diff {
        #[arg(long)]
        original: PathBuf,
        #[arg(long)]
        current: PathBuf,
    },
    /// List every leaf of a YAML/JSON document
    Resolve { file: PathBuf },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OnMismatch {
    Abort,
    Warn,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

impl From<OnMismatch> for MismatchPolicy {
    fn from(m: OnMismatch) -> Self {
        match m {
            OnMismatch::Abort => MismatchPolicy::Abort,
            OnMismatch::Warn => MismatchPolicy::Warn,
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let schema = match &cli.schema {
        Some(path) => {
            let content = fs::read_to_string(path)
                .map_err(|e| format!("Failed to read schema file {:?}: {}", path, e))?;
            Schema::from_yaml(&content).map_err(|e| format!("Failed to parse schema: {}", e))?
        }
        None => Schema::new(),
    };

    let mut builder = Differ::builder()
        .schema(schema)
        .on_type_mismatch(cli.on_mismatch.into())
        .max_depth(cli.max_depth);

    if let Some(path) = &cli.resolvers {
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read resolver file {:?}: {}", path, e))?;
        let tables: LookupTables = serde_yaml::from_str(&content)
            .map_err(|e| format!("Failed to parse resolvers: {}", e))?;
        for (key, table) in tables {
            log::debug!("registering lookup resolver {:?} with {} entries", key, table.len());
            builder = builder.resolver(key, move |raw: &Value| {
                table
                    .get(&raw.to_string())
                    .map_or_else(|| raw.clone(), |label| Value::from(label.as_str()))
            });
        }
    }
    let differ = builder.build();

    let mut output: Box<dyn Write> = if cli.output == "-" {
        Box::new(io::stdout())
    } else {
        Box::new(
            fs::File::create(&cli.output)
                .map_err(|e| format!("Failed to create output file {:?}: {}", cli.output, e))?,
        )
    };

    match cli.command {
        Command::ListTypes => {
            writeln!(output, "Types in schema:")?;
            for t in &differ.schema().types {
                let marker = if differ.schema().is_composite(&t.name) { " (diffable)" } else { "" };
                writeln!(output, "  - {}{}", t.name, marker)?;
            }
        }
        Command::Diff { original, current } => {
            let original = load(&original)?;
            let current = load(&current)?;
            let result = differ
                .diff(&cli.root, &original, &current)
                .map_err(|e| format!("Diff failed: {}", e))?;
            print_result(&result, cli.format, &mut output)?;
        }
        Command::Resolve { file } => {
            let value = load(&file)?;
            let result = differ
                .resolve_leaf_paths(&cli.root, &value)
                .map_err(|e| format!("Resolve failed: {}", e))?;
            print_result(&result, cli.format, &mut output)?;
        }
    }

    Ok(())
}

/// Loads a document, choosing the parser by file extension.
fn load(file: &FsPath) -> Result<Value, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(file)
        .map_err(|e| format!("Failed to read file {:?}: {}", file, e))?;
    let parsed = match file.extension().and_then(|e| e.to_str()) {
        Some("json") => value::from_json(&content).map_err(|e| e.to_string()),
        _ => value::from_yaml(&content).map_err(|e| e.to_string()),
    };
    Ok(parsed.map_err(|e| format!("Failed to parse {:?}: {}", file, e))?)
}

fn print_result(
    result: &DiffResult,
    format: Format,
    output: &mut dyn Write,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        Format::Text => {
            for (path, original) in result.iter() {
                writeln!(output, "{} = {}", path, original)?;
            }
        }
        Format::Json => {
            serde_json::to_writer_pretty(&mut *output, result)?;
            writeln!(output)?;
        }
    }
    Ok(())
}
