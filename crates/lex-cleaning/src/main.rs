//! CLI entry point for the customer record cleaning pipeline.

use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};
use lex_cleaning::{
    ActionType, CleaningConfig, CleaningPipeline, CleaningSummary, NameCollisionPolicy,
};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// CLI-compatible column name collision policy
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliCollisionPolicy {
    /// Stop with an error naming the colliding columns
    Fail,
    /// Append _2, _3, ... to later duplicates
    Suffix,
}

impl From<CliCollisionPolicy> for NameCollisionPolicy {
    fn from(cli: CliCollisionPolicy) -> Self {
        match cli {
            CliCollisionPolicy::Fail => NameCollisionPolicy::Fail,
            CliCollisionPolicy::Suffix => NameCollisionPolicy::Suffix,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    author = "Lex Machina Team",
    version,
    about = "Customer Record Cleaning Pipeline",
    long_about = "Cleans a customer/insurance CSV: normalizes column names, removes empty and \
                  duplicate rows, standardizes categorical values and fills missing cells.\n\n\
                  EXAMPLES:\n  \
                  # Clean a file, writing data_cleaned.csv next to it\n  \
                  lex-cleaning -i data.csv\n\n  \
                  # Custom output and premium cap\n  \
                  lex-cleaning -i data.csv -o clean.csv --premium-cap 750\n\n  \
                  # Machine-readable summary\n  \
                  lex-cleaning -i data.csv --json | jq .rows_after"
)]
struct Args {
    /// Path to the CSV file to clean
    #[arg(short, long)]
    input: String,

    /// Path of the cleaned CSV
    ///
    /// If not specified, writes "<input_stem>_cleaned.csv" next to the input
    #[arg(short, long)]
    output: Option<String>,

    /// Cap applied to monthly_premium_auto
    #[arg(long, default_value = "1000")]
    premium_cap: f64,

    /// What to do when two columns normalize to the same name
    #[arg(long, value_enum, default_value = "fail")]
    on_collision: CliCollisionPolicy,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,

    /// Output the cleaning summary as JSON to stdout
    ///
    /// Disables all progress logs; only outputs the final JSON summary.
    #[arg(long)]
    json: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    if !Path::new(&args.input).exists() {
        return Err(anyhow!("Input file not found: {}", args.input));
    }

    let output_path = args
        .output
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| default_output_path(&args.input));

    info!("Loading dataset from: {}", args.input);
    let data = load_csv(&args.input)?;
    info!("Dataset loaded successfully: {:?}", data.shape());

    let config = CleaningConfig::builder()
        .premium_cap(args.premium_cap)
        .name_collision(args.on_collision.into())
        .build()?;

    let pipeline = CleaningPipeline::builder().config(config).build()?;

    let result = match pipeline.process(data) {
        Ok(result) => result,
        Err(e) => {
            error!("Pipeline failed: {}", e);
            return Err(anyhow!("Pipeline failed: {}", e));
        }
    };

    let mut cleaned = result.data;
    write_csv(&mut cleaned, &output_path)?;
    info!("Cleaned dataset saved: {}", output_path.display());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result.summary)?);
        return Ok(());
    }

    if !args.quiet {
        print_human_readable_summary(&result.summary, &args.input, &output_path);
    }

    Ok(())
}

/// `<dir>/<stem>_cleaned.csv` for an input at `<dir>/<stem>.<ext>`.
fn default_output_path(input: &str) -> PathBuf {
    let path = Path::new(input);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    path.with_file_name(format!("{}_cleaned.csv", stem))
}

/// Load a CSV with a header row. Dates are left as text for the pipeline.
///
/// The schema is first inferred from the leading rows. If a later row breaks
/// that schema, the file is read again with inference over every row.
fn load_csv(path: &str) -> Result<DataFrame> {
    match read_csv(path, Some(100)) {
        Ok(df) => return Ok(df),
        Err(e) => {
            debug!("Loading with a 100-row schema failed: {}", e);
        }
    }

    read_csv(path, None).with_context(|| format!("Failed to read CSV: {}", path))
}

fn read_csv(path: &str, infer_schema_length: Option<usize>) -> PolarsResult<DataFrame> {
    CsvReadOptions::default()
        .with_infer_schema_length(infer_schema_length)
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()
}

fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    let mut file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;

    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .with_quote_char(b'"')
        .finish(df)?;

    Ok(())
}

/// Print a human-readable summary of the run.
///
/// Uses `println!` so the summary shows regardless of log level.
fn print_human_readable_summary(summary: &CleaningSummary, input: &str, output: &Path) {
    println!("\n{}", "=".repeat(80));
    println!("CLEANING SUMMARY");
    println!("{}", "=".repeat(80));
    println!("  Input:    {}", input);
    println!("  Output:   {}", output.display());
    println!(
        "  Rows:     {} -> {} ({} removed)",
        summary.rows_before,
        summary.rows_after,
        summary.rows_removed()
    );
    println!(
        "  Columns:  {} -> {} ({} removed)",
        summary.columns_before,
        summary.columns_after,
        summary.columns_removed()
    );
    println!("  Duration: {} ms", summary.duration_ms);
    println!();

    let action_types = [
        ActionType::ColumnRenamed,
        ActionType::RowsRemoved,
        ActionType::ColumnRemoved,
        ActionType::DuplicatesRemoved,
        ActionType::TextNormalized,
        ActionType::ValueMapped,
        ActionType::ValueCapped,
        ActionType::ValueCleaned,
        ActionType::TypeCorrected,
        ActionType::ValueImputed,
    ];

    println!("Actions:");
    for action_type in action_types {
        let actions: Vec<_> = summary.actions_of(action_type).collect();
        if actions.is_empty() {
            continue;
        }
        let count: usize = actions.iter().map(|a| a.count).sum();
        println!(
            "  {:<20} {:>6} ({} targets)",
            action_type.display_name(),
            count,
            actions.len()
        );
    }
    println!();

    println!("Columns:");
    for entry in summary.column_kinds.iter() {
        println!("  {:<32} {}", entry.name, entry.kind);
    }
    println!();

    if !summary.warnings.is_empty() {
        println!("Warnings:");
        for warning in &summary.warnings {
            println!("  ! {}", warning);
        }
        println!();
    }

    println!("Use --json for machine-readable output");
    println!("{}", "=".repeat(80));
}
