//! limpar CLI - score cleaning runs from the command line.
//!
//! Loads the original and cleaned tables from Parquet/CSV/JSONL files
//! (chosen by extension) and prints the requested metrics as text or
//! pretty JSON.

use std::{path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};

use crate::{
    corruption::{corruption_by_column, corruption_rate},
    detection::{classify, DetectionMetrics},
    drift::global_drift,
    report::{evaluate, TaskSpec},
    Error, Table,
};

/// limpar - Data Cleaning Evaluation in Pure Rust
#[derive(Parser)]
#[command(name = "limpar")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all three metrics for one cleaning run
    Evaluate {
        /// Path to the original (ground truth) table
        #[arg(long)]
        original: PathBuf,
        /// Path to the agent's cleaned table
        #[arg(long)]
        cleaned: PathBuf,
        /// Injected row indices (comma-separated, e.g. "0,2,7")
        #[arg(long, default_value = "")]
        injected: String,
        /// Protected column names (comma-separated)
        #[arg(long, default_value = "")]
        protected: String,
        /// Columns to score for drift (comma-separated; default all)
        #[arg(long)]
        columns: Option<String>,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Row-level detection metrics only
    Detect {
        /// Path to the original (ground truth) table
        #[arg(long)]
        original: PathBuf,
        /// Path to the agent's cleaned table
        #[arg(long)]
        cleaned: PathBuf,
        /// Injected row indices (comma-separated)
        #[arg(long, default_value = "")]
        injected: String,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Protected-column corruption metrics
    Corruption {
        /// Path to the original (ground truth) table
        #[arg(long)]
        original: PathBuf,
        /// Path to the agent's cleaned table
        #[arg(long)]
        cleaned: PathBuf,
        /// Protected column names (comma-separated)
        #[arg(long)]
        protected: String,
        /// Injected row indices; omit for the full-table per-column
        /// breakdown
        #[arg(long)]
        injected: Option<String>,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Per-column distribution drift
    Drift {
        /// Path to the original (ground truth) table
        #[arg(long)]
        original: PathBuf,
        /// Path to the agent's cleaned table
        #[arg(long)]
        cleaned: PathBuf,
        /// Columns to score (comma-separated; default all)
        #[arg(long)]
        columns: Option<String>,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Display table information
    Info {
        /// Path to a table file
        path: PathBuf,
    },
}

/// Parse the CLI arguments and run the selected command.
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Evaluate {
            original,
            cleaned,
            injected,
            protected,
            columns,
            json,
        } => cmd_evaluate(
            &original,
            &cleaned,
            &injected,
            &protected,
            columns.as_deref(),
            json,
        ),
        Commands::Detect {
            original,
            cleaned,
            injected,
            json,
        } => cmd_detect(&original, &cleaned, &injected, json),
        Commands::Corruption {
            original,
            cleaned,
            protected,
            injected,
            json,
        } => cmd_corruption(&original, &cleaned, &protected, injected.as_deref(), json),
        Commands::Drift {
            original,
            cleaned,
            columns,
            json,
        } => cmd_drift(&original, &cleaned, columns.as_deref(), json),
        Commands::Info { path } => cmd_info(&path),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_evaluate(
    original: &PathBuf,
    cleaned: &PathBuf,
    injected: &str,
    protected: &str,
    columns: Option<&str>,
    json: bool,
) -> crate::Result<()> {
    let original = load_table(original)?;
    let cleaned = load_table(cleaned)?;

    let mut task = TaskSpec::new()
        .with_injected_rows(parse_indices(injected)?)
        .with_protected_columns(parse_names(protected));
    if let Some(subset) = columns {
        task = task.with_drift_columns(parse_names(subset));
    }

    let report = evaluate(&original, &cleaned, &task)?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).map_err(|e| Error::Format(e.to_string()))?
        );
        return Ok(());
    }

    println!("Detection:");
    print_detection(&report.detection);
    println!();
    println!("Corruption:");
    println!("  rate:            {:.4}", report.corruption.corruption_rate);
    println!(
        "  edits/injected:  {}/{}",
        report.corruption.edits_in_protected, report.corruption.total_injected_rows
    );
    if !report.corruption.protected_columns_affected.is_empty() {
        println!(
            "  affected:        {}",
            report.corruption.protected_columns_affected.join(", ")
        );
    }
    println!();
    println!("Drift:");
    for col in &report.drift.by_column {
        println!(
            "  {:<20} {:.4} ({})",
            col.column,
            col.score,
            col.method.name()
        );
    }
    println!("  global:          {:.4}", report.drift.global_drift);

    Ok(())
}

fn cmd_detect(
    original: &PathBuf,
    cleaned: &PathBuf,
    injected: &str,
    json: bool,
) -> crate::Result<()> {
    let original = load_table(original)?;
    let cleaned = load_table(cleaned)?;

    let task = TaskSpec::new().with_injected_rows(parse_indices(injected)?);
    let mask = task.injected_mask(original.len())?;

    let counts = classify(&original, &cleaned, &mask)?;
    let metrics = DetectionMetrics::from_counts(counts);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&metrics).map_err(|e| Error::Format(e.to_string()))?
        );
        return Ok(());
    }

    print_detection(&metrics);
    Ok(())
}

fn cmd_corruption(
    original: &PathBuf,
    cleaned: &PathBuf,
    protected: &str,
    injected: Option<&str>,
    json: bool,
) -> crate::Result<()> {
    let original = load_table(original)?;
    let cleaned = load_table(cleaned)?;
    let protected = parse_names(protected);

    if let Some(injected) = injected {
        let rows = parse_indices(injected)?;
        let report = corruption_rate(&original, &cleaned, &protected, &rows)?;

        if json {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).map_err(|e| Error::Format(e.to_string()))?
            );
            return Ok(());
        }

        println!("Corruption rate:   {:.4}", report.corruption_rate);
        println!("Protected edits:   {}", report.edits_in_protected);
        println!("Injected rows:     {}", report.total_injected_rows);
        if !report.protected_columns_affected.is_empty() {
            println!(
                "Affected columns:  {}",
                report.protected_columns_affected.join(", ")
            );
        }
    } else {
        let breakdown = corruption_by_column(&original, &cleaned, &protected)?;

        if json {
            println!(
                "{}",
                serde_json::to_string_pretty(&breakdown)
                    .map_err(|e| Error::Format(e.to_string()))?
            );
            return Ok(());
        }

        println!("Edits per protected column (all rows):");
        for col in &breakdown {
            println!("  {:<20} {}", col.column, col.edits);
        }
    }

    Ok(())
}

fn cmd_drift(
    original: &PathBuf,
    cleaned: &PathBuf,
    columns: Option<&str>,
    json: bool,
) -> crate::Result<()> {
    let original = load_table(original)?;
    let cleaned = load_table(cleaned)?;

    let subset = columns.map(parse_names);
    let report = global_drift(&original, &cleaned, subset.as_deref())?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).map_err(|e| Error::Format(e.to_string()))?
        );
        return Ok(());
    }

    for col in &report.by_column {
        println!(
            "  {:<20} {:.4} ({})",
            col.column,
            col.score,
            col.method.name()
        );
    }
    println!("Global drift: {:.4}", report.global_drift);

    Ok(())
}

fn cmd_info(path: &PathBuf) -> crate::Result<()> {
    let table = load_table(path)?;

    println!("File: {}", path.display());
    println!("Rows: {}", table.len());
    println!("Columns: {}", table.schema().fields().len());
    for (i, field) in table.schema().fields().iter().enumerate() {
        println!("  {}: {} ({})", i, field.name(), field.data_type());
    }

    Ok(())
}

fn print_detection(metrics: &DetectionMetrics) {
    println!("  f1:              {:.4}", metrics.f1);
    println!("  precision:       {:.4}", metrics.precision);
    println!("  recall:          {:.4}", metrics.recall);
    println!("  specificity:     {:.4}", metrics.specificity);
    println!("  fpr:             {:.4}", metrics.false_positive_rate);
    println!(
        "  support:         tp={} fp={} tn={} fn={}",
        metrics.support.true_positives,
        metrics.support.false_positives,
        metrics.support.true_negatives,
        metrics.support.false_negatives
    );
}

fn load_table(path: &PathBuf) -> crate::Result<Table> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    match ext {
        "parquet" => Table::from_parquet(path),
        "csv" => Table::from_csv(path),
        "json" | "jsonl" => Table::from_json(path),
        ext => Err(Error::unsupported_format(ext)),
    }
}

/// Parse a comma-separated list of row indices; empty input is an empty
/// list.
fn parse_indices(input: &str) -> crate::Result<Vec<usize>> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<usize>()
                .map_err(|_| Error::invalid_config(format!("invalid row index '{}'", s)))
        })
        .collect()
}

/// Parse a comma-separated list of column names; empty input is an
/// empty list.
fn parse_names(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
