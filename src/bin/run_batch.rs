//! Run comparisons for every case in a CSV file
//!
//! Usage: run_batch [cases.csv] [--config rules.json] [--data-dir dir] [--output out.csv]
//! Outputs one row per case to batch_comparison_output.csv by default

use anyhow::{Context, Result};
use clap::Parser;
use movilidad::cases::{load_cases, write_batch_output, DEFAULT_BATCH_OUTPUT_PATH, DEFAULT_CASES_PATH};
use movilidad::{CalculatorConfig, CoefficientTables, ComparisonRunner};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "run_batch", version, about = "Compare ANSeS vs Martinez/Italiano for every case in a CSV file")]
struct Cli {
    /// Case file with name,base_amount,start_period columns
    #[arg(default_value = DEFAULT_CASES_PATH)]
    cases: PathBuf,

    /// Directory with anses.csv and justicia.csv (built-in tables otherwise)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// JSON file with anchor rules
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where to write the per-case results
    #[arg(long, default_value = DEFAULT_BATCH_OUTPUT_PATH)]
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let start = Instant::now();

    let tables = match &cli.data_dir {
        Some(dir) => CoefficientTables::from_csv_path(dir)
            .with_context(|| format!("Failed to load coefficient tables from {}", dir.display()))?,
        None => CoefficientTables::reference(),
    };
    let config = match &cli.config {
        Some(path) => CalculatorConfig::from_json_path(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => CalculatorConfig::default(),
    };

    println!("Loading cases from {}...", cli.cases.display());
    let cases = load_cases(&cli.cases)
        .with_context(|| format!("Failed to load cases from {}", cli.cases.display()))?;
    println!("Loaded {} cases in {:?}", cases.len(), start.elapsed());

    let runner = ComparisonRunner::with_tables(Arc::new(tables), config);

    println!("Running comparisons...");
    let compare_start = Instant::now();
    let results = runner.run_cases(&cases);
    println!("Comparisons complete in {:?}", compare_start.elapsed());

    let file = File::create(&cli.output).context("Failed to create output file")?;
    write_batch_output(BufWriter::new(file), &cases, &results)
        .with_context(|| format!("Failed to write {}", cli.output.display()))?;
    println!("Output written to {}", cli.output.display());

    let mut failed = 0;
    let mut clamped = 0;
    let mut total_difference = 0.0;

    for (case, result) in cases.iter().zip(&results) {
        match result {
            Ok(comparison) => {
                if !comparison.notices.is_empty() {
                    clamped += 1;
                }
                total_difference += comparison.difference;
            }
            Err(e) => {
                failed += 1;
                log::warn!("Case {} failed: {}", case.name, e);
            }
        }
    }

    println!("\nBatch Summary:");
    println!("  Cases: {}", cases.len());
    println!("  Succeeded: {}", cases.len() - failed);
    println!("  Failed: {}", failed);
    println!("  Clamped start periods: {}", clamped);
    println!("  Total judicial - statutory difference: ${:.2}", total_difference);

    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
