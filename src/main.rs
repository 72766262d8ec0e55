//! Movilidad CLI
//!
//! Compares ANSeS and Martinez/Italiano trajectories for one case

use anyhow::{Context, Result};
use clap::Parser;
use movilidad::{
    AnchorRule, CalculationRequest, CalculatorConfig, CoefficientTables, ComparisonResult, ComparisonRunner,
    Regime,
};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "movilidad", version, about = "Compare ANSeS vs Martinez/Italiano movilidad")]
struct Cli {
    /// Base benefit amount
    #[arg(long)]
    base: f64,

    /// Period of the base amount (YYYY-MM)
    #[arg(long, default_value = "2020-03")]
    period: String,

    /// Case name shown in the report
    #[arg(long)]
    name: Option<String>,

    /// Directory with anses.csv and justicia.csv (built-in tables otherwise)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// JSON file with anchor rules
    #[arg(long)]
    config: Option<PathBuf>,

    /// Apply the March 2020 statutory supplement ($1500 + 2.3%)
    #[arg(long, default_value_t = false)]
    statutory_march_2020: bool,

    /// Fixed judicial coefficient at the judicial epoch (e.g. 1.156)
    #[arg(long)]
    judicial_anchor: Option<f64>,

    /// Print the comparison as JSON
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Write the aligned trajectory to this CSV file
    #[arg(long)]
    csv_out: Option<PathBuf>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let tables = match &cli.data_dir {
        Some(dir) => CoefficientTables::from_csv_path(dir)
            .with_context(|| format!("Failed to load coefficient tables from {}", dir.display()))?,
        None => CoefficientTables::reference(),
    };

    let mut config = match &cli.config {
        Some(path) => CalculatorConfig::from_json_path(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => CalculatorConfig::default(),
    };
    if cli.statutory_march_2020 {
        config = config.with_anchor(Regime::Statutory, AnchorRule::statutory_march_2020());
    }
    if let Some(coefficient) = cli.judicial_anchor {
        let epoch = tables.series_for(Regime::Judicial).epoch();
        config = config.with_anchor(Regime::Judicial, AnchorRule::judicial_fixed(epoch, coefficient)?);
    }

    let request = CalculationRequest::parse(cli.base, &cli.period, cli.name.as_deref())?;
    let runner = ComparisonRunner::with_tables(Arc::new(tables), config);
    let result = runner.compare(&request)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_report(&request, &result);
    }

    if let Some(path) = &cli.csv_out {
        write_trajectory_csv(path, &result)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        if !cli.json {
            println!("\nTrajectory written to: {}", path.display());
        }
    }

    Ok(())
}

fn print_report(request: &CalculationRequest, result: &ComparisonResult) {
    println!("Calculadora Martinez/Italiano");
    println!("=============================\n");

    if let Some(label) = &result.label {
        println!("Case: {}", label);
    }
    println!("  Base amount: ${:.2}", request.base_amount);
    println!("  Start period: {} (effective {})", result.requested_start, result.effective_start);

    for notice in &result.notices {
        println!("  Warning: {}", notice);
    }

    println!();
    println!("{:<10} {:>16} {:>16}", "Period", Regime::Statutory, Regime::Judicial);
    println!("{}", "-".repeat(44));
    for row in result.rows() {
        println!("{:<10} {:>16.2} {:>16.2}", row.period, row.statutory, row.judicial);
    }

    println!("\nResults:");
    println!("  Updated per {}: ${:.2}", Regime::Statutory, result.statutory.final_amount);
    println!("  Updated per {}: ${:.2}", Regime::Judicial, result.judicial.final_amount);
    println!("  Difference: ${:.2} ({:+.2}%)", result.difference, result.percentage);
}

fn write_trajectory_csv(path: &Path, result: &ComparisonResult) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    writeln!(file, "Period,{},{}", Regime::Statutory, Regime::Judicial)?;
    for row in result.rows() {
        writeln!(file, "{},{:.8},{:.8}", row.period, row.statutory, row.judicial)?;
    }
    Ok(())
}
