//! CSV-based coefficient table loader
//!
//! Loads regime tables from CSV files in data/coefficients/

use std::fs::File;
use std::path::Path;

use super::{CoefficientEntry, CoefficientSeries, Regime};
use crate::error::{MovilidadError, MovilidadResult};
use crate::period::Period;

/// Default path to coefficient tables directory
pub const DEFAULT_COEFFICIENTS_PATH: &str = "data/coefficients";

/// Raw CSV row: `period,coefficient`
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    period: String,
    coefficient: f64,
}

impl CsvRow {
    fn to_entry(self, regime: Regime) -> MovilidadResult<CoefficientEntry> {
        let period = Period::parse(&self.period)?;
        CoefficientEntry::new(period, self.coefficient).ok_or_else(|| MovilidadError::InvalidTable {
            regime,
            reason: format!("coefficient {} at {} is not positive", self.coefficient, period),
        })
    }
}

/// File name holding a regime's table
pub fn file_name(regime: Regime) -> &'static str {
    match regime {
        Regime::Statutory => "anses.csv",
        Regime::Judicial => "justicia.csv",
    }
}

/// Load one regime's series from its CSV file in `dir`
pub fn load_series(dir: &Path, regime: Regime) -> MovilidadResult<CoefficientSeries> {
    let file = File::open(dir.join(file_name(regime)))?;
    load_series_from_reader(file, regime)
}

/// Load a regime's series from any reader (e.g., string buffer, request body)
pub fn load_series_from_reader<R: std::io::Read>(reader: R, regime: Regime) -> MovilidadResult<CoefficientSeries> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut entries = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        entries.push(row.to_entry(regime)?);
    }

    CoefficientSeries::new(regime, entries)
}
