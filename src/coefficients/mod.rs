//! Coefficient tables for the two movilidad regimes
//!
//! Each regime owns one chronological series of monthly multiplicative coefficients.
//! Tables are built once at startup (from the built-in reference data or from CSV)
//! and are read-only afterwards.

mod series;
pub mod tables;
pub mod loader;

pub use series::{CoefficientEntry, CoefficientSeries};
pub use loader::DEFAULT_COEFFICIENTS_PATH;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use crate::error::{MovilidadError, MovilidadResult};
use crate::period::Period;

/// Adjustment rule set a trajectory follows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Regime {
    /// Law-based index applied by ANSeS
    Statutory,
    /// Court-ruling index (Martinez / Italiano)
    Judicial,
}

impl Regime {
    pub const ALL: [Regime; 2] = [Regime::Statutory, Regime::Judicial];

    /// Display name used in reports and chart legends
    pub fn label(&self) -> &'static str {
        match self {
            Regime::Statutory => "ANSeS",
            Regime::Judicial => "Justicia",
        }
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// Container for both regimes' coefficient series
#[derive(Debug, Clone)]
pub struct CoefficientTables {
    statutory: CoefficientSeries,
    judicial: CoefficientSeries,
}

impl CoefficientTables {
    /// Pair two series, checking each is tagged with the slot it fills
    pub fn new(statutory: CoefficientSeries, judicial: CoefficientSeries) -> MovilidadResult<Self> {
        for (expected, series) in [(Regime::Statutory, &statutory), (Regime::Judicial, &judicial)] {
            if series.regime() != expected {
                return Err(MovilidadError::InvalidTable {
                    regime: expected,
                    reason: format!("series belongs to {}", series.regime()),
                });
            }
        }
        Ok(Self { statutory, judicial })
    }

    /// Built-in reference tables
    pub fn reference() -> Self {
        Self {
            statutory: tables::statutory_series(),
            judicial: tables::judicial_series(),
        }
    }

    /// Load both tables from CSV files in the default location (data/coefficients/)
    pub fn from_csv() -> MovilidadResult<Self> {
        Self::from_csv_path(Path::new(DEFAULT_COEFFICIENTS_PATH))
    }

    /// Load both tables from CSV files in a specific directory
    pub fn from_csv_path(path: &Path) -> MovilidadResult<Self> {
        let statutory = loader::load_series(path, Regime::Statutory)?;
        let judicial = loader::load_series(path, Regime::Judicial)?;
        log::info!(
            "Loaded coefficient tables from {}: {} {} entries, {} {} entries",
            path.display(),
            Regime::Statutory,
            statutory.len(),
            Regime::Judicial,
            judicial.len(),
        );
        Self::new(statutory, judicial)
    }

    pub fn series_for(&self, regime: Regime) -> &CoefficientSeries {
        match regime {
            Regime::Statutory => &self.statutory,
            Regime::Judicial => &self.judicial,
        }
    }

    /// Clamp floor for comparisons: the later of the two epochs, so both
    /// series cover every compared period
    pub fn common_epoch(&self) -> Period {
        std::cmp::max(self.statutory.epoch(), self.judicial.epoch())
    }

    /// Ascending union of both series' periods at or after `from`
    pub fn periods_from(&self, from: Period) -> Vec<Period> {
        let union: BTreeSet<Period> = Regime::ALL
            .iter()
            .flat_map(|&regime| self.series_for(regime).entries_from(from))
            .map(|entry| entry.period)
            .collect();
        union.into_iter().collect()
    }
}

impl Default for CoefficientTables {
    fn default() -> Self {
        Self::reference()
    }
}
