//! Chronological coefficient series for a single regime

use serde::{Deserialize, Serialize};

use super::Regime;
use crate::error::{MovilidadError, MovilidadResult};
use crate::period::Period;

/// One monthly adjustment factor (e.g. 1.05 = +5%)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoefficientEntry {
    pub period: Period,
    pub coefficient: f64,
}

impl CoefficientEntry {
    /// Create an entry, returning None unless the coefficient is positive and finite
    pub fn new(period: Period, coefficient: f64) -> Option<Self> {
        (coefficient.is_finite() && coefficient > 0.0).then_some(Self { period, coefficient })
    }
}

/// Ordered, non-empty series of entries with strictly increasing periods
#[derive(Debug, Clone)]
pub struct CoefficientSeries {
    regime: Regime,
    entries: Vec<CoefficientEntry>,
}

impl CoefficientSeries {
    /// Validate and wrap a list of entries
    pub fn new(regime: Regime, entries: Vec<CoefficientEntry>) -> MovilidadResult<Self> {
        let invalid = |reason: String| MovilidadError::InvalidTable { regime, reason };

        if entries.is_empty() {
            return Err(invalid("series is empty".to_string()));
        }

        for entry in &entries {
            if !(entry.coefficient.is_finite() && entry.coefficient > 0.0) {
                return Err(invalid(format!(
                    "coefficient {} at {} is not positive",
                    entry.coefficient, entry.period
                )));
            }
        }

        for pair in entries.windows(2) {
            if pair[1].period <= pair[0].period {
                return Err(invalid(format!(
                    "period {} does not follow {}",
                    pair[1].period, pair[0].period
                )));
            }
        }

        Ok(Self { regime, entries })
    }

    /// Build from `(YYYY-MM, coefficient)` pairs
    pub fn from_pairs(regime: Regime, pairs: &[(&str, f64)]) -> MovilidadResult<Self> {
        let mut entries = Vec::with_capacity(pairs.len());
        for &(period, coefficient) in pairs {
            let period = Period::parse(period)?;
            let entry = CoefficientEntry::new(period, coefficient).ok_or_else(|| {
                MovilidadError::InvalidTable {
                    regime,
                    reason: format!("coefficient {} at {} is not positive", coefficient, period),
                }
            })?;
            entries.push(entry);
        }
        Self::new(regime, entries)
    }

    pub fn regime(&self) -> Regime {
        self.regime
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: `new` rejects empty series, so `epoch` and `last_period` never panic
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[CoefficientEntry] {
        &self.entries
    }

    /// Earliest period in the series
    pub fn epoch(&self) -> Period {
        self.entries[0].period
    }

    /// Latest period in the series
    pub fn last_period(&self) -> Period {
        self.entries[self.entries.len() - 1].period
    }

    /// Coefficient recorded for exactly `period`, if any
    pub fn coefficient_at(&self, period: Period) -> Option<f64> {
        self.entries
            .iter()
            .find(|entry| entry.period == period)
            .map(|entry| entry.coefficient)
    }

    /// All entries at or after `period`, in chronological order.
    /// Empty when `period` is past the last entry.
    pub fn entries_from(&self, period: Period) -> &[CoefficientEntry] {
        let start = self
            .entries
            .iter()
            .position(|entry| entry.period >= period)
            .unwrap_or(self.entries.len());
        &self.entries[start..]
    }
}
