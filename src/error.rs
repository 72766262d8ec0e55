//! Error taxonomy for movilidad calculations
//!
//! Request errors (`MalformedPeriod`, `InvalidAmount`, `NoDataForPeriod`) abort a single
//! comparison. Table and config errors abort startup. Neither kind touches the loaded tables.

use thiserror::Error;

use crate::coefficients::Regime;
use crate::period::Period;

#[derive(Error, Debug)]
pub enum MovilidadError {
    #[error("Malformed period '{input}': expected YYYY-MM")]
    MalformedPeriod { input: String },

    #[error("Invalid amount {amount}: base amount must be a non-negative number")]
    InvalidAmount { amount: f64 },

    #[error("No {regime} coefficient data at or after {period}")]
    NoDataForPeriod { regime: Regime, period: Period },

    #[error("Invalid {regime} coefficient table: {reason}")]
    InvalidTable { regime: Regime, reason: String },

    #[error("Invalid anchor rule: {reason}")]
    InvalidRule { reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MovilidadError {
    /// True for errors caused by the caller's input rather than by the reference data
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            MovilidadError::MalformedPeriod { .. } | MovilidadError::InvalidAmount { .. }
        )
    }
}

pub type MovilidadResult<T> = Result<T, MovilidadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_error_classification() {
        let malformed = MovilidadError::MalformedPeriod { input: "2020/03".into() };
        assert!(malformed.is_input_error());
        assert_eq!(malformed.to_string(), "Malformed period '2020/03': expected YYYY-MM");

        let no_data = MovilidadError::NoDataForPeriod {
            regime: Regime::Judicial,
            period: Period::new(2030, 1).unwrap(),
        };
        assert!(!no_data.is_input_error());
        assert_eq!(no_data.to_string(), "No Justicia coefficient data at or after 2030-01");
    }
}
