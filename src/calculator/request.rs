//! Calculation input as supplied by the presentation layer

use serde::{Deserialize, Serialize};

use crate::error::{MovilidadError, MovilidadResult};
use crate::period::Period;

/// One user interaction: a base benefit, the period it was paid, and a case name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRequest {
    pub base_amount: f64,
    pub start_period: Period,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl CalculationRequest {
    pub fn new(base_amount: f64, start_period: Period, label: Option<String>) -> MovilidadResult<Self> {
        let request = Self { base_amount, start_period, label };
        request.validate()?;
        Ok(request)
    }

    /// Build from raw form input, validating the period string and amount
    pub fn parse(base_amount: f64, start_period: &str, label: Option<&str>) -> MovilidadResult<Self> {
        let start_period = Period::parse(start_period)?;
        let label = label.map(str::trim).filter(|s| !s.is_empty()).map(String::from);
        Self::new(base_amount, start_period, label)
    }

    /// Zero is allowed; negative, NaN and infinite amounts are not
    pub fn validate(&self) -> MovilidadResult<()> {
        if self.base_amount.is_finite() && self.base_amount >= 0.0 {
            Ok(())
        } else {
            Err(MovilidadError::InvalidAmount { amount: self.base_amount })
        }
    }
}
