//! Calculation output structures

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::coefficients::Regime;
use crate::period::Period;

/// Cumulative amount for one regime at one period
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    pub period: Period,
    pub amount: f64,
}

/// Non-fatal condition reported alongside a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    /// The requested start preceded available data and was moved forward
    ClampedStartDate { requested: Period, effective: Period },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::ClampedStartDate { requested, effective } => write!(
                f,
                "Start period {} is earlier than the available data; using {} instead",
                requested, effective
            ),
        }
    }
}

/// Compounded result for one regime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub regime: Regime,

    /// Start period as requested by the caller
    pub requested_start: Period,

    /// Start period after clamping to available data
    pub effective_start: Period,

    /// Base amount times every applicable coefficient
    pub final_amount: f64,

    /// Month-by-month amounts from the effective start onward
    pub trajectory: Vec<TrajectoryPoint>,

    pub notices: Vec<Notice>,
}

impl CalculationResult {
    pub fn was_clamped(&self) -> bool {
        self.notices
            .iter()
            .any(|notice| matches!(notice, Notice::ClampedStartDate { .. }))
    }

    /// Total adjustment as a multiple of the base (1.0 when the base is zero)
    pub fn growth_factor(&self, base_amount: f64) -> f64 {
        if base_amount == 0.0 {
            1.0
        } else {
            self.final_amount / base_amount
        }
    }
}
