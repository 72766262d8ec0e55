//! One-time anchor overrides for a regime's first adjustment
//!
//! Revisions of the reference tool disagreed on the coefficient to use at the
//! earliest period. Rather than baking one choice into the tables, the replacement
//! is expressed as a rule supplied through configuration.

use serde::{Deserialize, Serialize};

use crate::error::{MovilidadError, MovilidadResult};
use crate::period::Period;

/// How the coefficient at the anchor period is recomputed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnchorAdjustment {
    /// Use a fixed coefficient instead of the table value
    Fixed { coefficient: f64 },
    /// Add a fixed amount to the base, then apply a rate:
    /// coefficient = (base + addend) * multiplier / base
    SupplementThenRate { addend: f64, multiplier: f64 },
}

/// Replaces the coefficient at `anchor` when the requested start is at or before it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnchorRule {
    pub anchor: Period,
    pub adjustment: AnchorAdjustment,
}

impl AnchorRule {
    pub fn new(anchor: Period, adjustment: AnchorAdjustment) -> MovilidadResult<Self> {
        let rule = Self { anchor, adjustment };
        rule.validate()?;
        Ok(rule)
    }

    /// March 2020 statutory increase: $1500 supplement plus 2.3%
    pub fn statutory_march_2020() -> Self {
        Self {
            anchor: march_2020(),
            adjustment: AnchorAdjustment::SupplementThenRate {
                addend: 1500.0,
                multiplier: 1.023,
            },
        }
    }

    /// Fixed judicial coefficient at `anchor` (1.156 in the validated Martinez/Italiano sheet)
    pub fn judicial_fixed(anchor: Period, coefficient: f64) -> MovilidadResult<Self> {
        Self::new(anchor, AnchorAdjustment::Fixed { coefficient })
    }

    /// Check the rule would produce a positive, finite coefficient
    pub fn validate(&self) -> MovilidadResult<()> {
        let invalid = |reason: String| Err(MovilidadError::InvalidRule { reason });

        match self.adjustment {
            AnchorAdjustment::Fixed { coefficient } => {
                if !(coefficient.is_finite() && coefficient > 0.0) {
                    return invalid(format!("fixed coefficient {} at {} must be positive", coefficient, self.anchor));
                }
            }
            AnchorAdjustment::SupplementThenRate { addend, multiplier } => {
                if !addend.is_finite() || addend < 0.0 {
                    return invalid(format!("addend {} at {} must be non-negative", addend, self.anchor));
                }
                if !(multiplier.is_finite() && multiplier > 0.0) {
                    return invalid(format!("multiplier {} at {} must be positive", multiplier, self.anchor));
                }
            }
        }
        Ok(())
    }

    /// Whether a request starting at `requested_start` is eligible for the override
    pub fn applies_to(&self, requested_start: Period) -> bool {
        requested_start <= self.anchor
    }

    /// Replacement coefficient for a given base amount.
    /// A zero base falls back to the bare multiplier so amounts stay zero.
    pub fn coefficient(&self, base_amount: f64) -> f64 {
        match self.adjustment {
            AnchorAdjustment::Fixed { coefficient } => coefficient,
            AnchorAdjustment::SupplementThenRate { addend, multiplier } => {
                if base_amount > 0.0 {
                    (base_amount + addend) * multiplier / base_amount
                } else {
                    multiplier
                }
            }
        }
    }
}

fn march_2020() -> Period {
    Period::new(2020, 3).expect("2020-03 is a valid period")
}
