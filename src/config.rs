//! Calculator configuration
//!
//! Holds the per-regime anchor overrides. The default configuration applies the
//! coefficient tables unmodified.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::calculator::AnchorRule;
use crate::coefficients::Regime;
use crate::error::MovilidadResult;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalculatorConfig {
    #[serde(default)]
    pub statutory_anchor: Option<AnchorRule>,

    #[serde(default)]
    pub judicial_anchor: Option<AnchorRule>,
}

impl CalculatorConfig {
    /// Load and validate a JSON config file
    pub fn from_json_path(path: &Path) -> MovilidadResult<Self> {
        let file = File::open(path)?;
        let config: Self = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        log::info!("Loaded calculator config from {}", path.display());
        Ok(config)
    }

    pub fn from_json_str(json: &str) -> MovilidadResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> MovilidadResult<()> {
        for rule in [&self.statutory_anchor, &self.judicial_anchor].into_iter().flatten() {
            rule.validate()?;
        }
        Ok(())
    }

    pub fn anchor_for(&self, regime: Regime) -> Option<&AnchorRule> {
        match regime {
            Regime::Statutory => self.statutory_anchor.as_ref(),
            Regime::Judicial => self.judicial_anchor.as_ref(),
        }
    }

    /// Set or replace the anchor rule for one regime
    pub fn with_anchor(mut self, regime: Regime, rule: AnchorRule) -> Self {
        match regime {
            Regime::Statutory => self.statutory_anchor = Some(rule),
            Regime::Judicial => self.judicial_anchor = Some(rule),
        }
        self
    }
}
