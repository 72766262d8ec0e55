//! Comparison of the statutory and judicial trajectories
//!
//! Both regimes are clamped to a common start so their trajectories line up period by
//! period. The runner also handles batches of cases, compared in parallel.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::calculator::{CalculationRequest, CalculationResult, Notice, TrajectoryCalculator, clamp_start};
use crate::cases::CaseRow;
use crate::coefficients::{CoefficientTables, Regime};
use crate::config::CalculatorConfig;
use crate::error::MovilidadResult;
use crate::period::Period;

/// One aligned chart row
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub period: Period,
    pub statutory: f64,
    pub judicial: f64,
}

/// Statutory vs judicial outcome for one case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Case name, for display only
    pub label: Option<String>,
    pub requested_start: Period,
    pub effective_start: Period,
    pub statutory: CalculationResult,
    pub judicial: CalculationResult,

    /// Judicial minus statutory final amount
    pub difference: f64,

    /// Difference as a percentage of the statutory amount (0 when that amount is 0)
    pub percentage: f64,

    pub notices: Vec<Notice>,
}

impl ComparisonResult {
    /// Combine two regime results. Pure; performs no lookups.
    pub fn assemble(label: Option<String>, statutory: CalculationResult, judicial: CalculationResult) -> Self {
        let difference = judicial.final_amount - statutory.final_amount;
        let percentage = if statutory.final_amount != 0.0 {
            difference / statutory.final_amount * 100.0
        } else {
            0.0
        };

        let mut notices = statutory.notices.clone();
        for notice in &judicial.notices {
            if !notices.contains(notice) {
                notices.push(*notice);
            }
        }

        Self {
            label,
            requested_start: statutory.requested_start,
            effective_start: std::cmp::max(statutory.effective_start, judicial.effective_start),
            statutory,
            judicial,
            difference,
            percentage,
            notices,
        }
    }

    pub fn final_amount(&self, regime: Regime) -> f64 {
        match regime {
            Regime::Statutory => self.statutory.final_amount,
            Regime::Judicial => self.judicial.final_amount,
        }
    }

    /// Both trajectories cover the same periods in the same order
    pub fn is_aligned(&self) -> bool {
        self.statutory.trajectory.len() == self.judicial.trajectory.len()
            && self
                .statutory
                .trajectory
                .iter()
                .zip(&self.judicial.trajectory)
                .all(|(s, j)| s.period == j.period)
    }

    /// Paired series for charting, one row per period
    pub fn rows(&self) -> Vec<ComparisonRow> {
        self.statutory
            .trajectory
            .iter()
            .zip(&self.judicial.trajectory)
            .filter(|(s, j)| s.period == j.period)
            .map(|(s, j)| ComparisonRow {
                period: s.period,
                statutory: s.amount,
                judicial: j.amount,
            })
            .collect()
    }
}

/// Pre-loaded comparison runner for single and batch comparisons
///
/// # Example
/// ```ignore
/// let runner = ComparisonRunner::from_csv(CalculatorConfig::default())?;
/// let request = CalculationRequest::parse(38000.0, "2021-10", Some("Case 1"))?;
/// let result = runner.compare(&request)?;
/// println!("{:.2}%", result.percentage);
/// ```
#[derive(Debug, Clone)]
pub struct ComparisonRunner {
    calculator: TrajectoryCalculator,
}

impl ComparisonRunner {
    /// Runner over the built-in reference tables
    pub fn new(config: CalculatorConfig) -> Self {
        Self::with_tables(Arc::new(CoefficientTables::reference()), config)
    }

    /// Runner over tables loaded from data/coefficients/
    pub fn from_csv(config: CalculatorConfig) -> MovilidadResult<Self> {
        Ok(Self::with_tables(Arc::new(CoefficientTables::from_csv()?), config))
    }

    pub fn with_tables(tables: Arc<CoefficientTables>, config: CalculatorConfig) -> Self {
        Self {
            calculator: TrajectoryCalculator::new(tables, config),
        }
    }

    pub fn calculator(&self) -> &TrajectoryCalculator {
        &self.calculator
    }

    /// Compare both regimes for one request. Fails as a whole if either regime fails.
    pub fn compare(&self, request: &CalculationRequest) -> MovilidadResult<ComparisonResult> {
        request.validate()?;

        let floor = self.calculator.tables().common_epoch();
        let (effective_start, notice) = clamp_start(request.start_period, floor);
        let notices: Vec<Notice> = notice.into_iter().collect();

        let statutory = self
            .calculator
            .compute_from(request, Regime::Statutory, effective_start, notices.clone())?;
        let judicial = self
            .calculator
            .compute_from(request, Regime::Judicial, effective_start, notices)?;

        Ok(ComparisonResult::assemble(request.label.clone(), statutory, judicial))
    }

    /// Compare many requests in parallel; results keep input order
    pub fn run_batch(&self, requests: &[CalculationRequest]) -> Vec<MovilidadResult<ComparisonResult>> {
        requests.par_iter().map(|request| self.compare(request)).collect()
    }

    /// Parse and compare raw case rows in parallel; a bad row fails only itself
    pub fn run_cases(&self, cases: &[CaseRow]) -> Vec<MovilidadResult<ComparisonResult>> {
        cases
            .par_iter()
            .map(|case| case.to_request().and_then(|request| self.compare(&request)))
            .collect()
    }
}

impl Default for ComparisonRunner {
    fn default() -> Self {
        Self::new(CalculatorConfig::default())
    }
}
