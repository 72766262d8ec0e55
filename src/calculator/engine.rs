//! Core compounding engine for movilidad trajectories

use std::sync::Arc;

use crate::coefficients::{CoefficientEntry, CoefficientTables, Regime};
use crate::config::CalculatorConfig;
use crate::error::{MovilidadError, MovilidadResult};
use crate::period::Period;
use super::anchor::AnchorRule;
use super::request::CalculationRequest;
use super::result::{CalculationResult, Notice, TrajectoryPoint};

/// Main trajectory calculator
///
/// Tables are shared read-only; a calculator can be cloned cheaply and used from
/// any number of threads.
#[derive(Debug, Clone)]
pub struct TrajectoryCalculator {
    tables: Arc<CoefficientTables>,
    config: CalculatorConfig,
}

impl TrajectoryCalculator {
    /// Create a calculator over loaded tables with the given anchor configuration
    pub fn new(tables: Arc<CoefficientTables>, config: CalculatorConfig) -> Self {
        Self { tables, config }
    }

    /// Calculator over the built-in reference tables, no anchor overrides
    pub fn with_reference_tables() -> Self {
        Self::new(Arc::new(CoefficientTables::reference()), CalculatorConfig::default())
    }

    pub fn tables(&self) -> &CoefficientTables {
        &self.tables
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    /// Compound one regime's coefficients onto the request's base amount.
    ///
    /// The start is clamped to this regime's epoch. Use
    /// [`ComparisonRunner::compare`](crate::ComparisonRunner::compare) to clamp both
    /// regimes to a common floor.
    pub fn compute(&self, request: &CalculationRequest, regime: Regime) -> MovilidadResult<CalculationResult> {
        request.validate()?;

        let epoch = self.tables.series_for(regime).epoch();
        let (effective_start, notice) = clamp_start(request.start_period, epoch);

        self.compute_from(request, regime, effective_start, notice.into_iter().collect())
    }

    /// Compute with an already clamped start
    pub(crate) fn compute_from(
        &self,
        request: &CalculationRequest,
        regime: Regime,
        effective_start: Period,
        notices: Vec<Notice>,
    ) -> MovilidadResult<CalculationResult> {
        let chain = self.resolve_chain(request, regime, effective_start)?;
        let final_amount = compound(request.base_amount, &chain);

        let periods = self.tables.periods_from(effective_start);
        let trajectory = build_trajectory(request.base_amount, &periods, &chain);

        Ok(CalculationResult {
            regime,
            requested_start: request.start_period,
            effective_start,
            final_amount,
            trajectory,
            notices,
        })
    }

    /// Coefficients applied for a request, in chronological order, with the
    /// regime's anchor rule already substituted
    pub fn resolve_chain(
        &self,
        request: &CalculationRequest,
        regime: Regime,
        effective_start: Period,
    ) -> MovilidadResult<Vec<CoefficientEntry>> {
        let entries = self.tables.series_for(regime).entries_from(effective_start);
        if entries.is_empty() {
            return Err(MovilidadError::NoDataForPeriod {
                regime,
                period: effective_start,
            });
        }

        let mut chain = entries.to_vec();
        if let Some(rule) = self.config.anchor_for(regime) {
            apply_anchor_rule(&mut chain, rule, request, regime);
        }

        log::debug!(
            "{} chain from {}: {} coefficients ({} .. {})",
            regime,
            effective_start,
            chain.len(),
            chain[0].period,
            chain[chain.len() - 1].period,
        );

        Ok(chain)
    }
}

/// Move `requested` forward to `floor` when it precedes it
pub fn clamp_start(requested: Period, floor: Period) -> (Period, Option<Notice>) {
    if requested < floor {
        let notice = Notice::ClampedStartDate {
            requested,
            effective: floor,
        };
        log::warn!("{}", notice);
        (floor, Some(notice))
    } else {
        (requested, None)
    }
}

/// Base amount times every coefficient, multiplied left to right
pub fn compound(base_amount: f64, chain: &[CoefficientEntry]) -> f64 {
    chain
        .iter()
        .fold(base_amount, |amount, entry| amount * entry.coefficient)
}

/// Amounts along `periods`. The first period carries the base amount; each later
/// period applies the chain's coefficient for it, or stays flat when there is none.
pub fn build_trajectory(base_amount: f64, periods: &[Period], chain: &[CoefficientEntry]) -> Vec<TrajectoryPoint> {
    let mut trajectory = Vec::with_capacity(periods.len());
    let mut amount = base_amount;

    for (i, &period) in periods.iter().enumerate() {
        if i > 0 {
            if let Some(entry) = chain.iter().find(|entry| entry.period == period) {
                amount *= entry.coefficient;
            }
        }
        trajectory.push(TrajectoryPoint { period, amount });
    }

    trajectory
}

fn apply_anchor_rule(
    chain: &mut [CoefficientEntry],
    rule: &AnchorRule,
    request: &CalculationRequest,
    regime: Regime,
) {
    if !rule.applies_to(request.start_period) {
        log::debug!(
            "{} anchor rule at {} skipped: start {} is after the anchor",
            regime, rule.anchor, request.start_period
        );
        return;
    }

    match chain.iter_mut().find(|entry| entry.period == rule.anchor) {
        Some(entry) => {
            let replacement = rule.coefficient(request.base_amount);
            log::debug!(
                "{} anchor rule at {}: coefficient {} replaced by {:.6}",
                regime, rule.anchor, entry.coefficient, replacement
            );
            entry.coefficient = replacement;
        }
        None => log::debug!("{} anchor rule at {} skipped: no entry for the anchor", regime, rule.anchor),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coefficients::tables::{JUDICIAL_COEFFICIENTS, STATUTORY_COEFFICIENTS};
    use approx::assert_relative_eq;

    fn p(s: &str) -> Period {
        Period::parse(s).unwrap()
    }

    fn request(base: f64, start: &str) -> CalculationRequest {
        CalculationRequest::parse(base, start, None).unwrap()
    }

    /// Product of table coefficients with period >= `from`, rebuilt from the raw table
    fn table_product(table: &[(&str, f64)], from: &str) -> f64 {
        table
            .iter()
            .filter(|(period, _)| *period >= from)
            .map(|(_, coefficient)| coefficient)
            .product()
    }

    fn judicial_1156() -> TrajectoryCalculator {
        let config = CalculatorConfig::default()
            .with_anchor(Regime::Judicial, AnchorRule::judicial_fixed(p("2020-03"), 1.156).unwrap());
        TrajectoryCalculator::new(Arc::new(CoefficientTables::reference()), config)
    }

    #[test]
    fn test_final_amount_is_chained_product() {
        let calculator = TrajectoryCalculator::with_reference_tables();
        let req = request(38000.0, "2021-10");

        let statutory = calculator.compute(&req, Regime::Statutory).unwrap();
        let judicial = calculator.compute(&req, Regime::Judicial).unwrap();

        assert_relative_eq!(
            statutory.final_amount,
            38000.0 * table_product(&STATUTORY_COEFFICIENTS, "2021-10"),
            max_relative = 1e-12
        );
        assert_relative_eq!(
            judicial.final_amount,
            38000.0 * table_product(&JUDICIAL_COEFFICIENTS, "2021-10"),
            max_relative = 1e-12
        );

        // 2021-10 has no entry; compounding starts with the 2021-12 increase
        let chain = calculator.resolve_chain(&req, Regime::Statutory, p("2021-10")).unwrap();
        assert_eq!(chain[0].period, p("2021-12"));
        assert!(statutory.notices.is_empty());
    }

    #[test]
    fn test_compute_is_idempotent() {
        let calculator = judicial_1156();
        let req = request(42346.76, "2020-02");

        let first = calculator.compute(&req, Regime::Judicial).unwrap();
        let second = calculator.compute(&req, Regime::Judicial).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.final_amount.to_bits(), second.final_amount.to_bits());
    }

    #[test]
    fn test_clamp_before_epoch() {
        let calculator = TrajectoryCalculator::with_reference_tables();
        let result = calculator.compute(&request(1000.0, "2019-06"), Regime::Statutory).unwrap();

        assert_eq!(result.requested_start, p("2019-06"));
        assert_eq!(result.effective_start, p("2020-03"));
        assert!(result.was_clamped());
        assert_eq!(
            result.notices,
            vec![Notice::ClampedStartDate { requested: p("2019-06"), effective: p("2020-03") }]
        );

        // Same numbers as starting exactly at the epoch
        let at_epoch = calculator.compute(&request(1000.0, "2020-03"), Regime::Statutory).unwrap();
        assert_eq!(result.final_amount, at_epoch.final_amount);
        assert_eq!(result.trajectory, at_epoch.trajectory);
    }

    #[test]
    fn test_no_clamp_at_or_after_epoch() {
        let calculator = TrajectoryCalculator::with_reference_tables();

        for start in ["2020-03", "2020-04", "2023-01"] {
            let result = calculator.compute(&request(1000.0, start), Regime::Judicial).unwrap();
            assert!(result.notices.is_empty(), "unexpected notice for {}", start);
            assert_eq!(result.effective_start, p(start));
        }
    }

    #[test]
    fn test_clamp_start() {
        let (effective, notice) = clamp_start(p("2020-01"), p("2020-03"));
        assert_eq!(effective, p("2020-03"));
        assert!(notice.is_some());

        let (effective, notice) = clamp_start(p("2020-03"), p("2020-03"));
        assert_eq!(effective, p("2020-03"));
        assert!(notice.is_none());
    }

    #[test]
    fn test_no_data_after_last_entry() {
        let calculator = TrajectoryCalculator::with_reference_tables();

        // Judicial table ends at 2025-05, statutory at 2025-06
        let judicial = calculator.compute(&request(1000.0, "2025-06"), Regime::Judicial);
        match judicial {
            Err(MovilidadError::NoDataForPeriod { regime, period }) => {
                assert_eq!(regime, Regime::Judicial);
                assert_eq!(period, p("2025-06"));
            }
            other => panic!("expected NoDataForPeriod, got {:?}", other),
        }

        let statutory = calculator.compute(&request(1000.0, "2025-06"), Regime::Statutory).unwrap();
        assert_relative_eq!(statutory.final_amount, 1000.0 * 1.0278, max_relative = 1e-12);

        assert!(calculator.compute(&request(1000.0, "2025-07"), Regime::Statutory).is_err());
    }

    #[test]
    fn test_invalid_amount_rejected_before_compute() {
        let calculator = TrajectoryCalculator::with_reference_tables();
        let req = CalculationRequest {
            base_amount: -1.0,
            start_period: p("2020-03"),
            label: None,
        };
        assert!(matches!(
            calculator.compute(&req, Regime::Statutory),
            Err(MovilidadError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn test_judicial_anchor_override_scenario() {
        let calculator = judicial_1156();
        let base = 42346.76;
        let req = request(base, "2020-02");

        let chain = calculator.resolve_chain(&req, Regime::Judicial, p("2020-03")).unwrap();
        assert_eq!(chain[0].coefficient, 1.156);
        assert_relative_eq!(base * chain[0].coefficient, 48952.85, epsilon = 0.01);

        // Only the anchor entry changes
        let table = calculator.tables().series_for(Regime::Judicial);
        assert_eq!(&chain[1..], &table.entries()[1..]);

        let result = calculator.compute(&req, Regime::Judicial).unwrap();
        let expected = base * 1.156 * table_product(&JUDICIAL_COEFFICIENTS, "2020-06");
        assert_relative_eq!(result.final_amount, expected, max_relative = 1e-12);
        assert!(result.was_clamped());
    }

    #[test]
    fn test_anchor_override_skipped_after_anchor() {
        let calculator = judicial_1156();
        let plain = TrajectoryCalculator::with_reference_tables();
        let req = request(1000.0, "2020-04");

        let with_rule = calculator.compute(&req, Regime::Judicial).unwrap();
        let without_rule = plain.compute(&req, Regime::Judicial).unwrap();
        assert_eq!(with_rule.final_amount, without_rule.final_amount);
    }

    #[test]
    fn test_anchor_rule_without_matching_entry() {
        let config = CalculatorConfig::default()
            .with_anchor(Regime::Judicial, AnchorRule::judicial_fixed(p("2020-04"), 2.0).unwrap());
        let calculator = TrajectoryCalculator::new(Arc::new(CoefficientTables::reference()), config);
        let plain = TrajectoryCalculator::with_reference_tables();
        let req = request(1000.0, "2020-03");

        assert_eq!(
            calculator.compute(&req, Regime::Judicial).unwrap(),
            plain.compute(&req, Regime::Judicial).unwrap()
        );
    }

    #[test]
    fn test_statutory_march_2020_supplement() {
        let config = CalculatorConfig::default().with_anchor(Regime::Statutory, AnchorRule::statutory_march_2020());
        let calculator = TrajectoryCalculator::new(Arc::new(CoefficientTables::reference()), config);
        let base = 42346.76;

        let result = calculator.compute(&request(base, "2020-02"), Regime::Statutory).unwrap();
        let expected = (base + 1500.0) * 1.023 * table_product(&STATUTORY_COEFFICIENTS, "2020-06");
        assert_relative_eq!(result.final_amount, expected, max_relative = 1e-12);
    }

    #[test]
    fn test_trajectory_carries_flat_without_entry() {
        let calculator = TrajectoryCalculator::with_reference_tables();
        let result = calculator.compute(&request(1000.0, "2025-03"), Regime::Judicial).unwrap();

        let periods: Vec<Period> = result.trajectory.iter().map(|point| point.period).collect();
        assert_eq!(periods, vec![p("2025-03"), p("2025-04"), p("2025-05"), p("2025-06")]);

        let amounts: Vec<f64> = result.trajectory.iter().map(|point| point.amount).collect();
        assert_eq!(amounts[0], 1000.0);
        assert_relative_eq!(amounts[1], 1000.0 * 1.024, max_relative = 1e-12);
        assert_relative_eq!(amounts[2], 1000.0 * 1.024 * 1.0373, max_relative = 1e-12);
        // No judicial entry for 2025-06
        assert_eq!(amounts[3], amounts[2]);
    }

    #[test]
    fn test_trajectory_excludes_first_period_coefficient() {
        let calculator = TrajectoryCalculator::with_reference_tables();
        let result = calculator.compute(&request(1000.0, "2020-03"), Regime::Judicial).unwrap();

        let last = result.trajectory.last().unwrap().amount;
        assert_relative_eq!(last * 1.1156, result.final_amount, max_relative = 1e-12);
    }

    #[test]
    fn test_zero_base_amount() {
        let config = CalculatorConfig::default().with_anchor(Regime::Statutory, AnchorRule::statutory_march_2020());
        let calculator = TrajectoryCalculator::new(Arc::new(CoefficientTables::reference()), config);

        let result = calculator.compute(&request(0.0, "2020-01"), Regime::Statutory).unwrap();
        assert_eq!(result.final_amount, 0.0);
        assert!(result.trajectory.iter().all(|point| point.amount == 0.0));
        assert_eq!(result.growth_factor(0.0), 1.0);
    }

    #[test]
    fn test_compound_and_build_trajectory() {
        let chain = vec![
            CoefficientEntry::new(p("2020-03"), 1.1).unwrap(),
            CoefficientEntry::new(p("2020-06"), 1.2).unwrap(),
        ];
        assert_relative_eq!(compound(100.0, &chain), 132.0, max_relative = 1e-12);
        assert_eq!(compound(100.0, &[]), 100.0);

        let periods = [p("2020-03"), p("2020-04"), p("2020-06")];
        let trajectory = build_trajectory(100.0, &periods, &chain);
        assert_eq!(trajectory.len(), 3);
        assert_eq!(trajectory[0].amount, 100.0);
        assert_eq!(trajectory[1].amount, 100.0);
        assert_relative_eq!(trajectory[2].amount, 120.0, max_relative = 1e-12);
    }
}
