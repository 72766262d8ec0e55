//! Movilidad - pension adjustment comparison engine
//!
//! Compares two trajectories for a base pension amount:
//! - ANSeS statutory movilidad (law-based index)
//! - Martinez / Italiano judicial movilidad (court-ruling index)
//!
//! Coefficient tables are loaded once and shared read-only; each request compounds
//! the applicable coefficients and returns final amounts, their difference, and the
//! aligned month-by-month series for charting.

pub mod error;
pub mod period;
pub mod coefficients;
pub mod calculator;
pub mod config;
pub mod comparison;
pub mod cases;

// Re-export commonly used types
pub use error::{MovilidadError, MovilidadResult};
pub use period::Period;
pub use coefficients::{CoefficientEntry, CoefficientSeries, CoefficientTables, Regime};
pub use calculator::{AnchorRule, CalculationRequest, CalculationResult, Notice, TrajectoryCalculator};
pub use config::CalculatorConfig;
pub use comparison::{ComparisonResult, ComparisonRow, ComparisonRunner};
