//! Trajectory calculator: compounds regime coefficients onto a base amount

mod anchor;
mod engine;
mod request;
mod result;

pub use anchor::{AnchorAdjustment, AnchorRule};
pub use engine::{TrajectoryCalculator, build_trajectory, clamp_start, compound};
pub use request::CalculationRequest;
pub use result::{CalculationResult, Notice, TrajectoryPoint};
