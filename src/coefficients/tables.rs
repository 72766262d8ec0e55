//! Built-in reference coefficient tables
//!
//! Quarterly increases through 2024-03, monthly from 2024-04 onward. The statutory
//! table runs one month past the judicial one.

use super::{CoefficientSeries, Regime};

/// ANSeS statutory increases. 2020-03 is recorded as 1.0: the March 2020 increase
/// was a fixed supplement plus a percentage, configured as an anchor rule instead.
pub const STATUTORY_COEFFICIENTS: [(&str, f64); 32] = [
    ("2020-03", 1.0),
    ("2020-06", 1.0612),
    ("2020-09", 1.075),
    ("2020-12", 1.05),
    ("2021-03", 1.0807),
    ("2021-06", 1.1212),
    ("2021-09", 1.1239),
    ("2021-12", 1.1211),
    ("2022-03", 1.1706),
    ("2022-06", 1.1691),
    ("2022-09", 1.1955),
    ("2022-12", 1.1731),
    ("2023-03", 1.2247),
    ("2023-06", 1.2491),
    ("2023-09", 1.2957),
    ("2023-12", 1.4087),
    ("2024-03", 1.4633),
    ("2024-04", 1.132),
    ("2024-05", 1.1101),
    ("2024-06", 1.0883),
    ("2024-07", 1.0418),
    ("2024-08", 1.0458),
    ("2024-09", 1.0403),
    ("2024-10", 1.0417),
    ("2024-11", 1.0347),
    ("2024-12", 1.0269),
    ("2025-01", 1.0243),
    ("2025-02", 1.027),
    ("2025-03", 1.0221),
    ("2025-04", 1.024),
    ("2025-05", 1.0373),
    ("2025-06", 1.0278),
];

/// Martinez / Italiano judicial increases
pub const JUDICIAL_COEFFICIENTS: [(&str, f64); 31] = [
    ("2020-03", 1.1156),
    ("2020-06", 1.1089),
    ("2020-09", 1.0988),
    ("2020-12", 1.0455),
    ("2021-03", 1.0807),
    ("2021-06", 1.1212),
    ("2021-09", 1.1239),
    ("2021-12", 1.1211),
    ("2022-03", 1.1706),
    ("2022-06", 1.1692),
    ("2022-09", 1.1955),
    ("2022-12", 1.1731),
    ("2023-03", 1.2247),
    ("2023-06", 1.2491),
    ("2023-09", 1.2957),
    ("2023-12", 1.4087),
    ("2024-03", 1.4632),
    ("2024-04", 1.1132),
    ("2024-05", 1.1101),
    ("2024-06", 1.0883),
    ("2024-07", 1.0418),
    ("2024-08", 1.0458),
    ("2024-09", 1.0403),
    ("2024-10", 1.0417),
    ("2024-11", 1.0347),
    ("2024-12", 1.0269),
    ("2025-01", 1.0243),
    ("2025-02", 1.027),
    ("2025-03", 1.0221),
    ("2025-04", 1.024),
    ("2025-05", 1.0373),
];

pub fn statutory_series() -> CoefficientSeries {
    CoefficientSeries::from_pairs(Regime::Statutory, &STATUTORY_COEFFICIENTS)
        .expect("built-in statutory table is well formed")
}

pub fn judicial_series() -> CoefficientSeries {
    CoefficientSeries::from_pairs(Regime::Judicial, &JUDICIAL_COEFFICIENTS)
        .expect("built-in judicial table is well formed")
}
