//! Year-month periods identifying coefficient entries
//!
//! Periods are month-granular. They are stored as the first day of the month so ordering
//! is plain chronological ordering of `chrono::NaiveDate`.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{MovilidadError, MovilidadResult};

/// A calendar year-month, written `YYYY-MM`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Period(NaiveDate);

impl Period {
    /// Build a period from a year and a 1-based month
    pub fn new(year: i32, month: u32) -> MovilidadResult<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .filter(|_| (0..=9999).contains(&year))
            .map(Period)
            .ok_or_else(|| MovilidadError::MalformedPeriod {
                input: format!("{:04}-{:02}", year, month),
            })
    }

    /// Parse a strict `YYYY-MM` string
    pub fn parse(input: &str) -> MovilidadResult<Self> {
        let malformed = || MovilidadError::MalformedPeriod { input: input.to_string() };

        let trimmed = input.trim();
        let bytes = trimmed.as_bytes();
        let well_shaped = bytes.len() == 7
            && bytes[4] == b'-'
            && bytes[..4].iter().all(u8::is_ascii_digit)
            && bytes[5..].iter().all(u8::is_ascii_digit);
        if !well_shaped {
            return Err(malformed());
        }

        NaiveDate::parse_from_str(&format!("{}-01", trimmed), "%Y-%m-%d")
            .map(Period)
            .map_err(|_| malformed())
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// First day of the month, for charting against a date axis
    pub fn first_day(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0.format("%Y-%m").to_string())
    }
}

impl FromStr for Period {
    type Err = MovilidadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Period::parse(s)
    }
}

impl TryFrom<String> for Period {
    type Error = MovilidadError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Period::parse(&value)
    }
}

impl From<Period> for String {
    fn from(period: Period) -> Self {
        period.to_string()
    }
}
