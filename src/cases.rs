//! Load comparison cases from CSV and write batch results
//!
//! Columns: `name,base_amount,start_period`. Rows are kept raw so a malformed period
//! fails only its own case when the batch runs.

use csv::{Reader, Writer};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

use crate::calculator::CalculationRequest;
use crate::comparison::ComparisonResult;
use crate::error::MovilidadResult;

/// Default case file used by the batch runner
pub const DEFAULT_CASES_PATH: &str = "data/cases.csv";

/// Default output file written by the batch runner
pub const DEFAULT_BATCH_OUTPUT_PATH: &str = "batch_comparison_output.csv";

/// Raw CSV row as typed by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseRow {
    pub name: String,
    pub base_amount: f64,
    pub start_period: String,
}

impl CaseRow {
    pub fn to_request(&self) -> MovilidadResult<CalculationRequest> {
        CalculationRequest::parse(self.base_amount, &self.start_period, Some(&self.name))
    }
}

/// Load all cases from a CSV file
pub fn load_cases<P: AsRef<Path>>(path: P) -> MovilidadResult<Vec<CaseRow>> {
    let reader = Reader::from_path(path)?;
    read_cases(reader)
}

/// Load cases from any reader (e.g., string buffer, network stream)
pub fn load_cases_from_reader<R: std::io::Read>(reader: R) -> MovilidadResult<Vec<CaseRow>> {
    read_cases(Reader::from_reader(reader))
}

fn read_cases<R: std::io::Read>(mut reader: Reader<R>) -> MovilidadResult<Vec<CaseRow>> {
    let mut cases = Vec::new();
    for result in reader.deserialize() {
        let row: CaseRow = result?;
        cases.push(row);
    }
    Ok(cases)
}

/// One line of the batch output file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchOutputRow {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "StartPeriod")]
    pub start_period: String,
    #[serde(rename = "EffectivePeriod")]
    pub effective_period: Option<String>,
    #[serde(rename = "ANSeS")]
    pub statutory: Option<String>,
    #[serde(rename = "Justicia")]
    pub judicial: Option<String>,
    #[serde(rename = "Difference")]
    pub difference: Option<String>,
    #[serde(rename = "Percentage")]
    pub percentage: Option<String>,
    #[serde(rename = "Error")]
    pub error: Option<String>,
}

impl BatchOutputRow {
    pub fn from_outcome(case: &CaseRow, outcome: &MovilidadResult<ComparisonResult>) -> Self {
        match outcome {
            Ok(comparison) => Self {
                name: case.name.clone(),
                start_period: comparison.requested_start.to_string(),
                effective_period: Some(comparison.effective_start.to_string()),
                statutory: Some(format!("{:.2}", comparison.statutory.final_amount)),
                judicial: Some(format!("{:.2}", comparison.judicial.final_amount)),
                difference: Some(format!("{:.2}", comparison.difference)),
                percentage: Some(format!("{:.4}", comparison.percentage)),
                error: None,
            },
            Err(e) => Self {
                name: case.name.clone(),
                start_period: case.start_period.clone(),
                effective_period: None,
                statutory: None,
                judicial: None,
                difference: None,
                percentage: None,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Write one output row per case, in case order
pub fn write_batch_output<W: Write>(
    writer: W,
    cases: &[CaseRow],
    outcomes: &[MovilidadResult<ComparisonResult>],
) -> MovilidadResult<()> {
    let mut writer = Writer::from_writer(writer);
    for (case, outcome) in cases.iter().zip(outcomes) {
        writer.serialize(BatchOutputRow::from_outcome(case, outcome))?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparison::ComparisonRunner;
    use crate::period::Period;

    #[test]
    fn test_load_cases_from_reader() {
        let data = "name,base_amount,start_period\nMIRAMONT,42346.76,2020-02\nGOMEZ,38000,2021-10\n";
        let cases = load_cases_from_reader(data.as_bytes()).unwrap();

        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].name, "MIRAMONT");

        let request = cases[1].to_request().unwrap();
        assert_eq!(request.base_amount, 38000.0);
        assert_eq!(request.start_period, Period::parse("2021-10").unwrap());
        assert_eq!(request.label.as_deref(), Some("GOMEZ"));
    }

    #[test]
    fn test_bad_amount_column_fails_load() {
        let data = "name,base_amount,start_period\nX,lots,2020-03\n";
        assert!(load_cases_from_reader(data.as_bytes()).is_err());
    }

    #[test]
    fn test_load_default_cases() {
        let cases = load_cases(DEFAULT_CASES_PATH).expect("Failed to load cases");
        assert!(!cases.is_empty());
        assert!(cases.iter().all(|case| !case.name.is_empty()));
    }

    #[test]
    fn test_batch_output_quotes_free_text() {
        let data = "name,base_amount,start_period\n\"PEREZ, JUAN\",1000,2020-03\nbad,1000,\"20\"\"20-03\"\n";
        let cases = load_cases_from_reader(data.as_bytes()).unwrap();
        assert_eq!(cases[0].name, "PEREZ, JUAN");
        assert_eq!(cases[1].start_period, "20\"20-03");

        let runner = ComparisonRunner::default();
        let outcomes = runner.run_cases(&cases);

        let mut buffer = Vec::new();
        write_batch_output(&mut buffer, &cases, &outcomes).unwrap();

        let mut reader = Reader::from_reader(buffer.as_slice());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(
            headers.iter().collect::<Vec<_>>(),
            vec!["Name", "StartPeriod", "EffectivePeriod", "ANSeS", "Justicia", "Difference", "Percentage", "Error"]
        );

        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|record| record.len() == 8));

        assert_eq!(&records[0][0], "PEREZ, JUAN");
        assert_eq!(&records[0][1], "2020-03");
        assert_eq!(&records[0][7], "");

        assert_eq!(&records[1][0], "bad");
        assert_eq!(&records[1][1], "20\"20-03");
        assert_eq!(&records[1][3], "");
        assert!(records[1][7].contains("20\"20-03"));
    }

    #[test]
    fn test_batch_output_rows_deserialize() {
        let data = "name,base_amount,start_period\nGOMEZ,38000,2021-10\n";
        let cases = load_cases_from_reader(data.as_bytes()).unwrap();
        let outcomes = ComparisonRunner::default().run_cases(&cases);

        let mut buffer = Vec::new();
        write_batch_output(&mut buffer, &cases, &outcomes).unwrap();

        let rows: Vec<BatchOutputRow> = Reader::from_reader(buffer.as_slice())
            .deserialize()
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0], BatchOutputRow::from_outcome(&cases[0], &outcomes[0]));
        assert!(rows[0].error.is_none());
        assert!(rows[0].statutory.is_some());
    }
}
