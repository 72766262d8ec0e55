//! AWS Lambda handler for movilidad comparisons
//!
//! Accepts a case as JSON and returns both final amounts, their difference, and the
//! aligned trajectory for charting.
//!
//! Supports Lambda Function URLs for direct HTTP access.
//! Set COEFFICIENTS_DIR to load tables from CSV instead of the built-in reference data.

use lambda_http::{run, service_fn, Body, Error, Request, Response};
use movilidad::calculator::AnchorRule;
use movilidad::{
    CalculationRequest, CalculatorConfig, CoefficientTables, ComparisonResult, ComparisonRow, ComparisonRunner,
    MovilidadError,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Input case
#[derive(Debug, Deserialize)]
pub struct ComparisonRequest {
    /// Base benefit amount
    pub base_amount: f64,

    /// Period of the base amount (default: 2020-03)
    #[serde(default = "default_start_period")]
    pub start_period: String,

    /// Case name, echoed back for display
    #[serde(default)]
    pub label: Option<String>,

    /// Statutory anchor override (e.g. the March 2020 supplement)
    #[serde(default)]
    pub statutory_anchor: Option<AnchorRule>,

    /// Judicial anchor override (e.g. fixed 1.156 at 2020-03)
    #[serde(default)]
    pub judicial_anchor: Option<AnchorRule>,
}

fn default_start_period() -> String { "2020-03".to_string() }

/// Output for one case
#[derive(Debug, Serialize)]
pub struct ComparisonResponse {
    #[serde(flatten)]
    pub comparison: ComparisonResult,
    pub rows: Vec<ComparisonRow>,
    pub execution_time_ms: u64,
}

fn status_for(error: &MovilidadError) -> u16 {
    match error {
        e if e.is_input_error() => 400,
        MovilidadError::InvalidRule { .. } => 400,
        MovilidadError::NoDataForPeriod { .. } => 422,
        _ => 500,
    }
}

fn error_response(status: u16, message: &str) -> Result<Response<Body>, Error> {
    let body = serde_json::json!({ "error": message });
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(Body::Text(body.to_string()))?)
}

fn json_response(body: &ComparisonResponse) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(200)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "POST, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type")
        .body(Body::Text(serde_json::to_string(body)?))?)
}

/// Request body as text; `None` when a binary body is not UTF-8
fn body_text(body: &Body) -> Option<String> {
    match body {
        Body::Text(s) => Some(s.clone()),
        Body::Binary(b) => String::from_utf8(b.clone()).ok(),
        Body::Empty => Some("{}".to_string()),
    }
}

/// Lambda handler function
async fn handler(event: Request, tables: Arc<CoefficientTables>) -> Result<Response<Body>, Error> {
    let start = std::time::Instant::now();

    // Handle CORS preflight
    if event.method().as_str() == "OPTIONS" {
        return Ok(Response::builder()
            .status(200)
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", "POST, OPTIONS")
            .header("Access-Control-Allow-Headers", "Content-Type")
            .body(Body::Empty)?);
    }

    // Parse request body
    let body_str = match body_text(event.body()) {
        Some(s) => s,
        None => return error_response(400, "Request body is not valid UTF-8"),
    };

    let request: ComparisonRequest = match serde_json::from_str(&body_str) {
        Ok(r) => r,
        Err(e) => return error_response(400, &format!("Invalid JSON: {}", e)),
    };

    let config = CalculatorConfig {
        statutory_anchor: request.statutory_anchor,
        judicial_anchor: request.judicial_anchor,
    };
    if let Err(e) = config.validate() {
        return error_response(status_for(&e), &e.to_string());
    }

    let calculation = match CalculationRequest::parse(
        request.base_amount,
        &request.start_period,
        request.label.as_deref(),
    ) {
        Ok(c) => c,
        Err(e) => return error_response(status_for(&e), &e.to_string()),
    };

    let runner = ComparisonRunner::with_tables(tables, config);
    let comparison = match runner.compare(&calculation) {
        Ok(c) => c,
        Err(e) => {
            log::warn!("Comparison failed for {:?}: {}", calculation.label, e);
            return error_response(status_for(&e), &e.to_string());
        }
    };

    let rows = comparison.rows();
    let response = ComparisonResponse {
        comparison,
        rows,
        execution_time_ms: start.elapsed().as_millis() as u64,
    };

    json_response(&response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();

    let tables = match std::env::var("COEFFICIENTS_DIR") {
        Ok(dir) => CoefficientTables::from_csv_path(Path::new(&dir))?,
        Err(_) => CoefficientTables::reference(),
    };
    let tables = Arc::new(tables);

    run(service_fn(move |event: Request| {
        let tables = Arc::clone(&tables);
        async move { handler(event, tables).await }
    }))
    .await
}
