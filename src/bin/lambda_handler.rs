//! AWS Lambda handler for pension projections
//!
//! Accepts a calculator state as JSON and returns the projection, with
//! optional scheme comparison and retirement-age sweep.
//!
//! Supports Lambda Function URLs for direct HTTP access.

use lambda_http::{run, service_fn, Body, Error, Request, Response};
use pension_assistant::{
    Assumptions, CalculatorState, MissingFields, PersonalProfile, ProjectionConfig, ProjectionResult,
    ScenarioOutcome, ScenarioRunner,
    projection::CarePayMethod,
};
use serde::{Deserialize, Serialize};

/// Input for the projection
#[derive(Debug, Default, Deserialize)]
pub struct ProjectionRequest {
    /// Member facts; unset mandatory fields are reported back
    #[serde(default)]
    pub profile: PersonalProfile,

    /// Rate assumptions in percent (calculator defaults when omitted)
    #[serde(default)]
    pub assumptions: Assumptions,

    /// CARE pensionable pay approximation (default: flat percentage)
    #[serde(default)]
    pub care_pay: CarePayMethod,

    /// Also project under every scheme section
    #[serde(default)]
    pub compare_schemes: bool,

    /// Also project at each of these retirement ages
    #[serde(default)]
    pub retirement_ages: Vec<u32>,
}

/// Output from the projection
#[derive(Debug, Serialize)]
pub struct ProjectionResponse {
    pub result: ProjectionResult,
    pub monthly_pension: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub scheme_comparison: Vec<ScenarioOutcome>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub retirement_age_sweep: Vec<ScenarioOutcome>,
    pub execution_time_ms: u64,
}

/// Run every projection the request asks for
fn evaluate(request: &ProjectionRequest) -> Result<ProjectionResponse, MissingFields> {
    let start = std::time::Instant::now();

    let state = CalculatorState {
        profile: request.profile.clone(),
        assumptions: request.assumptions.clone(),
    };
    let runner = ScenarioRunner::new(ProjectionConfig {
        care_pay: request.care_pay,
    });

    let result = state.project(runner.engine())?;

    let scheme_comparison = if request.compare_schemes {
        runner.compare_schemes(&state)?
    } else {
        Vec::new()
    };
    let retirement_age_sweep = runner.retirement_age_sweep(&state, &request.retirement_ages)?;

    let mut warnings = state.profile.range_violations();
    warnings.extend(state.assumptions.range_violations());

    Ok(ProjectionResponse {
        monthly_pension: result.monthly_pension(),
        result,
        warnings,
        scheme_comparison,
        retirement_age_sweep,
        execution_time_ms: start.elapsed().as_millis() as u64,
    })
}

fn error_response(status: u16, message: &str) -> Result<Response<Body>, Error> {
    let body = serde_json::json!({ "error": message });
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(Body::Text(body.to_string()))?)
}

fn json_response(body: &ProjectionResponse) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(200)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "POST, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type")
        .body(Body::Text(serde_json::to_string(body)?))?)
}

/// Lambda handler function
async fn handler(event: Request) -> Result<Response<Body>, Error> {
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
    let body_str = match event.body() {
        Body::Text(s) => s.clone(),
        Body::Binary(b) => String::from_utf8_lossy(b).to_string(),
        Body::Empty => "{}".to_string(),
    };

    let request: ProjectionRequest = match serde_json::from_str(&body_str) {
        Ok(r) => r,
        Err(e) => return error_response(400, &format!("Invalid JSON: {}", e)),
    };

    match evaluate(&request) {
        Ok(response) => {
            log::info!(
                "Projected {} in {}ms",
                response.result.scheme,
                response.execution_time_ms
            );
            json_response(&response)
        }
        Err(missing) => error_response(422, &missing.to_string()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_request_uses_default_assumptions() {
        let request: ProjectionRequest = serde_json::from_str(
            r#"{"profile": {"current_salary": 40000, "years_of_service": 20,
                "scheme": "2015 Scheme (career average)", "current_age": 45, "retirement_age": 67}}"#,
        )
        .unwrap();

        let response = evaluate(&request).unwrap();
        assert_eq!(response.result.years_to_retirement, 22);
        assert!(response.warnings.is_empty());
        assert!(response.scheme_comparison.is_empty());
        assert!((response.monthly_pension * 12.0 - response.result.annual_pension_after_commutation).abs() < 1e-9);
    }

    #[test]
    fn test_empty_request_reports_missing_fields() {
        let err = evaluate(&ProjectionRequest::default()).unwrap_err();
        assert_eq!(err.0.len(), 5);
    }

    #[test]
    fn test_comparison_and_sweep() {
        let request: ProjectionRequest = serde_json::from_str(
            r#"{"profile": {"current_salary": 40000, "years_of_service": 20, "scheme": "1995 Section",
                "current_age": 45, "retirement_age": 60},
                "compare_schemes": true, "retirement_ages": [60, 65]}"#,
        )
        .unwrap();

        let response = evaluate(&request).unwrap();
        assert_eq!(response.scheme_comparison.len(), 3);
        assert_eq!(response.retirement_age_sweep.len(), 2);
    }
}
