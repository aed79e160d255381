use axum::{
    Router,
    extract::Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::{Parser, Subcommand};
use log::{info, warn};
use serde::Serialize;
use std::fs;
use std::io::{self, Read};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::core::{
    AmortizationSchedule, DepletionTrace, EmiInput, ProjectionError, Scenario, ScenarioKind,
    ScenarioResult, SwpInput, run_amortization, run_depletion_trace, run_scenario,
    withdrawal_plan,
};

#[derive(Parser, Debug)]
#[command(
    name = "fincalc",
    about = "Retail financial planning calculators (SIP, loans, withdrawals, goals)"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the calculators over HTTP
    Serve {
        #[arg(long, env = "FINCALC_BIND", default_value = "0.0.0.0")]
        bind: IpAddr,
        #[arg(long, env = "FINCALC_PORT", default_value_t = 8080)]
        port: u16,
    },
    /// Run one scenario from a JSON document (stdin when no source is given)
    Calc {
        #[arg(long, conflicts_with = "input", help = "Scenario JSON passed inline")]
        json: Option<String>,
        #[arg(long, help = "Path to a scenario JSON file")]
        input: Option<PathBuf>,
        #[arg(long)]
        pretty: bool,
    },
    /// List the scenario tags accepted by `calc` and /api/calculate
    Scenarios,
    /// Print the month-by-month repayment schedule of a loan
    Amortize {
        #[arg(long)]
        principal: f64,
        #[arg(long, help = "Annual interest rate in percent")]
        rate: f64,
        #[arg(long)]
        years: u32,
        #[arg(long)]
        pretty: bool,
    },
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Projection(#[from] ProjectionError),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Json(_) => StatusCode::BAD_REQUEST,
            AppError::Projection(ProjectionError::InvalidInput { .. }) => StatusCode::BAD_REQUEST,
            AppError::Projection(ProjectionError::NonFinite { .. }) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
struct ScenarioList {
    scenarios: &'static [ScenarioKind],
}

const SCENARIO_LIST: ScenarioList = ScenarioList {
    scenarios: &ScenarioKind::ALL,
};

pub async fn run(cli: Cli) -> Result<(), AppError> {
    match cli.command {
        Command::Serve { bind, port } => run_http_server(SocketAddr::new(bind, port)).await?,
        Command::Calc {
            json,
            input,
            pretty,
        } => {
            let payload = match (json, input) {
                (Some(json), _) => json,
                (None, Some(path)) => fs::read_to_string(path)?,
                (None, None) => {
                    let mut buffer = String::new();
                    io::stdin().read_to_string(&mut buffer)?;
                    buffer
                }
            };
            let result = calculate_from_json(&payload)?;
            println!("{}", render(&result, pretty)?);
        }
        Command::Scenarios => {
            for kind in ScenarioKind::ALL {
                println!("{kind}");
            }
        }
        Command::Amortize {
            principal,
            rate,
            years,
            pretty,
        } => {
            let schedule = run_amortization(&EmiInput {
                principal,
                annual_rate_percent: rate,
                years,
            })?;
            println!("{}", render(&schedule, pretty)?);
        }
    }
    Ok(())
}

fn render<T: Serialize>(value: &T, pretty: bool) -> Result<String, AppError> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(text)
}

pub fn router() -> Router {
    Router::new()
        .route("/api/scenarios", get(scenarios_handler))
        .route("/api/calculate", post(calculate_handler))
        .route("/api/amortization", post(amortization_handler))
        .route("/api/withdrawal-trace", post(withdrawal_trace_handler))
        .fallback(not_found_handler)
}

pub async fn run_http_server(addr: SocketAddr) -> io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("fincalc HTTP API listening on http://{addr}");
    info!("local access: http://127.0.0.1:{}/api/scenarios", addr.port());

    axum::serve(listener, router()).await
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn scenarios_handler() -> Response {
    json_response(StatusCode::OK, &SCENARIO_LIST)
}

// Bodies arrive as plain text so malformed JSON gets the same error shape as
// invalid input.
async fn calculate_handler(body: String) -> Response {
    respond(calculate_from_json(&body))
}

async fn amortization_handler(body: String) -> Response {
    respond(amortization_from_json(&body))
}

async fn withdrawal_trace_handler(body: String) -> Response {
    respond(withdrawal_trace_from_json(&body))
}

fn calculate_from_json(json: &str) -> Result<ScenarioResult, AppError> {
    let scenario = serde_json::from_str::<Scenario>(json)?;
    Ok(run_scenario(&scenario)?)
}

fn amortization_from_json(json: &str) -> Result<AmortizationSchedule, AppError> {
    let loan = serde_json::from_str::<EmiInput>(json)?;
    Ok(run_amortization(&loan)?)
}

fn withdrawal_trace_from_json(json: &str) -> Result<DepletionTrace, AppError> {
    let input = serde_json::from_str::<SwpInput>(json)?;
    let plan = withdrawal_plan(&input)?;
    Ok(run_depletion_trace(&plan)?)
}

fn respond<T: Serialize>(outcome: Result<T, AppError>) -> Response {
    match outcome {
        Ok(body) => json_response(StatusCode::OK, body),
        Err(err) => {
            warn!("rejected request: {err}");
            error_response(err.status(), &err.to_string())
        }
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn assert_no_store(response: &Response) {
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL),
            Some(&HeaderValue::from_static("no-store"))
        );
    }

    #[test]
    fn calculate_from_json_runs_tagged_scenario() {
        let json = r#"{
          "scenario": "sip",
          "monthlyContribution": 10000,
          "annualRatePercent": 12,
          "years": 10
        }"#;
        let result = calculate_from_json(json).expect("json should parse");
        assert_eq!(result.kind(), ScenarioKind::Sip);
        assert_eq!(result.rounded("futureValue"), Some(2_300_386.89));
    }

    #[test]
    fn calculate_response_serialization_contains_expected_fields() {
        let json = r#"{"scenario":"emi","principal":1000000,"annualRatePercent":9,"years":20}"#;
        let result = calculate_from_json(json).expect("json should parse");
        let value: Value =
            serde_json::from_str(&render(&result, false).expect("serialize")).expect("valid json");

        assert_eq!(value["scenario"], "emi");
        assert_eq!(value["emi"], 8997.26);
        assert_eq!(value["totalPayment"], 2159342.29);
        assert_eq!(value["totalInterest"], 1159342.29);
    }

    #[test]
    fn malformed_json_maps_to_bad_request() {
        let err = calculate_from_json("{not json").expect_err("must reject");
        assert!(matches!(err, AppError::Json(_)));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn unknown_scenario_maps_to_bad_request() {
        let err = calculate_from_json(r#"{"scenario":"crypto"}"#).expect_err("must reject");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn invalid_input_maps_to_bad_request_and_names_field() {
        let json = r#"{"scenario":"wedding","childAge":20,"marriageAge":18}"#;
        let err = calculate_from_json(json).expect_err("reversed ages");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("marriageAge"));
    }

    #[test]
    fn non_finite_result_maps_to_unprocessable() {
        let json = r#"{"scenario":"lumpsum","principal":1e308,"annualRatePercent":100,"years":100}"#;
        let err = calculate_from_json(json).expect_err("overflow");
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn overflowing_amortization_maps_to_unprocessable() {
        let json = r#"{"principal":1e308,"annualRatePercent":100,"years":100}"#;
        let response = respond(amortization_from_json(json));
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_no_store(&response);
    }

    #[test]
    fn overflowing_withdrawal_trace_maps_to_unprocessable() {
        let json = r#"{"lumpsum":1e308,"annualRatePercent":100,"tenureYears":100}"#;
        let err = withdrawal_trace_from_json(json).expect_err("overflow");
        assert!(matches!(
            err,
            AppError::Projection(ProjectionError::NonFinite { .. })
        ));
        assert_eq!(
            respond(withdrawal_trace_from_json(json)).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn respond_sets_status_and_cache_control() {
        let ok = respond(calculate_from_json(
            r#"{"scenario":"simple-interest","principal":1000,"annualRatePercent":10,"years":1}"#,
        ));
        assert_eq!(ok.status(), StatusCode::OK);
        assert_no_store(&ok);

        let rejected = respond(calculate_from_json(r#"{"scenario":"sip","years":500}"#));
        assert_eq!(rejected.status(), StatusCode::BAD_REQUEST);
        assert_no_store(&rejected);
    }

    #[test]
    fn amortization_from_json_returns_full_schedule() {
        let json = r#"{"principal":120000,"annualRatePercent":0,"years":1}"#;
        let schedule = amortization_from_json(json).expect("json should parse");
        assert_eq!(schedule.rows.len(), 12);
        assert_eq!(schedule.emi, 10_000.0);
    }

    #[test]
    fn withdrawal_trace_from_json_reports_exhaustion() {
        let json = r#"{
          "lumpsum": 1000000,
          "monthlyWithdrawal": 10000,
          "annualRatePercent": 8,
          "tenureYears": 15
        }"#;
        let trace = withdrawal_trace_from_json(json).expect("json should parse");
        assert_eq!(trace.outcome.exhausted_at_month, Some(165));

        let value: Value = serde_json::to_value(&trace).expect("serialize");
        assert_eq!(value["outcome"]["exhaustedAtMonth"], 165);
        assert_eq!(value["points"][0]["month"], 1);
    }

    #[test]
    fn scenario_list_serializes_wire_tags() {
        let value = serde_json::to_value(&SCENARIO_LIST).expect("serialize");
        let tags = value["scenarios"].as_array().expect("array");
        assert_eq!(tags.len(), ScenarioKind::ALL.len());
        assert_eq!(tags[0], "sip");
        assert!(tags.iter().any(|tag| tag == "home-loan-vs-sip"));
    }

    #[test]
    fn cli_parses_calc_and_amortize() {
        let cli = Cli::try_parse_from(["fincalc", "calc", "--json", "{}", "--pretty"])
            .expect("calc should parse");
        assert!(matches!(
            cli.command,
            Command::Calc { json: Some(_), input: None, pretty: true }
        ));

        let cli = Cli::try_parse_from([
            "fincalc", "amortize", "--principal", "500000", "--rate", "8.5", "--years", "15",
        ])
        .expect("amortize should parse");
        match cli.command {
            Command::Amortize { principal, rate, years, pretty } => {
                assert_eq!(principal, 500_000.0);
                assert_eq!(rate, 8.5);
                assert_eq!(years, 15);
                assert!(!pretty);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn cli_rejects_two_calc_sources() {
        let err = Cli::try_parse_from(["fincalc", "calc", "--json", "{}", "--input", "a.json"])
            .expect_err("sources conflict");
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }
}
