use axum::{
    Router,
    extract::{
        Json, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;

mod error;

pub use error::{ApiError, ApiResult};

use crate::core::{
    AdvisorProfile, ClientProfile, GoalResult, InvestmentPlan, PlanReport, PlanningHorizon,
    ProjectionMetrics, ProjectionResult, ReportInput, ScenarioRate, ScenarioSet, build_report,
    compare_scenarios, default_scenario_rates, projection_metrics, simulate, solve_goal,
};

const MAX_DURATION_YEARS: u32 = 60;

#[derive(Parser, Debug)]
#[command(
    name = "sip_planner",
    about = "SIP growth projection, goal planning and return-rate scenarios"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the JSON API over HTTP
    Serve {
        #[arg(default_value_t = 8080)]
        port: u16,
    },
    /// Print the full plan report as JSON
    Report(PlanArgs),
}

#[derive(Args, Debug, Clone)]
pub struct PlanArgs {
    #[arg(long, default_value_t = 5_000.0)]
    monthly_contribution: f64,
    #[arg(long, default_value_t = 10)]
    duration_years: u32,
    #[arg(long, default_value_t = 12.0, help = "Expected annual return in percent")]
    annual_return_rate: f64,
    #[arg(long, help = "Raise the monthly contribution every year")]
    step_up: bool,
    #[arg(
        long,
        default_value_t = 10.0,
        help = "Annual contribution increase in percent, used with --step-up"
    )]
    step_up_percent: f64,
    #[arg(long, default_value_t = 0.0)]
    lump_sum: f64,
    #[arg(
        long,
        default_value_t = 6.0,
        help = "Inflation used for the real-value figure, in percent"
    )]
    inflation_rate: f64,
    #[arg(long, default_value_t = 1_000_000.0)]
    target_amount: f64,
    #[arg(long, default_value_t = 25)]
    current_age: u32,
    #[arg(long, default_value_t = 60)]
    retirement_age: u32,
    #[arg(
        long = "scenario",
        value_parser = parse_scenario_rate,
        help = "Comparison rate as RATE:LABEL, repeatable; defaults to 8, 12 and 15 percent"
    )]
    scenarios: Vec<ScenarioRate>,
    #[arg(long)]
    advisor_name: Option<String>,
    #[arg(long)]
    advisor_phone: Option<String>,
    #[arg(long)]
    advisor_address: Option<String>,
    #[arg(long)]
    client_name: Option<String>,
    #[arg(long)]
    client_phone: Option<String>,
    #[arg(long)]
    client_email: Option<String>,
    #[arg(long)]
    client_address: Option<String>,
    #[arg(long = "client-goal")]
    client_goals: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PlanPayload {
    #[serde(alias = "monthlyAmount")]
    monthly_contribution: Option<f64>,
    #[serde(alias = "duration")]
    duration_years: Option<u32>,
    #[serde(alias = "expectedReturn")]
    annual_return_rate: Option<f64>,
    #[serde(alias = "stepUpEnabled")]
    step_up: Option<bool>,
    #[serde(alias = "stepUpPercentage")]
    step_up_percent: Option<f64>,
    #[serde(alias = "lumpSumAmount")]
    lump_sum: Option<f64>,
    inflation_rate: Option<f64>,
    target_amount: Option<f64>,
    current_age: Option<u32>,
    retirement_age: Option<u32>,
    scenarios: Option<Vec<ScenarioRate>>,
    advisor: Option<AdvisorProfile>,
    client: Option<ClientProfile>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Endpoint {
    Project,
    Goal,
    Scenarios,
    Report,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectResponse {
    projection: ProjectionResult,
    metrics: ProjectionMetrics,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GoalResponse {
    goal: GoalResult,
    horizon: PlanningHorizon,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum PlanResponse {
    Project(ProjectResponse),
    Goal(GoalResponse),
    Scenarios(ScenarioSet),
    Report(Box<PlanReport>),
}

fn parse_scenario_rate(raw: &str) -> Result<ScenarioRate, String> {
    let (rate, label) = match raw.split_once(':') {
        Some((rate, label)) => (rate.trim(), label.trim().to_string()),
        None => (raw.trim(), format!("{}%", raw.trim())),
    };
    let rate_percent = rate
        .parse::<f64>()
        .map_err(|e| format!("invalid scenario rate {rate:?}: {e}"))?;
    Ok(ScenarioRate::new(rate_percent, label))
}

pub fn build_request(args: PlanArgs) -> ApiResult<ReportInput> {
    if !args.monthly_contribution.is_finite() || args.monthly_contribution < 0.0 {
        return Err(ApiError::invalid("monthly-contribution", "must be >= 0"));
    }

    if !(1..=MAX_DURATION_YEARS).contains(&args.duration_years) {
        return Err(ApiError::invalid(
            "duration-years",
            format!("must be between 1 and {MAX_DURATION_YEARS}"),
        ));
    }

    if !valid_return_rate(args.annual_return_rate) {
        return Err(ApiError::invalid(
            "annual-return-rate",
            "must be > -100 and <= 100",
        ));
    }

    if !(0.0..=100.0).contains(&args.step_up_percent) {
        return Err(ApiError::invalid(
            "step-up-percent",
            "must be between 0 and 100",
        ));
    }

    if !args.lump_sum.is_finite() || args.lump_sum < 0.0 {
        return Err(ApiError::invalid("lump-sum", "must be >= 0"));
    }

    if !(0.0..100.0).contains(&args.inflation_rate) {
        return Err(ApiError::invalid(
            "inflation-rate",
            "must be >= 0 and < 100",
        ));
    }

    if !args.target_amount.is_finite() || args.target_amount <= 0.0 {
        return Err(ApiError::invalid("target-amount", "must be > 0"));
    }

    if args.retirement_age <= args.current_age {
        return Err(ApiError::invalid("retirement-age", "must be > --current-age"));
    }

    for scenario in &args.scenarios {
        if !valid_return_rate(scenario.rate_percent) {
            return Err(ApiError::invalid(
                "scenario",
                format!("rate {} must be > -100 and <= 100", scenario.rate_percent),
            ));
        }
        if scenario.label.trim().is_empty() {
            return Err(ApiError::invalid("scenario", "label must not be empty"));
        }
    }

    let scenario_rates = if args.scenarios.is_empty() {
        default_scenario_rates()
    } else {
        args.scenarios
    };

    let advisor = args
        .advisor_name
        .filter(|name| !name.trim().is_empty())
        .map(|name| AdvisorProfile {
            name,
            phone: args.advisor_phone.unwrap_or_default(),
            address: args.advisor_address.unwrap_or_default(),
        });
    let client = args
        .client_name
        .filter(|name| !name.trim().is_empty())
        .map(|name| ClientProfile {
            name,
            phone: args.client_phone.unwrap_or_default(),
            email: args.client_email.unwrap_or_default(),
            address: args.client_address.filter(|a| !a.trim().is_empty()),
            goals: args.client_goals,
        });

    Ok(ReportInput {
        plan: InvestmentPlan {
            monthly_contribution: args.monthly_contribution,
            duration_years: args.duration_years,
            annual_return_rate_percent: args.annual_return_rate,
            step_up_enabled: args.step_up,
            step_up_percent: args.step_up_percent,
            lump_sum: args.lump_sum,
        },
        target_amount: args.target_amount,
        inflation_rate_percent: args.inflation_rate,
        scenario_rates,
        horizon: PlanningHorizon::new(Some(args.current_age), Some(args.retirement_age)),
        advisor,
        client,
    })
}

fn valid_return_rate(rate: f64) -> bool {
    rate.is_finite() && rate > -100.0 && rate <= 100.0
}

pub fn render_report(args: PlanArgs) -> ApiResult<String> {
    let input = build_request(args)?;
    let report = build_report(&input);
    Ok(serde_json::to_string_pretty(&report)?)
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "SIP planner API listening");
    tracing::info!("Local access: http://127.0.0.1:{port}/api/report");

    axum::serve(listener, router()).await
}

fn router() -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/api/project",
            get(project_get_handler).post(project_post_handler),
        )
        .route("/api/goal", get(goal_get_handler).post(goal_post_handler))
        .route(
            "/api/scenarios",
            get(scenarios_get_handler).post(scenarios_post_handler),
        )
        .route(
            "/api/report",
            get(report_get_handler).post(report_post_handler),
        )
        .fallback(not_found_handler)
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, serde_json::json!({ "status": "ok" }))
}

async fn not_found_handler() -> Response {
    ApiError::NotFound.into_response()
}

type JsonPayload = Result<Json<PlanPayload>, JsonRejection>;
type QueryPayload = Result<Query<PlanPayload>, QueryRejection>;

async fn project_get_handler(payload: QueryPayload) -> Response {
    respond_query(Endpoint::Project, payload)
}

async fn project_post_handler(payload: JsonPayload) -> Response {
    respond_json(Endpoint::Project, payload)
}

async fn goal_get_handler(payload: QueryPayload) -> Response {
    respond_query(Endpoint::Goal, payload)
}

async fn goal_post_handler(payload: JsonPayload) -> Response {
    respond_json(Endpoint::Goal, payload)
}

async fn scenarios_get_handler(payload: QueryPayload) -> Response {
    respond_query(Endpoint::Scenarios, payload)
}

async fn scenarios_post_handler(payload: JsonPayload) -> Response {
    respond_json(Endpoint::Scenarios, payload)
}

async fn report_get_handler(payload: QueryPayload) -> Response {
    respond_query(Endpoint::Report, payload)
}

async fn report_post_handler(payload: JsonPayload) -> Response {
    respond_json(Endpoint::Report, payload)
}

fn respond_query(endpoint: Endpoint, payload: QueryPayload) -> Response {
    match payload {
        Ok(Query(payload)) => respond(endpoint, payload),
        Err(rejection) => ApiError::from(rejection).into_response(),
    }
}

fn respond_json(endpoint: Endpoint, payload: JsonPayload) -> Response {
    match payload {
        Ok(Json(payload)) => respond(endpoint, payload),
        Err(rejection) => ApiError::from(rejection).into_response(),
    }
}

fn respond(endpoint: Endpoint, payload: PlanPayload) -> Response {
    match report_input_from_payload(payload) {
        Ok(input) => {
            tracing::debug!(
                ?endpoint,
                duration_years = input.plan.duration_years,
                rate = input.plan.annual_return_rate_percent,
                "evaluating plan"
            );
            json_response(StatusCode::OK, evaluate(endpoint, &input))
        }
        Err(err) => err.into_response(),
    }
}

fn evaluate(endpoint: Endpoint, input: &ReportInput) -> PlanResponse {
    match endpoint {
        Endpoint::Project => {
            let projection = simulate(&input.plan);
            let metrics = projection_metrics(&projection, input.inflation_rate_percent);
            PlanResponse::Project(ProjectResponse {
                projection,
                metrics,
            })
        }
        Endpoint::Goal => PlanResponse::Goal(GoalResponse {
            goal: solve_goal(&input.goal_plan()),
            horizon: input.horizon,
        }),
        Endpoint::Scenarios => PlanResponse::Scenarios(compare_scenarios(
            input.plan.monthly_contribution,
            input.plan.duration_years,
            &input.scenario_rates,
        )),
        Endpoint::Report => PlanResponse::Report(Box::new(build_report(input))),
    }
}

pub(crate) fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

#[cfg(test)]
fn report_input_from_json(json: &str) -> ApiResult<ReportInput> {
    let payload = serde_json::from_str::<PlanPayload>(json)
        .map_err(|err| ApiError::InvalidPayload(err.to_string()))?;
    report_input_from_payload(payload)
}

fn report_input_from_payload(payload: PlanPayload) -> ApiResult<ReportInput> {
    let mut args = default_plan_args();

    if let Some(v) = payload.monthly_contribution {
        args.monthly_contribution = v;
    }
    if let Some(v) = payload.duration_years {
        args.duration_years = v;
    }
    if let Some(v) = payload.annual_return_rate {
        args.annual_return_rate = v;
    }
    if let Some(v) = payload.step_up {
        args.step_up = v;
    }
    if let Some(v) = payload.step_up_percent {
        args.step_up_percent = v;
    }
    if let Some(v) = payload.lump_sum {
        args.lump_sum = v;
    }
    if let Some(v) = payload.inflation_rate {
        args.inflation_rate = v;
    }
    if let Some(v) = payload.target_amount {
        args.target_amount = v;
    }
    if let Some(v) = payload.current_age {
        args.current_age = v;
    }
    if let Some(v) = payload.retirement_age {
        args.retirement_age = v;
    }
    if let Some(v) = payload.scenarios {
        if v.is_empty() {
            return Err(ApiError::invalid("scenario", "list must not be empty"));
        }
        args.scenarios = v;
    }

    if let Some(advisor) = payload.advisor {
        args.advisor_name = Some(advisor.name);
        args.advisor_phone = Some(advisor.phone);
        args.advisor_address = Some(advisor.address);
    }
    if let Some(client) = payload.client {
        args.client_name = Some(client.name);
        args.client_phone = Some(client.phone);
        args.client_email = Some(client.email);
        args.client_address = client.address;
        args.client_goals = client.goals;
    }

    build_request(args)
}

fn default_plan_args() -> PlanArgs {
    PlanArgs {
        monthly_contribution: 5_000.0,
        duration_years: 10,
        annual_return_rate: 12.0,
        step_up: false,
        step_up_percent: 10.0,
        lump_sum: 0.0,
        inflation_rate: 6.0,
        target_amount: 1_000_000.0,
        current_age: 25,
        retirement_age: 60,
        scenarios: default_scenario_rates(),
        advisor_name: None,
        advisor_phone: None,
        advisor_address: None,
        client_name: None,
        client_phone: None,
        client_email: None,
        client_address: None,
        client_goals: Vec::new(),
    }
}
