use serde::{Deserialize, Serialize};

use super::engine::{projection_metrics, simulate};
use super::solver::{compare_scenarios, solve_goal};
use super::types::{
    GoalPlan, GoalResult, InvestmentPlan, ProjectionMetrics, ProjectionResult, ScenarioRate,
    ScenarioSet,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdvisorProfile {
    pub name: String,
    pub phone: String,
    pub address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientProfile {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: Option<String>,
    pub goals: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanningHorizon {
    pub current_age: Option<u32>,
    pub retirement_age: Option<u32>,
    pub years_to_retirement: Option<u32>,
}

impl PlanningHorizon {
    pub fn new(current_age: Option<u32>, retirement_age: Option<u32>) -> Self {
        let years_to_retirement = match (current_age, retirement_age) {
            (Some(current), Some(retirement)) => Some(retirement.saturating_sub(current)),
            _ => None,
        };
        Self {
            current_age,
            retirement_age,
            years_to_retirement,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReportInput {
    pub plan: InvestmentPlan,
    pub target_amount: f64,
    pub inflation_rate_percent: f64,
    pub scenario_rates: Vec<ScenarioRate>,
    pub horizon: PlanningHorizon,
    pub advisor: Option<AdvisorProfile>,
    pub client: Option<ClientProfile>,
}

impl ReportInput {
    pub fn goal_plan(&self) -> GoalPlan {
        GoalPlan {
            target_amount: self.target_amount,
            duration_years: self.plan.duration_years,
            annual_return_rate_percent: self.plan.annual_return_rate_percent,
            current_contribution: self.plan.monthly_contribution,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanReport {
    pub duration_years: u32,
    pub annual_return_rate_percent: f64,
    pub step_up_percent: Option<f64>,
    pub lump_sum: f64,
    pub projection: ProjectionResult,
    pub metrics: ProjectionMetrics,
    pub goal: GoalResult,
    pub horizon: PlanningHorizon,
    pub scenarios: ScenarioSet,
    pub advisor: Option<AdvisorProfile>,
    pub client: Option<ClientProfile>,
}

pub fn build_report(input: &ReportInput) -> PlanReport {
    let plan = &input.plan;
    let projection = simulate(plan);
    let metrics = projection_metrics(&projection, input.inflation_rate_percent);
    let goal = solve_goal(&input.goal_plan());
    let scenarios = compare_scenarios(
        plan.monthly_contribution,
        plan.duration_years,
        &input.scenario_rates,
    );

    PlanReport {
        duration_years: plan.duration_years,
        annual_return_rate_percent: plan.annual_return_rate_percent,
        step_up_percent: plan.step_up_enabled.then_some(plan.step_up_percent),
        lump_sum: plan.lump_sum,
        projection,
        metrics,
        goal,
        horizon: input.horizon,
        scenarios,
        advisor: input.advisor.clone(),
        client: input.client.clone(),
    }
}
