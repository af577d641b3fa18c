mod engine;
mod report;
mod solver;
mod types;

pub use engine::{deflate, projection_metrics, simulate};
pub use report::{
    AdvisorProfile, ClientProfile, PlanReport, PlanningHorizon, ReportInput, build_report,
};
pub use solver::{
    annuity_due_factor, compare_scenarios, default_scenario_rates, goal_progress_percent,
    solve_goal,
};
pub use types::{
    GoalPlan, GoalResult, InvestmentPlan, ProjectionMetrics, ProjectionResult, ScenarioOutcome,
    ScenarioRate, ScenarioSet, YearSnapshot,
};
