use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvestmentPlan {
    pub monthly_contribution: f64,
    pub duration_years: u32,
    pub annual_return_rate_percent: f64,
    pub step_up_enabled: bool,
    pub step_up_percent: f64,
    pub lump_sum: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearSnapshot {
    pub year: u32,
    pub invested_cumulative: f64,
    pub value: f64,
    pub gains: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResult {
    pub monthly_investment: f64,
    pub total_investment: f64,
    pub maturity_amount: f64,
    pub total_gains: f64,
    pub yearly_breakdown: Vec<YearSnapshot>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionMetrics {
    pub total_return_percent: f64,
    pub total_installments: u64,
    pub inflation_rate_percent: f64,
    // Unrounded.
    pub real_value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalPlan {
    pub target_amount: f64,
    pub duration_years: u32,
    pub annual_return_rate_percent: f64,
    pub current_contribution: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalResult {
    pub target_amount: f64,
    pub required_contribution: f64,
    pub shortfall: f64,
    pub progress_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioRate {
    #[serde(alias = "rate")]
    pub rate_percent: f64,
    pub label: String,
}

impl ScenarioRate {
    pub fn new(rate_percent: f64, label: impl Into<String>) -> Self {
        Self {
            rate_percent,
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioOutcome {
    pub annual_rate_percent: f64,
    pub label: String,
    pub total_investment: f64,
    pub maturity_amount: f64,
    pub gains: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioSet {
    pub outcomes: Vec<ScenarioOutcome>,
}

impl ScenarioSet {
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn find(&self, label: &str) -> Option<&ScenarioOutcome> {
        self.outcomes.iter().find(|o| o.label == label)
    }
}
