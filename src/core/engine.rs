use super::types::{InvestmentPlan, ProjectionMetrics, ProjectionResult, YearSnapshot};

pub(crate) const MONTHS_PER_YEAR: u32 = 12;

// Contributions land at the end of each month. Only the year rows are rounded.
pub fn simulate(plan: &InvestmentPlan) -> ProjectionResult {
    let monthly_rate = monthly_rate(plan.annual_return_rate_percent);
    let mut balance = plan.lump_sum;
    let mut total_invested = plan.lump_sum;
    let mut contribution = plan.monthly_contribution;
    let mut yearly_breakdown = Vec::with_capacity(plan.duration_years as usize);

    for year in 1..=plan.duration_years {
        for _ in 0..MONTHS_PER_YEAR {
            balance = balance * (1.0 + monthly_rate) + contribution;
            total_invested += contribution;
        }

        yearly_breakdown.push(year_snapshot(year, total_invested, balance));

        if plan.step_up_enabled && year < plan.duration_years {
            contribution = step_up(contribution, plan.step_up_percent);
        }
    }

    let maturity_amount = round_currency(balance);
    let total_investment = round_currency(total_invested);
    ProjectionResult {
        monthly_investment: plan.monthly_contribution,
        total_investment,
        maturity_amount,
        total_gains: maturity_amount - total_investment,
        yearly_breakdown,
    }
}

pub fn deflate(nominal_amount: f64, inflation_rate_percent: f64, years: f64) -> f64 {
    if inflation_rate_percent > 0.0 {
        nominal_amount / (1.0 + inflation_rate_percent / 100.0).powf(years)
    } else {
        nominal_amount
    }
}

pub fn projection_metrics(
    result: &ProjectionResult,
    inflation_rate_percent: f64,
) -> ProjectionMetrics {
    let duration_years = result.yearly_breakdown.len() as u64;
    ProjectionMetrics {
        total_return_percent: (result.maturity_amount / result.total_investment - 1.0) * 100.0,
        total_installments: duration_years * u64::from(MONTHS_PER_YEAR),
        inflation_rate_percent,
        real_value: deflate(
            result.maturity_amount,
            inflation_rate_percent,
            duration_years as f64,
        ),
    }
}

pub(crate) fn monthly_rate(annual_rate_percent: f64) -> f64 {
    annual_rate_percent / 100.0 / MONTHS_PER_YEAR as f64
}

// Halves go towards +inf: 2.5 -> 3, -2.5 -> -2.
pub(crate) fn round_currency(amount: f64) -> f64 {
    let rounded = amount.round();
    if amount - rounded == 0.5 {
        rounded + 1.0
    } else {
        rounded
    }
}

fn step_up(contribution: f64, step_up_percent: f64) -> f64 {
    round_currency(contribution * (1.0 + step_up_percent / 100.0))
}

fn year_snapshot(year: u32, total_invested: f64, balance: f64) -> YearSnapshot {
    let invested_cumulative = round_currency(total_invested);
    let value = round_currency(balance);
    YearSnapshot {
        year,
        invested_cumulative,
        value,
        gains: value - invested_cumulative,
    }
}
