use super::engine::{MONTHS_PER_YEAR, monthly_rate, round_currency};
use super::types::{GoalPlan, GoalResult, ScenarioOutcome, ScenarioRate, ScenarioSet};

/// Future value of one unit paid at the start of each of `months` periods.
///
/// This is the annuity-due convention: every payment earns interest for its own period.
/// The month-by-month simulator books contributions at period end instead, so the two
/// disagree by a factor of `1 + rate`.
pub fn annuity_due_factor(monthly_rate: f64, months: f64) -> f64 {
    if monthly_rate == 0.0 {
        return months;
    }
    ((1.0 + monthly_rate).powf(months) - 1.0) / monthly_rate * (1.0 + monthly_rate)
}

fn month_count(duration_years: u32) -> f64 {
    f64::from(duration_years) * f64::from(MONTHS_PER_YEAR)
}

pub fn solve_goal(plan: &GoalPlan) -> GoalResult {
    let rate = monthly_rate(plan.annual_return_rate_percent);
    let months = month_count(plan.duration_years);
    let required_contribution =
        round_currency(plan.target_amount / annuity_due_factor(rate, months));
    let gap = required_contribution - plan.current_contribution;
    // Comparison keeps NaN.
    let shortfall = if gap < 0.0 { 0.0 } else { gap };
    let progress_percent = goal_progress_percent(plan.current_contribution, required_contribution);

    GoalResult {
        target_amount: plan.target_amount,
        required_contribution,
        shortfall,
        progress_percent,
    }
}

pub fn goal_progress_percent(current_contribution: f64, required_contribution: f64) -> f64 {
    let progress = current_contribution / required_contribution * 100.0;
    if progress > 100.0 { 100.0 } else { progress }
}

pub fn default_scenario_rates() -> Vec<ScenarioRate> {
    vec![
        ScenarioRate::new(8.0, "Conservative"),
        ScenarioRate::new(12.0, "Moderate"),
        ScenarioRate::new(15.0, "Aggressive"),
    ]
}

// Flat contribution only: lump sums and step-ups are not part of the comparison.
pub fn compare_scenarios(
    monthly_contribution: f64,
    duration_years: u32,
    rates: &[ScenarioRate],
) -> ScenarioSet {
    let months = month_count(duration_years);
    let total_investment = monthly_contribution * months;

    let outcomes = rates
        .iter()
        .map(|scenario| {
            let factor = annuity_due_factor(monthly_rate(scenario.rate_percent), months);
            let maturity_amount = monthly_contribution * factor;
            ScenarioOutcome {
                annual_rate_percent: scenario.rate_percent,
                label: scenario.label.clone(),
                total_investment: round_currency(total_investment),
                maturity_amount: round_currency(maturity_amount),
                gains: round_currency(maturity_amount - total_investment),
            }
        })
        .collect();

    ScenarioSet { outcomes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, proptest};

    fn assert_close(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}, tolerance {tol}"
        );
    }

    fn sample_goal() -> GoalPlan {
        GoalPlan {
            target_amount: 1_000_000.0,
            duration_years: 10,
            annual_return_rate_percent: 12.0,
            current_contribution: 5_000.0,
        }
    }

    #[test]
    fn required_contribution_uses_annuity_due_inverse() {
        let result = solve_goal(&sample_goal());
        assert_eq!(result.required_contribution, 4_304.0);
        assert_eq!(result.shortfall, 0.0);
        assert_eq!(result.progress_percent, 100.0);
        assert_eq!(result.target_amount, 1_000_000.0);
    }

    #[test]
    fn shortfall_is_measured_against_rounded_requirement() {
        let plan = GoalPlan {
            current_contribution: 3_000.5,
            ..sample_goal()
        };
        let result = solve_goal(&plan);
        assert_eq!(result.shortfall, 4_304.0 - 3_000.5);
        assert_close(result.progress_percent, 3_000.5 / 4_304.0 * 100.0, 1e-9);
    }

    #[test]
    fn zero_rate_goal_divides_evenly_over_months() {
        let plan = GoalPlan {
            target_amount: 120_000.0,
            duration_years: 10,
            annual_return_rate_percent: 0.0,
            current_contribution: 0.0,
        };
        let result = solve_goal(&plan);
        assert_eq!(result.required_contribution, 1_000.0);
        assert_eq!(result.shortfall, 1_000.0);
        assert_eq!(result.progress_percent, 0.0);
    }

    #[test]
    fn zero_duration_goal_is_degenerate_not_a_panic() {
        let plan = GoalPlan {
            duration_years: 0,
            ..sample_goal()
        };
        let result = solve_goal(&plan);
        assert!(!result.required_contribution.is_finite());
    }

    #[test]
    fn huge_duration_goal_does_not_overflow_month_count() {
        let plan = GoalPlan {
            duration_years: u32::MAX,
            ..sample_goal()
        };
        let result = solve_goal(&plan);
        assert_eq!(result.required_contribution, 0.0);
        assert_eq!(result.shortfall, 0.0);
        assert_eq!(result.progress_percent, 100.0);
    }

    #[test]
    fn nan_goal_inputs_propagate_to_progress_and_shortfall() {
        let plan = GoalPlan {
            target_amount: f64::NAN,
            ..sample_goal()
        };
        let result = solve_goal(&plan);
        assert!(result.required_contribution.is_nan());
        assert!(result.shortfall.is_nan());
        assert!(result.progress_percent.is_nan());
        assert!(goal_progress_percent(5_000.0, f64::NAN).is_nan());
        assert_eq!(goal_progress_percent(5_000.0, 2_500.0), 100.0);
    }

    #[test]
    fn huge_duration_scenarios_do_not_overflow_month_count() {
        let set = compare_scenarios(5_000.0, u32::MAX, &default_scenario_rates());
        assert_eq!(set.len(), 3);
        for outcome in &set.outcomes {
            assert_eq!(outcome.total_investment, 5_000.0 * 12.0 * f64::from(u32::MAX));
            assert_eq!(outcome.maturity_amount, f64::INFINITY);
            assert_eq!(outcome.gains, f64::INFINITY);
        }
    }

    #[test]
    fn default_scenarios_match_closed_form() {
        let set = compare_scenarios(5_000.0, 10, &default_scenario_rates());
        assert_eq!(set.len(), 3);

        let labels = set
            .outcomes
            .iter()
            .map(|o| o.label.as_str())
            .collect::<Vec<_>>();
        assert_eq!(labels, vec!["Conservative", "Moderate", "Aggressive"]);

        let moderate = set.find("Moderate").expect("moderate scenario");
        assert_eq!(moderate.annual_rate_percent, 12.0);
        assert_eq!(moderate.total_investment, 600_000.0);
        assert_eq!(moderate.maturity_amount, 1_161_695.0);
        assert_eq!(moderate.gains, 561_695.0);

        let conservative = set.find("Conservative").expect("conservative scenario");
        assert_eq!(conservative.maturity_amount, 920_828.0);
        let aggressive = set.find("Aggressive").expect("aggressive scenario");
        assert_eq!(aggressive.maturity_amount, 1_393_286.0);
    }

    #[test]
    fn scenarios_follow_caller_order_and_handle_zero_rate() {
        let rates = vec![ScenarioRate::new(0.0, "Cash"), ScenarioRate::new(8.0, "Bonds")];
        let set = compare_scenarios(1_000.0, 2, &rates);
        assert_eq!(set.outcomes[0].label, "Cash");
        assert_eq!(set.outcomes[0].maturity_amount, 24_000.0);
        assert_eq!(set.outcomes[0].gains, 0.0);
        assert_eq!(set.outcomes[1].label, "Bonds");
        assert!(set.outcomes[1].gains > 0.0);
    }

    #[test]
    fn empty_rate_list_gives_empty_set() {
        let set = compare_scenarios(1_000.0, 5, &[]);
        assert!(set.is_empty());
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_required_contribution_round_trips_through_closed_form(
            target in 10_000u32..50_000_000,
            duration_years in 1u32..41,
            rate_bp in 0u32..2_500
        ) {
            let rate_percent = rate_bp as f64 / 100.0;
            let goal = solve_goal(&GoalPlan {
                target_amount: target as f64,
                duration_years,
                annual_return_rate_percent: rate_percent,
                current_contribution: 0.0,
            });
            let set = compare_scenarios(
                goal.required_contribution,
                duration_years,
                &[ScenarioRate::new(rate_percent, "check")],
            );
            // Rounding the contribution by at most 0.5 moves the maturity by at most
            // half of one contribution's annuity factor, plus the final rounding.
            let tolerance =
                0.5 * annuity_due_factor(monthly_rate(rate_percent), month_count(duration_years))
                    + 1.0;
            prop_assert!((set.outcomes[0].maturity_amount - target as f64).abs() <= tolerance);
        }

        #[test]
        fn prop_shortfall_is_never_negative(
            target in 1_000u32..10_000_000,
            duration_years in 1u32..41,
            rate_bp in 0u32..2_500,
            current in 0u32..500_000
        ) {
            let goal = solve_goal(&GoalPlan {
                target_amount: target as f64,
                duration_years,
                annual_return_rate_percent: rate_bp as f64 / 100.0,
                current_contribution: current as f64,
            });
            prop_assert!(goal.shortfall >= 0.0);
            prop_assert!(goal.progress_percent <= 100.0);
        }
    }
}
