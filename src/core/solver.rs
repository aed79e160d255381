use super::annuity::required_monthly_contribution;
use super::error::ProjectionResult;
use super::growth::{future_value_of_lumpsum, present_value_of_lumpsum};

/// A goal priced in today's money, with savings already earmarked for it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalRequest {
    pub current_cost: f64,
    pub inflation_percent: f64,
    pub current_investment: f64,
    pub return_on_existing_percent: f64,
    pub return_on_new_percent: f64,
    pub years: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalPlan {
    pub years: u32,
    pub future_cost: f64,
    pub future_value_of_existing: f64,
    pub deficit: f64,
    pub required_lumpsum: f64,
    pub required_monthly_sip: f64,
}

/// Shortfall between the goal's future cost and what existing savings grow
/// to. Negative when the goal is already covered.
pub fn deficit(
    future_cost_of_goal: f64,
    current_investment: f64,
    return_on_existing_percent: f64,
    years: u32,
) -> f64 {
    future_cost_of_goal
        - future_value_of_lumpsum(current_investment, return_on_existing_percent, years)
}

pub fn required_lumpsum_today(deficit: f64, return_on_new_percent: f64, years: u32) -> f64 {
    if deficit <= 0.0 {
        return 0.0;
    }
    present_value_of_lumpsum(deficit, return_on_new_percent, years)
}

pub fn required_monthly_sip(
    deficit: f64,
    return_on_new_percent: f64,
    years: u32,
) -> ProjectionResult<f64> {
    required_monthly_contribution(deficit, return_on_new_percent, years)
}

pub fn solve_goal(request: &GoalRequest) -> ProjectionResult<GoalPlan> {
    let future_cost =
        future_value_of_lumpsum(request.current_cost, request.inflation_percent, request.years);
    solve_priced_goal(
        future_cost,
        request.current_investment,
        request.return_on_existing_percent,
        request.return_on_new_percent,
        request.years,
    )
}

/// Same as [`solve_goal`] for a goal whose future cost is already known.
pub fn solve_priced_goal(
    future_cost: f64,
    current_investment: f64,
    return_on_existing_percent: f64,
    return_on_new_percent: f64,
    years: u32,
) -> ProjectionResult<GoalPlan> {
    let future_value_of_existing =
        future_value_of_lumpsum(current_investment, return_on_existing_percent, years);
    fund_shortfall(future_cost, future_value_of_existing, return_on_new_percent, years)
}

/// Turns a projected cost and projected savings into the new money needed,
/// either today or as a monthly SIP at `return_on_new_percent`.
pub fn fund_shortfall(
    future_cost: f64,
    future_value_of_existing: f64,
    return_on_new_percent: f64,
    years: u32,
) -> ProjectionResult<GoalPlan> {
    let shortfall = future_cost - future_value_of_existing;
    Ok(GoalPlan {
        years,
        future_cost,
        future_value_of_existing,
        deficit: shortfall,
        required_lumpsum: required_lumpsum_today(shortfall, return_on_new_percent, years),
        required_monthly_sip: required_monthly_sip(shortfall, return_on_new_percent, years)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::assert_close;
    use crate::core::annuity::future_value_of_annuity;
    use crate::core::error::ProjectionError;
    use proptest::prelude::{prop_assert, proptest};

    fn education_request() -> GoalRequest {
        GoalRequest {
            current_cost: 1_000_000.0,
            inflation_percent: 10.0,
            current_investment: 200_000.0,
            return_on_existing_percent: 8.0,
            return_on_new_percent: 12.0,
            years: 10,
        }
    }

    #[test]
    fn deficit_subtracts_grown_savings_from_future_cost() {
        let shortfall = deficit(500_000.0, 100_000.0, 10.0, 2);
        assert_close(shortfall, 500_000.0 - 121_000.0, 1e-6);
    }

    #[test]
    fn covered_goal_has_negative_deficit_and_zero_requirements() {
        let plan = solve_priced_goal(100_000.0, 500_000.0, 8.0, 12.0, 5).expect("solvable");
        assert!(plan.deficit < 0.0);
        assert_eq!(plan.required_lumpsum, 0.0);
        assert_eq!(plan.required_monthly_sip, 0.0);
    }

    #[test]
    fn goal_plan_funds_the_deficit_both_ways() {
        let request = education_request();
        let plan = solve_goal(&request).expect("solvable");

        assert_close(plan.future_cost, 1_000_000.0 * 1.1f64.powi(10), 1e-6);
        assert_close(plan.future_value_of_existing, 200_000.0 * 1.08f64.powi(10), 1e-6);
        assert_close(plan.deficit, plan.future_cost - plan.future_value_of_existing, 1e-9);

        let lumpsum_grown = future_value_of_lumpsum(plan.required_lumpsum, 12.0, 10);
        assert_close(lumpsum_grown, plan.deficit, 1e-6);

        let sip_grown =
            future_value_of_annuity(plan.required_monthly_sip, 12.0, 10).expect("valid horizon");
        assert_close(sip_grown, plan.deficit, 1e-6);
    }

    #[test]
    fn goal_due_now_with_shortfall_cannot_use_monthly_sip() {
        let mut request = education_request();
        request.years = 0;
        let err = solve_goal(&request).expect_err("no months left");
        assert!(matches!(err, ProjectionError::InvalidInput { field: "years", .. }));
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(48))]

        #[test]
        fn prop_requirements_are_never_negative(
            cost in 0u32..10_000_000,
            investment in 0u32..10_000_000,
            inflation_bp in 0u32..1_500,
            existing_bp in 0u32..1_500,
            new_bp in 0u32..1_500,
            years in 1u32..40
        ) {
            let plan = solve_goal(&GoalRequest {
                current_cost: cost as f64,
                inflation_percent: inflation_bp as f64 / 100.0,
                current_investment: investment as f64,
                return_on_existing_percent: existing_bp as f64 / 100.0,
                return_on_new_percent: new_bp as f64 / 100.0,
                years,
            }).expect("solvable");
            prop_assert!(plan.required_lumpsum >= 0.0);
            prop_assert!(plan.required_monthly_sip >= 0.0);
            prop_assert!(plan.required_lumpsum <= plan.deficit.max(0.0) + 1e-6);
        }
    }
}
