mod amortization;
mod annuity;
mod depletion;
mod engine;
mod error;
mod growth;
mod solver;
mod step_up;
mod time_value;
mod types;

pub use amortization::{
    AmortizationRow, AmortizationSchedule, LoanTotals, amortization_schedule,
    equal_monthly_installment, totals,
};
pub use annuity::{
    AnnuityProjection, future_value_of_annuity, project_annuity, required_monthly_contribution,
};
pub use depletion::{
    DepletionOutcome, DepletionPoint, DepletionTrace, WithdrawalPlan, run_depletion_trace,
    simulate_withdrawal_plan,
};
pub use engine::{run_amortization, run_scenario, withdrawal_plan};
pub use error::{ProjectionError, ProjectionResult};
pub use growth::{future_value_of_lumpsum, present_value_of_lumpsum, simple_interest};
pub use solver::{
    GoalPlan, GoalRequest, deficit, fund_shortfall, required_lumpsum_today, required_monthly_sip,
    solve_goal, solve_priced_goal,
};
pub use step_up::{
    StepUpProjection, future_value_with_annual_step_up, future_value_with_limited_term,
    project_annual_step_up, project_limited_term,
};
pub use time_value::{MAX_YEARS, monthly_rate, round_to_cents};
pub use types::{
    BirthdaySipInput, ChildEducationInput, CostOfDelayInput, EmiInput, ExistingGrowth, GoalInput,
    HomeLoanVsSipInput, LifeInsuranceInput, LimitedSipInput, LumpsumInput, RetirementInput,
    Scenario, ScenarioKind, ScenarioResult, SipInput, StepUpSipInput, SwpInput, VacationInput,
    WeddingInput,
};

#[cfg(test)]
pub(crate) fn assert_close(actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() <= tol,
        "expected {expected}, got {actual}, tolerance {tol}"
    );
}
