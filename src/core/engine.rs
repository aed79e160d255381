use log::debug;

use super::amortization::{
    AmortizationSchedule, amortization_schedule, equal_monthly_installment, totals,
};
use super::annuity::project_annuity;
use super::depletion::{WithdrawalPlan, simulate_withdrawal_plan};
use super::error::{ProjectionError, ProjectionResult};
use super::growth::{future_value_of_lumpsum, simple_interest};
use super::solver::{GoalPlan, GoalRequest, fund_shortfall, solve_goal, solve_priced_goal};
use super::step_up::{project_annual_step_up, project_limited_term};
use super::time_value::MAX_YEARS;
use super::types::{
    BirthdaySipInput, ChildEducationInput, CostOfDelayInput, EmiInput, ExistingGrowth, GoalInput,
    HomeLoanVsSipInput, LifeInsuranceInput, LimitedSipInput, LumpsumInput, RetirementInput,
    Scenario, ScenarioKind, ScenarioResult, SipInput, StepUpSipInput, SwpInput, VacationInput,
    WeddingInput,
};

pub fn run_scenario(scenario: &Scenario) -> ProjectionResult<ScenarioResult> {
    debug!("running {} scenario", scenario.kind());
    match scenario {
        Scenario::Sip(input) => run_sip(input),
        Scenario::Lumpsum(input) => run_lumpsum(input),
        Scenario::SimpleInterest(input) => run_simple_interest(input),
        Scenario::StepUpSip(input) => run_step_up_sip(input),
        Scenario::LimitedSip(input) => run_limited_sip(input),
        Scenario::BirthdaySip(input) => run_birthday_sip(input),
        Scenario::CostOfDelay(input) => run_cost_of_delay(input),
        Scenario::Emi(input) => run_emi(input),
        Scenario::HomeLoanVsSip(input) => run_home_loan_vs_sip(input),
        Scenario::Swp(input) => run_swp(input),
        Scenario::ChildEducation(input) => run_child_education(input),
        Scenario::Retirement(input) => run_retirement(input),
        Scenario::LifeInsurance(input) => run_life_insurance(input),
        Scenario::Wedding(input) => run_wedding(input),
        Scenario::Vacation(input) => run_vacation(input),
        Scenario::Car(input) => run_car(input),
    }
}

pub fn run_sip(input: &SipInput) -> ProjectionResult<ScenarioResult> {
    require_amount("monthlyContribution", input.monthly_contribution)?;
    require_percent("annualRatePercent", input.annual_rate_percent)?;
    require_years("years", input.years)?;

    monthly_annuity_result(
        ScenarioKind::Sip,
        input.monthly_contribution,
        input.annual_rate_percent,
        input.years,
    )
}

pub fn run_birthday_sip(input: &BirthdaySipInput) -> ProjectionResult<ScenarioResult> {
    require_amount("monthlyContribution", input.monthly_contribution)?;
    require_percent("annualRatePercent", input.annual_rate_percent)?;
    require_years("years", input.years)?;

    monthly_annuity_result(
        ScenarioKind::BirthdaySip,
        input.monthly_contribution,
        input.annual_rate_percent,
        input.years,
    )
}

fn monthly_annuity_result(
    kind: ScenarioKind,
    monthly_contribution: f64,
    annual_rate_percent: f64,
    years: u32,
) -> ProjectionResult<ScenarioResult> {
    let projection = project_annuity(monthly_contribution, annual_rate_percent, years)?;
    ScenarioResult::new(kind)
        .with("futureValue", projection.future_value)?
        .with("totalInvested", projection.total_invested)?
        .with("totalGrowth", projection.total_growth)
}

pub fn run_lumpsum(input: &LumpsumInput) -> ProjectionResult<ScenarioResult> {
    validate_lumpsum(input)?;
    let future_value =
        future_value_of_lumpsum(input.principal, input.annual_rate_percent, input.years);
    ScenarioResult::new(ScenarioKind::Lumpsum)
        .with("futureValue", future_value)?
        .with("totalInvested", input.principal)?
        .with("totalGrowth", future_value - input.principal)
}

pub fn run_simple_interest(input: &LumpsumInput) -> ProjectionResult<ScenarioResult> {
    validate_lumpsum(input)?;
    let interest = simple_interest(input.principal, input.annual_rate_percent, input.years);
    ScenarioResult::new(ScenarioKind::SimpleInterest)
        .with("interest", interest)?
        .with("totalAmount", input.principal + interest)
}

fn validate_lumpsum(input: &LumpsumInput) -> ProjectionResult<()> {
    require_amount("principal", input.principal)?;
    require_percent("annualRatePercent", input.annual_rate_percent)?;
    require_years("years", input.years)?;
    Ok(())
}

pub fn run_step_up_sip(input: &StepUpSipInput) -> ProjectionResult<ScenarioResult> {
    require_amount("monthlyContribution", input.monthly_contribution)?;
    require_percent("annualRatePercent", input.annual_rate_percent)?;
    require_percent("stepUpPercent", input.step_up_percent)?;
    require_years("years", input.years)?;

    let projection = project_annual_step_up(
        input.monthly_contribution,
        input.annual_rate_percent,
        input.step_up_percent,
        input.years,
    )?;
    ScenarioResult::new(ScenarioKind::StepUpSip)
        .with("futureValue", projection.future_value)?
        .with("totalInvested", projection.total_invested)?
        .with("totalGrowth", projection.total_growth())?
        .with("finalMonthlyContribution", projection.final_monthly_contribution)
}

pub fn run_limited_sip(input: &LimitedSipInput) -> ProjectionResult<ScenarioResult> {
    require_amount("monthlyContribution", input.monthly_contribution)?;
    require_percent("annualRatePercent", input.annual_rate_percent)?;
    require_years("contributionYears", input.contribution_years)?;
    require_years("horizonYears", input.horizon_years)?;

    let projection = project_limited_term(
        input.monthly_contribution,
        input.annual_rate_percent,
        input.contribution_years,
        input.horizon_years,
    )?;
    ScenarioResult::new(ScenarioKind::LimitedSip)
        .with("futureValue", projection.future_value)?
        .with("totalInvested", projection.total_invested)?
        .with("totalGrowth", projection.total_growth)
}

/// Growth forgone by investing the same lumpsum `delay_years` later while
/// still measuring at `horizon_years`.
pub fn run_cost_of_delay(input: &CostOfDelayInput) -> ProjectionResult<ScenarioResult> {
    require_amount("principal", input.principal)?;
    require_percent("annualRatePercent", input.annual_rate_percent)?;
    let invested_years = year_span(
        "delayYears",
        input.delay_years,
        "horizonYears",
        input.horizon_years,
    )?;
    require_years("horizonYears", input.horizon_years)?;

    let without_delay =
        future_value_of_lumpsum(input.principal, input.annual_rate_percent, input.horizon_years);
    let with_delay =
        future_value_of_lumpsum(input.principal, input.annual_rate_percent, invested_years);
    ScenarioResult::new(ScenarioKind::CostOfDelay)
        .with("futureValueWithoutDelay", without_delay)?
        .with("futureValueWithDelay", with_delay)?
        .with("lossDueToDelay", without_delay - with_delay)
}

pub fn run_emi(input: &EmiInput) -> ProjectionResult<ScenarioResult> {
    require_amount("principal", input.principal)?;
    require_percent("annualRatePercent", input.annual_rate_percent)?;
    require_years("years", input.years)?;

    let emi = equal_monthly_installment(input.principal, input.annual_rate_percent, input.years)?;
    let loan = totals(emi, input.years * 12, input.principal);
    ScenarioResult::new(ScenarioKind::Emi)
        .with("emi", emi)?
        .with("totalPayment", loan.total_payment)?
        .with("totalInterest", loan.total_interest)
}

/// Month-by-month repayment schedule for the same loan terms as [`run_emi`].
pub fn run_amortization(input: &EmiInput) -> ProjectionResult<AmortizationSchedule> {
    require_amount("principal", input.principal)?;
    require_percent("annualRatePercent", input.annual_rate_percent)?;
    require_years("years", input.years)?;
    amortization_schedule(input.principal, input.annual_rate_percent, input.years)
}

/// Puts the cost of a loan next to what the same horizon of monthly SIPs
/// would grow to.
pub fn run_home_loan_vs_sip(input: &HomeLoanVsSipInput) -> ProjectionResult<ScenarioResult> {
    require_amount("loanAmount", input.loan_amount)?;
    require_percent("loanRatePercent", input.loan_rate_percent)?;
    require_amount("monthlySip", input.monthly_sip)?;
    require_percent("sipRatePercent", input.sip_rate_percent)?;
    require_years("years", input.years)?;

    let emi = equal_monthly_installment(input.loan_amount, input.loan_rate_percent, input.years)?;
    let loan = totals(emi, input.years * 12, input.loan_amount);
    let sip = project_limited_term(
        input.monthly_sip,
        input.sip_rate_percent,
        input.years,
        input.years,
    )?;

    ScenarioResult::new(ScenarioKind::HomeLoanVsSip)
        .with("emi", emi)?
        .with("totalLoanPayment", loan.total_payment)?
        .with("totalLoanInterest", loan.total_interest)?
        .with("futureSipValue", sip.future_value)?
        .with("totalSipInvested", sip.total_invested)?
        .with("totalSipGrowth", sip.total_growth)
}

pub fn run_swp(input: &SwpInput) -> ProjectionResult<ScenarioResult> {
    let plan = withdrawal_plan(input)?;
    let outcome = simulate_withdrawal_plan(&plan)?;

    let result = ScenarioResult::new(ScenarioKind::Swp)
        .with("finalBalance", outcome.final_balance)?
        .with("totalWithdrawn", outcome.total_withdrawn)?;
    match outcome.exhausted_at_month {
        Some(month) => result.with("exhaustedAtMonth", month as f64),
        None => Ok(result),
    }
}

/// Validated plan shared by the SWP scenario and the month-by-month trace.
pub fn withdrawal_plan(input: &SwpInput) -> ProjectionResult<WithdrawalPlan> {
    require_amount("lumpsum", input.lumpsum)?;
    require_amount("monthlyWithdrawal", input.monthly_withdrawal)?;
    require_percent("annualRatePercent", input.annual_rate_percent)?;
    require_years("tenureYears", input.tenure_years)?;
    require_years("deferredYears", input.deferred_years)?;

    Ok(WithdrawalPlan {
        lumpsum: input.lumpsum,
        monthly_withdrawal: input.monthly_withdrawal,
        annual_rate_percent: input.annual_rate_percent,
        tenure_years: input.tenure_years,
        deferred_years: input.deferred_years,
    })
}

pub fn run_child_education(input: &ChildEducationInput) -> ProjectionResult<ScenarioResult> {
    let years = year_span("childAge", input.child_age, "educationAge", input.education_age)?;
    let plan = solve_goal(&goal_request(
        years,
        input.current_cost,
        input.current_investment,
        input.inflation_percent,
        input.return_on_existing_percent,
        input.return_on_new_percent,
    )?)?;
    goal_result(ScenarioKind::ChildEducation, &plan)
}

pub fn run_wedding(input: &WeddingInput) -> ProjectionResult<ScenarioResult> {
    let years = year_span("childAge", input.child_age, "marriageAge", input.marriage_age)?;
    let plan = solve_goal(&goal_request(
        years,
        input.current_cost,
        input.current_investment,
        input.inflation_percent,
        input.return_on_existing_percent,
        input.return_on_new_percent,
    )?)?;
    goal_result(ScenarioKind::Wedding, &plan)
}

pub fn run_car(input: &GoalInput) -> ProjectionResult<ScenarioResult> {
    require_years("years", input.years)?;
    let plan = solve_goal(&goal_request(
        input.years,
        input.current_cost,
        input.current_investment,
        input.inflation_percent,
        input.return_on_existing_percent,
        input.return_on_new_percent,
    )?)?;
    goal_result(ScenarioKind::Car, &plan)
}

pub fn run_vacation(input: &VacationInput) -> ProjectionResult<ScenarioResult> {
    require_years("years", input.years)?;
    let request = goal_request(
        input.years,
        input.current_cost,
        input.current_investment,
        input.inflation_percent,
        input.return_on_existing_percent,
        input.return_on_new_percent,
    )?;

    let plan = match input.existing_growth {
        ExistingGrowth::Compound => solve_goal(&request)?,
        ExistingGrowth::LegacySimple => {
            // one year of growth at the new-money rate, scaled by the horizon
            let existing = request.current_investment
                * (1.0 + request.return_on_new_percent / 100.0)
                * request.years as f64;
            let future_cost =
                future_value_of_lumpsum(request.current_cost, request.inflation_percent, request.years);
            fund_shortfall(future_cost, existing, request.return_on_new_percent, request.years)?
        }
    };
    goal_result(ScenarioKind::Vacation, &plan)
}

pub fn run_retirement(input: &RetirementInput) -> ProjectionResult<ScenarioResult> {
    let years_to_retirement = year_span(
        "currentAge",
        input.current_age,
        "retirementAge",
        input.retirement_age,
    )?;
    let retirement_years = year_span(
        "retirementAge",
        input.retirement_age,
        "lifeExpectancy",
        input.life_expectancy,
    )?;
    require_amount("currentMonthlyExpenses", input.current_monthly_expenses)?;
    require_amount("existingInvestment", input.existing_investment)?;
    require_percent("inflationPercent", input.inflation_percent)?;
    require_percent("returnOnExistingPercent", input.return_on_existing_percent)?;
    require_percent("returnOnNewPercent", input.return_on_new_percent)?;

    let future_monthly_expenses = future_value_of_lumpsum(
        input.current_monthly_expenses,
        input.inflation_percent,
        years_to_retirement,
    );
    let total_retirement_expenses = future_monthly_expenses * 12.0 * retirement_years as f64;
    let plan = solve_priced_goal(
        total_retirement_expenses,
        input.existing_investment,
        input.return_on_existing_percent,
        input.return_on_new_percent,
        years_to_retirement,
    )?;
    let flat_monthly_savings = if years_to_retirement == 0 {
        0.0
    } else {
        plan.deficit.max(0.0) / (12.0 * years_to_retirement as f64)
    };

    ScenarioResult::new(ScenarioKind::Retirement)
        .with("yearsToRetirement", years_to_retirement as f64)?
        .with("futureMonthlyExpenses", future_monthly_expenses)?
        .with("totalRetirementExpenses", total_retirement_expenses)?
        .with("futureValueOfExisting", plan.future_value_of_existing)?
        .with("deficit", plan.deficit)?
        .with("requiredLumpsum", plan.required_lumpsum)?
        .with("requiredMonthlySip", plan.required_monthly_sip)?
        .with("flatMonthlySavings", flat_monthly_savings)
}

/// Cover a family needs if income stops today: household expenses until the
/// spouse's life expectancy, the children's education and wedding, and open
/// loans, less cover and savings already in place.
pub fn run_life_insurance(input: &LifeInsuranceInput) -> ProjectionResult<ScenarioResult> {
    let support_years = year_span(
        "currentAge",
        input.current_age,
        "spouseLifeExpectancy",
        input.spouse_life_expectancy,
    )?;
    let education_years = year_span(
        "educationChildAge",
        input.education_child_age,
        "higherEducationAge",
        input.higher_education_age,
    )?;
    let wedding_years = year_span(
        "weddingChildAge",
        input.wedding_child_age,
        "marriageAge",
        input.marriage_age,
    )?;
    require_amount("currentMonthlyExpenses", input.current_monthly_expenses)?;
    require_percent("inflationPercent", input.inflation_percent)?;
    require_percent("childGoalInflationPercent", input.child_goal_inflation_percent)?;
    require_amount("educationCost", input.education_cost)?;
    require_amount("weddingCost", input.wedding_cost)?;
    require_amount("outstandingLoans", input.outstanding_loans)?;
    require_amount("currentLifeCover", input.current_life_cover)?;
    require_amount("currentInvestments", input.current_investments)?;

    let future_monthly_expenses =
        future_value_of_lumpsum(input.current_monthly_expenses, input.inflation_percent, support_years);
    let future_education_cost = future_value_of_lumpsum(
        input.education_cost,
        input.child_goal_inflation_percent,
        education_years,
    );
    let future_wedding_cost = future_value_of_lumpsum(
        input.wedding_cost,
        input.child_goal_inflation_percent,
        wedding_years,
    );
    let total_need = future_monthly_expenses * 12.0 * support_years as f64
        + future_education_cost
        + future_wedding_cost
        + input.outstanding_loans
        - input.current_life_cover
        - input.current_investments;

    ScenarioResult::new(ScenarioKind::LifeInsurance)
        .with("futureMonthlyExpenses", future_monthly_expenses)?
        .with("futureEducationCost", future_education_cost)?
        .with("futureWeddingCost", future_wedding_cost)?
        .with("totalInsuranceNeed", total_need)?
        .with("additionalCoverRequired", total_need.max(0.0))
}

fn goal_request(
    years: u32,
    current_cost: f64,
    current_investment: f64,
    inflation_percent: f64,
    return_on_existing_percent: f64,
    return_on_new_percent: f64,
) -> ProjectionResult<GoalRequest> {
    Ok(GoalRequest {
        current_cost: require_amount("currentCost", current_cost)?,
        inflation_percent: require_percent("inflationPercent", inflation_percent)?,
        current_investment: require_amount("currentInvestment", current_investment)?,
        return_on_existing_percent: require_percent(
            "returnOnExistingPercent",
            return_on_existing_percent,
        )?,
        return_on_new_percent: require_percent("returnOnNewPercent", return_on_new_percent)?,
        years,
    })
}

fn goal_result(kind: ScenarioKind, plan: &GoalPlan) -> ProjectionResult<ScenarioResult> {
    ScenarioResult::new(kind)
        .with("yearsToGoal", plan.years as f64)?
        .with("futureCost", plan.future_cost)?
        .with("futureValueOfExisting", plan.future_value_of_existing)?
        .with("deficit", plan.deficit)?
        .with("requiredLumpsum", plan.required_lumpsum)?
        .with("requiredMonthlySip", plan.required_monthly_sip)
}

fn require_amount(field: &'static str, value: f64) -> ProjectionResult<f64> {
    if !value.is_finite() {
        return Err(ProjectionError::invalid(field, "must be a finite number"));
    }
    if value < 0.0 {
        return Err(ProjectionError::invalid(field, "must be >= 0"));
    }
    Ok(value)
}

fn require_percent(field: &'static str, value: f64) -> ProjectionResult<f64> {
    require_amount(field, value)
}

fn require_years(field: &'static str, years: u32) -> ProjectionResult<u32> {
    if years > MAX_YEARS {
        return Err(ProjectionError::invalid(
            field,
            format!("must be <= {MAX_YEARS}"),
        ));
    }
    Ok(years)
}

/// Years between two ages or offsets, rejecting spans that run backwards.
fn year_span(
    from_field: &'static str,
    from: u32,
    to_field: &'static str,
    to: u32,
) -> ProjectionResult<u32> {
    if to < from {
        return Err(ProjectionError::invalid(
            to_field,
            format!("must be >= {from_field}"),
        ));
    }
    require_years(to_field, to - from)
}
