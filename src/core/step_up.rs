use serde::Serialize;

use super::annuity::AnnuityProjection;
use super::error::ProjectionResult;
use super::time_value::{compound, monthly_rate, months_in, serialize_cents};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepUpProjection {
    #[serde(serialize_with = "serialize_cents")]
    pub future_value: f64,
    #[serde(serialize_with = "serialize_cents")]
    pub total_invested: f64,
    #[serde(serialize_with = "serialize_cents")]
    pub final_monthly_contribution: f64,
}

impl StepUpProjection {
    pub fn total_growth(&self) -> f64 {
        self.future_value - self.total_invested
    }
}

/// Simulates a contribution raised by `step_up_percent` after every 12th
/// month. Each month the contribution is added first and the balance is then
/// grown by one month of interest.
pub fn project_annual_step_up(
    initial_monthly_contribution: f64,
    annual_rate_percent: f64,
    step_up_percent: f64,
    years: u32,
) -> ProjectionResult<StepUpProjection> {
    let months = months_in("years", years)?;
    let rate = monthly_rate(annual_rate_percent);
    let step_multiplier = 1.0 + step_up_percent / 100.0;
    let mut balance = 0.0;
    let mut total_invested = 0.0;
    let mut contribution = initial_monthly_contribution;

    for month in 1..=months {
        balance = (balance + contribution) * (1.0 + rate);
        total_invested += contribution;
        if month % 12 == 0 {
            contribution *= step_multiplier;
        }
    }

    Ok(StepUpProjection {
        future_value: balance,
        total_invested,
        final_monthly_contribution: contribution,
    })
}

pub fn future_value_with_annual_step_up(
    initial_monthly_contribution: f64,
    annual_rate_percent: f64,
    step_up_percent: f64,
    years: u32,
) -> ProjectionResult<f64> {
    project_annual_step_up(
        initial_monthly_contribution,
        annual_rate_percent,
        step_up_percent,
        years,
    )
    .map(|projection| projection.future_value)
}

/// Contributions stop after `contribution_years` but every contributed amount
/// keeps compounding until `horizon_years`. Only months inside the horizon
/// contribute.
pub fn project_limited_term(
    monthly_contribution: f64,
    annual_rate_percent: f64,
    contribution_years: u32,
    horizon_years: u32,
) -> ProjectionResult<AnnuityProjection> {
    let rate = monthly_rate(annual_rate_percent);
    let total_months = months_in("horizonYears", horizon_years)?;
    let contribution_months = contribution_years.min(horizon_years) * 12;

    let future_value: f64 = (0..contribution_months)
        .map(|month| compound(monthly_contribution, rate, total_months - month))
        .sum();

    Ok(AnnuityProjection::from_totals(
        future_value,
        monthly_contribution * contribution_months as f64,
    ))
}

pub fn future_value_with_limited_term(
    monthly_contribution: f64,
    annual_rate_percent: f64,
    contribution_years: u32,
    total_horizon_years: u32,
) -> ProjectionResult<f64> {
    project_limited_term(
        monthly_contribution,
        annual_rate_percent,
        contribution_years,
        total_horizon_years,
    )
    .map(|projection| projection.future_value)
}
