use serde::Serialize;

use super::error::{ProjectionError, ProjectionResult};
use super::time_value::{annuity_future_value_factor, months_in, monthly_rate, serialize_cents};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnuityProjection {
    #[serde(serialize_with = "serialize_cents")]
    pub future_value: f64,
    #[serde(serialize_with = "serialize_cents")]
    pub total_invested: f64,
    #[serde(serialize_with = "serialize_cents")]
    pub total_growth: f64,
}

impl AnnuityProjection {
    pub(crate) fn from_totals(future_value: f64, total_invested: f64) -> Self {
        Self {
            future_value,
            total_invested,
            total_growth: future_value - total_invested,
        }
    }
}

/// Level monthly contribution credited at the end of every month.
pub fn future_value_of_annuity(
    monthly_contribution: f64,
    annual_rate_percent: f64,
    years: u32,
) -> ProjectionResult<f64> {
    let months = months_in("years", years)?;
    Ok(monthly_contribution * annuity_future_value_factor(monthly_rate(annual_rate_percent), months))
}

pub fn project_annuity(
    monthly_contribution: f64,
    annual_rate_percent: f64,
    years: u32,
) -> ProjectionResult<AnnuityProjection> {
    let future_value = future_value_of_annuity(monthly_contribution, annual_rate_percent, years)?;
    Ok(AnnuityProjection::from_totals(
        future_value,
        monthly_contribution * (years * 12) as f64,
    ))
}

/// Monthly contribution that grows to `target_future_value`.
///
/// A covered target (`<= 0`) needs no contribution. A positive target with no
/// months to save in has no solution.
pub fn required_monthly_contribution(
    target_future_value: f64,
    annual_rate_percent: f64,
    years: u32,
) -> ProjectionResult<f64> {
    let months = months_in("years", years)?;
    if target_future_value <= 0.0 {
        return Ok(0.0);
    }
    if months == 0 {
        return Err(ProjectionError::invalid(
            "years",
            "must be at least 1 to spread a positive target over monthly contributions",
        ));
    }
    let factor = annuity_future_value_factor(monthly_rate(annual_rate_percent), months);
    Ok(target_future_value / factor)
}
