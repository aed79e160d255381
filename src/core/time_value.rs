//! Compounding and annuity primitives shared by every projection.

use super::error::{ProjectionError, ProjectionResult};

pub fn monthly_rate(annual_percent: f64) -> f64 {
    annual_percent / 100.0 / 12.0
}

pub fn annual_rate(annual_percent: f64) -> f64 {
    annual_percent / 100.0
}

/// Longest horizon, in years, any projection accepts. Keeps monthly loops
/// bounded and period counts well inside `u32`.
pub const MAX_YEARS: u32 = 100;

/// Number of monthly periods in `years`. Horizons past [`MAX_YEARS`] are
/// rejected against `field` before any computation runs.
pub fn months_in(field: &'static str, years: u32) -> ProjectionResult<u32> {
    if years > MAX_YEARS {
        return Err(ProjectionError::invalid(
            field,
            format!("must be <= {MAX_YEARS}"),
        ));
    }
    Ok(years * 12)
}

/// `principal * (1 + rate)^periods`, exact for a zero rate or zero periods.
pub fn compound(principal: f64, rate: f64, periods: u32) -> f64 {
    if periods == 0 || rate == 0.0 {
        return principal;
    }
    match i32::try_from(periods) {
        Ok(periods) => principal * (1.0 + rate).powi(periods),
        Err(_) => principal * (1.0 + rate).powf(periods as f64),
    }
}

/// `(1 + rate)^periods - 1` without cancellation when `rate` is tiny.
pub fn growth_minus_one(rate: f64, periods: u32) -> f64 {
    (periods as f64 * rate.ln_1p()).exp_m1()
}

/// Future value of `periods` unit payments made at the end of each period.
///
/// Falls back to the limit `periods` when `rate == 0` instead of dividing by
/// zero.
pub fn annuity_future_value_factor(rate: f64, periods: u32) -> f64 {
    if rate == 0.0 {
        return periods as f64;
    }
    growth_minus_one(rate, periods) / rate
}

pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn ensure_finite(value: f64, context: &'static str) -> ProjectionResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ProjectionError::NonFinite { context })
    }
}

pub(crate) fn serialize_cents<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_f64(round_to_cents(*value))
}
