use serde::Serialize;

use super::error::{ProjectionError, ProjectionResult};
use super::time_value::{
    ensure_finite, growth_minus_one, monthly_rate, months_in, serialize_cents,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanTotals {
    #[serde(serialize_with = "serialize_cents")]
    pub total_payment: f64,
    #[serde(serialize_with = "serialize_cents")]
    pub total_interest: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AmortizationRow {
    pub period_index: u32,
    #[serde(serialize_with = "serialize_cents")]
    pub opening_balance: f64,
    #[serde(serialize_with = "serialize_cents")]
    pub interest_component: f64,
    #[serde(serialize_with = "serialize_cents")]
    pub principal_component: f64,
    #[serde(serialize_with = "serialize_cents")]
    pub closing_balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AmortizationSchedule {
    #[serde(serialize_with = "serialize_cents")]
    pub emi: f64,
    #[serde(flatten)]
    pub totals: LoanTotals,
    pub rows: Vec<AmortizationRow>,
}

/// Fixed monthly payment that fully repays `principal` over `years`.
///
/// The closed form divides by `(1 + r)^n - 1`, which vanishes at a zero rate,
/// so an interest-free loan is repaid linearly instead.
pub fn equal_monthly_installment(
    principal: f64,
    annual_rate_percent: f64,
    years: u32,
) -> ProjectionResult<f64> {
    let periods = months_in("years", years)?;
    if periods == 0 {
        return Err(ProjectionError::invalid("years", "must be at least 1 for a loan"));
    }

    let rate = monthly_rate(annual_rate_percent);
    if rate == 0.0 {
        return Ok(principal / periods as f64);
    }

    let growth_less_one = growth_minus_one(rate, periods);
    Ok(principal * rate * (1.0 + growth_less_one) / growth_less_one)
}

pub fn totals(emi: f64, periods: u32, principal: f64) -> LoanTotals {
    let total_payment = emi * periods as f64;
    LoanTotals {
        total_payment,
        total_interest: total_payment - principal,
    }
}

/// Full repayment schedule. Every figure is checked to be finite, so an
/// overflowing loan surfaces as [`ProjectionError::NonFinite`].
pub fn amortization_schedule(
    principal: f64,
    annual_rate_percent: f64,
    years: u32,
) -> ProjectionResult<AmortizationSchedule> {
    let emi = ensure_finite(
        equal_monthly_installment(principal, annual_rate_percent, years)?,
        "emi",
    )?;
    let rate = monthly_rate(annual_rate_percent);
    let periods = months_in("years", years)?;
    let loan = totals(emi, periods, principal);
    ensure_finite(loan.total_payment, "totalPayment")?;
    ensure_finite(loan.total_interest, "totalInterest")?;

    let mut rows = Vec::with_capacity(periods as usize);
    let mut balance = principal;
    for period_index in 1..=periods {
        let interest_component = ensure_finite(balance * rate, "interestComponent")?;
        let principal_component = ensure_finite(emi - interest_component, "principalComponent")?;
        let closing_balance = ensure_finite(balance - principal_component, "closingBalance")?;
        rows.push(AmortizationRow {
            period_index,
            opening_balance: balance,
            interest_component,
            principal_component,
            closing_balance,
        });
        balance = closing_balance;
    }

    Ok(AmortizationSchedule {
        emi,
        totals: loan,
        rows,
    })
}
