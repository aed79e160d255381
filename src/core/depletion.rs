use serde::Serialize;

use super::error::ProjectionResult;
use super::time_value::{compound, ensure_finite, monthly_rate, months_in, serialize_cents};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WithdrawalPlan {
    pub lumpsum: f64,
    pub monthly_withdrawal: f64,
    pub annual_rate_percent: f64,
    pub tenure_years: u32,
    pub deferred_years: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepletionOutcome {
    #[serde(serialize_with = "serialize_cents")]
    pub final_balance: f64,
    #[serde(serialize_with = "serialize_cents")]
    pub total_withdrawn: f64,
    /// Zero-based month, counted from the start of the plan, in which the
    /// balance ran out. Its withdrawal was not honored.
    pub exhausted_at_month: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepletionPoint {
    pub month: u32,
    #[serde(serialize_with = "serialize_cents")]
    pub balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepletionTrace {
    pub outcome: DepletionOutcome,
    pub points: Vec<DepletionPoint>,
}

impl WithdrawalPlan {
    fn total_months(&self) -> ProjectionResult<u32> {
        months_in("tenureYears", self.tenure_years)
    }

    fn deferred_months(&self) -> u32 {
        self.deferred_years.min(self.tenure_years) * 12
    }
}

pub fn simulate_withdrawal_plan(plan: &WithdrawalPlan) -> ProjectionResult<DepletionOutcome> {
    run_plan(plan, None)
}

pub fn run_depletion_trace(plan: &WithdrawalPlan) -> ProjectionResult<DepletionTrace> {
    let mut points = Vec::with_capacity(plan.total_months()? as usize);
    let outcome = run_plan(plan, Some(&mut points))?;
    for point in &points {
        ensure_finite(point.balance, "balance")?;
    }
    Ok(DepletionTrace { outcome, points })
}

fn run_plan(
    plan: &WithdrawalPlan,
    mut trace: Option<&mut Vec<DepletionPoint>>,
) -> ProjectionResult<DepletionOutcome> {
    let total_months = plan.total_months()?;
    let rate = monthly_rate(plan.annual_rate_percent);
    let deferred_months = plan.deferred_months();

    if let Some(points) = trace.as_deref_mut() {
        points.extend((1..=deferred_months).map(|month| DepletionPoint {
            month,
            balance: compound(plan.lumpsum, rate, month),
        }));
    }

    let mut balance = compound(plan.lumpsum, rate, deferred_months);
    let mut total_withdrawn = 0.0;
    let mut exhausted_at_month = None;

    for month in deferred_months..total_months {
        // grow first, then draw
        balance = balance * (1.0 + rate) - plan.monthly_withdrawal;
        let exhausted = plan.monthly_withdrawal > 0.0 && balance <= 0.0;
        if exhausted {
            balance = 0.0;
        } else {
            total_withdrawn += plan.monthly_withdrawal;
        }

        if let Some(points) = trace.as_deref_mut() {
            points.push(DepletionPoint {
                month: month + 1,
                balance,
            });
        }
        if exhausted {
            exhausted_at_month = Some(month);
            break;
        }
    }

    Ok(DepletionOutcome {
        final_balance: ensure_finite(balance, "finalBalance")?,
        total_withdrawn: ensure_finite(total_withdrawn, "totalWithdrawn")?,
        exhausted_at_month,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::assert_close;
    use crate::core::error::ProjectionError;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    fn plan(monthly_withdrawal: f64, tenure_years: u32, deferred_years: u32) -> WithdrawalPlan {
        WithdrawalPlan {
            lumpsum: 1_000_000.0,
            monthly_withdrawal,
            annual_rate_percent: 8.0,
            tenure_years,
            deferred_years,
        }
    }

    #[test]
    fn reference_plan_outlasts_fifteen_years() {
        let outcome = simulate_withdrawal_plan(&plan(8_000.0, 15, 0)).expect("valid plan");
        assert_eq!(outcome.exhausted_at_month, None);
        assert_close(outcome.total_withdrawn, 8_000.0 * 180.0, 1e-6);
        assert_close(outcome.final_balance, 538_615.70, 0.01);
    }

    #[test]
    fn heavy_withdrawal_exhausts_and_stops_counting() {
        let outcome = simulate_withdrawal_plan(&plan(10_000.0, 15, 0)).expect("valid plan");
        let month = outcome.exhausted_at_month.expect("balance must run out");
        assert_eq!(month, 165);
        assert_eq!(outcome.final_balance, 0.0);
        assert_close(outcome.total_withdrawn, 10_000.0 * month as f64, 1e-6);
    }

    #[test]
    fn deferral_grows_untouched_before_drawdown() {
        let outcome = simulate_withdrawal_plan(&plan(5_000.0, 10, 3)).expect("valid plan");
        let mut balance = compound(1_000_000.0, monthly_rate(8.0), 36);
        for _ in 0..84 {
            balance = balance * (1.0 + monthly_rate(8.0)) - 5_000.0;
        }
        assert_close(outcome.final_balance, balance, 1e-6);
        assert_close(outcome.total_withdrawn, 5_000.0 * 84.0, 1e-6);
    }

    #[test]
    fn deferral_longer_than_tenure_stops_at_horizon() {
        let outcome = simulate_withdrawal_plan(&plan(5_000.0, 5, 8)).expect("valid plan");
        assert_close(outcome.final_balance, compound(1_000_000.0, monthly_rate(8.0), 60), 1e-6);
        assert_eq!(outcome.total_withdrawn, 0.0);
    }

    #[test]
    fn trace_covers_every_simulated_month() {
        let trace = run_depletion_trace(&plan(6_000.0, 4, 1)).expect("valid plan");
        assert_eq!(trace.points.len(), 48);
        assert_eq!(trace.points[0].month, 1);
        assert_eq!(trace.points[47].month, 48);
        assert_eq!(trace.points[47].balance, trace.outcome.final_balance);
    }

    #[test]
    fn trace_stops_at_exhaustion() {
        let trace = run_depletion_trace(&plan(10_000.0, 20, 0)).expect("valid plan");
        let month = trace.outcome.exhausted_at_month.expect("balance must run out");
        assert_eq!(trace.points.len() as u32, month + 1);
        assert_eq!(trace.points.last().map(|p| p.balance), Some(0.0));
    }

    #[test]
    fn overlong_tenure_is_rejected_before_simulating() {
        let err = simulate_withdrawal_plan(&plan(1_000.0, 400_000_000, 0)).expect_err("too long");
        assert!(matches!(
            err,
            ProjectionError::InvalidInput { field: "tenureYears", .. }
        ));
        assert!(run_depletion_trace(&plan(1_000.0, u32::MAX, u32::MAX)).is_err());
    }

    #[test]
    fn overflowing_balance_is_reported_as_non_finite() {
        let overflowing = WithdrawalPlan {
            lumpsum: 1e308,
            monthly_withdrawal: 0.0,
            annual_rate_percent: 100.0,
            tenure_years: 100,
            deferred_years: 0,
        };
        let err = run_depletion_trace(&overflowing).expect_err("overflow");
        assert!(matches!(err, ProjectionError::NonFinite { .. }));
        assert!(simulate_withdrawal_plan(&overflowing).is_err());
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(48))]

        #[test]
        fn prop_final_balance_is_never_negative(
            lumpsum in 0u32..5_000_000,
            withdrawal in 0u32..100_000,
            rate_bp in 0u32..2_000,
            tenure in 0u32..31,
            deferred in 0u32..11
        ) {
            let outcome = simulate_withdrawal_plan(&WithdrawalPlan {
                lumpsum: lumpsum as f64,
                monthly_withdrawal: withdrawal as f64,
                annual_rate_percent: rate_bp as f64 / 100.0,
                tenure_years: tenure,
                deferred_years: deferred,
            }).expect("valid plan");
            prop_assert!(outcome.final_balance >= 0.0);
            prop_assert!(outcome.total_withdrawn >= 0.0);
        }

        #[test]
        fn prop_without_withdrawals_balance_just_compounds(
            lumpsum in 1u32..5_000_000,
            rate_bp in 0u32..2_000,
            tenure in 0u32..31,
            deferred in 0u32..11
        ) {
            let plan = WithdrawalPlan {
                lumpsum: lumpsum as f64,
                monthly_withdrawal: 0.0,
                annual_rate_percent: rate_bp as f64 / 100.0,
                tenure_years: tenure,
                deferred_years: deferred,
            };
            let outcome = simulate_withdrawal_plan(&plan).expect("valid plan");
            let expected = compound(plan.lumpsum, monthly_rate(plan.annual_rate_percent), tenure * 12);
            prop_assert_eq!(outcome.exhausted_at_month, None);
            prop_assert!((outcome.final_balance - expected).abs() <= 1e-9 * expected);
        }
    }
}
