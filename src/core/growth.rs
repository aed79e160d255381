//! Single-sum growth with annual compounding.
//!
//! Goal, retirement and lumpsum scenarios compound once a year. The SIP
//! family compounds monthly through `annuity`; never mix the two.

use super::time_value::{annual_rate, compound};

pub fn future_value_of_lumpsum(principal: f64, annual_rate_percent: f64, years: u32) -> f64 {
    compound(principal, annual_rate(annual_rate_percent), years)
}

pub fn present_value_of_lumpsum(future_value: f64, annual_rate_percent: f64, years: u32) -> f64 {
    future_value / compound(1.0, annual_rate(annual_rate_percent), years)
}

pub fn simple_interest(principal: f64, annual_rate_percent: f64, years: u32) -> f64 {
    principal * annual_rate_percent * years as f64 / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::assert_close;
    use proptest::prelude::{prop_assert, proptest};

    #[test]
    fn lumpsum_compounds_annually() {
        assert_close(future_value_of_lumpsum(100_000.0, 10.0, 3), 133_100.0, 1e-6);
        assert_eq!(future_value_of_lumpsum(50_000.0, 0.0, 12), 50_000.0);
    }

    #[test]
    fn simple_interest_is_linear_in_time() {
        assert_close(simple_interest(10_000.0, 8.0, 5), 4_000.0, 1e-9);
        assert_eq!(simple_interest(10_000.0, 8.0, 0), 0.0);
    }

    #[test]
    fn present_value_undoes_growth() {
        let grown = future_value_of_lumpsum(25_000.0, 7.5, 9);
        assert_close(present_value_of_lumpsum(grown, 7.5, 9), 25_000.0, 1e-6);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(48))]

        #[test]
        fn prop_compound_growth_beats_simple_interest(
            principal in 1u32..10_000_000,
            rate_bp in 0u32..2_500,
            years in 1u32..60
        ) {
            let principal = principal as f64;
            let rate = rate_bp as f64 / 100.0;
            let compounded = future_value_of_lumpsum(principal, rate, years);
            let simple = principal + simple_interest(principal, rate, years);
            prop_assert!(compounded + 1e-6 * principal >= simple);
        }
    }
}
