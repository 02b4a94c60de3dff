//! Composite metrics computed from more than one raw field.
//!
//! Every function here checks its guard before dividing. A failed guard is
//! reported as [`Omission::GuardFailure`] and the reading is dropped.

use crate::error::Omission;
use crate::units;

/// Literal emitted whenever no current is flowing.
pub const ZERO_POWER: &str = "0.00 W";

/// Signed power in watts from millivolts and milliamps.
#[inline]
pub fn watts(mv: i64, ma: i64) -> f64 {
    mv as f64 * ma as f64 / 1_000_000.0
}

/// Power reading. Voltage is required by the caller; amperage defaults to 0.
///
/// Only a strictly positive result gets a sign (`+`); a negative result is
/// shown as its bare magnitude.
pub fn power(mv: i64, ma: Option<i64>) -> String {
    let ma = ma.unwrap_or(0);
    if ma == 0 {
        return ZERO_POWER.to_string();
    }
    let w = watts(mv, ma);
    let sign = if w > 0.0 { "+" } else { "" };
    format!("{sign}{:.2} W", w.abs())
}

/// `numerator / denominator × 100`, guarded on a positive denominator.
pub fn ratio_percent(numerator: i64, denominator: i64) -> Result<f64, Omission> {
    if denominator <= 0 {
        return Err(Omission::GuardFailure);
    }
    Ok(numerator as f64 / denominator as f64 * 100.0)
}

/// State of charge from the resolved current and max capacities.
pub fn charge_percent(current: i64, max: i64) -> Result<String, Omission> {
    ratio_percent(current, max).map(units::percent)
}

/// Wear level: resolved max capacity (raw when the driver publishes it) over
/// design capacity.
pub fn health_percent(max: i64, design: i64) -> Result<String, Omission> {
    ratio_percent(max, design).map(units::percent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(12_000, None, "0.00 W")]
    #[case(12_000, Some(0), "0.00 W")]
    #[case(12_000, Some(1_500), "+18.00 W")]
    #[case(12_000, Some(-1_500), "18.00 W")]
    #[case(11_432, Some(-873), "9.98 W")]
    #[case(0, Some(500), "0.00 W")]
    fn power_cases(#[case] mv: i64, #[case] ma: Option<i64>, #[case] want: &str) {
        assert_eq!(power(mv, ma), want);
    }

    #[test]
    fn charge_formula() {
        assert_eq!(charge_percent(2500, 5000).as_deref(), Ok("50.0%"));
    }

    #[test]
    fn health_formula() {
        assert_eq!(health_percent(4000, 5000).as_deref(), Ok("80.0%"));
    }

    #[rstest]
    #[case(0)]
    #[case(-1)]
    fn guards_reject_non_positive_divisor(#[case] den: i64) {
        assert_eq!(health_percent(4000, den), Err(Omission::GuardFailure));
        assert_eq!(charge_percent(2500, den), Err(Omission::GuardFailure));
    }

    #[test]
    fn percent_may_exceed_hundred() {
        assert_eq!(health_percent(5200, 5000).as_deref(), Ok("104.0%"));
    }
}
