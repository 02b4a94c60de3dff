//! Raw registry scales to display strings.
//!
//! The registry reports temperature in centi-degrees Celsius, voltage in
//! millivolts, and current in milliamps. All formatting is fixed-point with `.`
//! as the decimal separator; Rust's float formatting does not consult a locale.

/// Centi-degrees Celsius to degrees Celsius.
#[inline]
pub fn centi_to_celsius(raw: i64) -> f64 {
    raw as f64 / 100.0
}

#[inline]
pub fn celsius_to_fahrenheit(c: f64) -> f64 {
    c * 9.0 / 5.0 + 32.0
}

/// Millivolts to volts.
#[inline]
pub fn millivolts_to_volts(mv: i64) -> f64 {
    mv as f64 / 1000.0
}

/// `"25.0°C / 77.0°F"`
pub fn temperature(raw_centi_c: i64) -> String {
    let c = centi_to_celsius(raw_centi_c);
    format!("{:.1}°C / {:.1}°F", c, celsius_to_fahrenheit(c))
}

/// `"12.00 V"`
pub fn voltage(mv: i64) -> String {
    format!("{:.2} V", millivolts_to_volts(mv))
}

/// Leading `+` for charge flowing in, `-` for flowing out, nothing at zero.
#[inline]
pub fn current_sign(ma: i64) -> &'static str {
    match ma.signum() {
        1 => "+",
        -1 => "-",
        _ => "",
    }
}

/// `"+300 mA"`, `"-500 mA"`, `"0 mA"`
pub fn amperage(ma: i64) -> String {
    format!("{}{} mA", current_sign(ma), ma.unsigned_abs())
}

/// `"50.0%"`
pub fn percent(value: f64) -> String {
    format!("{value:.1}%")
}

pub fn flag(v: bool) -> String {
    if v { "Yes" } else { "No" }.to_string()
}

pub fn milliamp_hours(v: i64) -> String {
    format!("{v} mAh")
}

pub fn milliamps(v: i64) -> String {
    format!("{v} mA")
}

pub fn watts(v: i64) -> String {
    format!("{v} W")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(2500, "25.0°C / 77.0°F")]
    #[case(0, "0.0°C / 32.0°F")]
    #[case(3115, "31.1°C / 88.1°F")]
    #[case(-1000, "-10.0°C / 14.0°F")]
    fn temperature_formats(#[case] raw: i64, #[case] want: &str) {
        assert_eq!(temperature(raw), want);
    }

    #[rstest]
    #[case(12_000, "12.00 V")]
    #[case(12_567, "12.57 V")]
    #[case(0, "0.00 V")]
    #[case(8_006, "8.01 V")]
    fn voltage_formats(#[case] mv: i64, #[case] want: &str) {
        assert_eq!(voltage(mv), want);
    }

    #[rstest]
    #[case(-500, "-500 mA")]
    #[case(0, "0 mA")]
    #[case(300, "+300 mA")]
    #[case(i64::MIN, "-9223372036854775808 mA")]
    fn amperage_sign(#[case] ma: i64, #[case] want: &str) {
        assert_eq!(amperage(ma), want);
    }

    #[test]
    fn plain_units() {
        assert_eq!(flag(true), "Yes");
        assert_eq!(flag(false), "No");
        assert_eq!(milliamp_hours(4382), "4382 mAh");
        assert_eq!(milliamps(-6120), "-6120 mA");
        assert_eq!(watts(96), "96 W");
        assert_eq!(percent(80.0), "80.0%");
    }
}
