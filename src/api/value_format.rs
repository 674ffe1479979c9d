/// Placeholder replaced by the formatted value inside a text-format template.
pub const VALUE_PLACEHOLDER: &str = "%1";

/// Formats `value` through `template`; an empty template means plain numeric formatting.
#[must_use]
pub fn format_value(value: f64, template: &str) -> String {
    let number = format_number(value);
    if template.is_empty() {
        return number;
    }
    template.replace(VALUE_PLACEHOLDER, &number)
}

/// General numeric formatting with at most 6 significant digits.
///
/// The decimal exponent is taken after rounding to 6 digits. Fixed notation
/// is used for exponents in `[-4, 6)`, scientific notation otherwise; trailing
/// zeros are trimmed in both.
#[must_use]
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return format!("{value}");
    }
    if value == 0.0 {
        return "0".to_owned();
    }

    let scientific = format!("{value:.5e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);
    if (-4..6).contains(&exponent) {
        let decimals = usize::try_from(5 - exponent).unwrap_or(0);
        let fixed = format!("{value:.decimals$}");
        return trim_fraction(&fixed).to_owned();
    }

    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{}e{sign}{:02}", trim_fraction(mantissa), exponent.abs())
}

fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::{format_number, format_value};

    #[test]
    fn integers_and_fractions_drop_trailing_zeros() {
        assert_eq!(format_number(10.0), "10");
        assert_eq!(format_number(-5.0), "-5");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(0.1 + 0.2), "0.3");
        assert_eq!(format_number(-0.0), "0");
    }

    #[test]
    fn large_and_tiny_values_use_scientific_notation() {
        assert_eq!(format_number(12_345_678.0), "1.23457e+07");
        assert_eq!(format_number(0.000_001_5), "1.5e-06");
        assert_eq!(format_number(0.000_015), "1.5e-05");
        assert_eq!(format_number(0.000_15), "0.00015");
    }

    #[test]
    fn rounding_up_to_the_next_power_of_ten_moves_the_exponent() {
        assert_eq!(format_number(999_999.5), "1e+06");
        assert_eq!(format_number(-999_999.7), "-1e+06");
        assert_eq!(format_number(99_999.97), "100000");
        assert_eq!(format_number(0.000_099_999_99), "0.0001");
    }

    #[test]
    fn template_substitutes_placeholder() {
        assert_eq!(format_value(7.0, ""), "7");
        assert_eq!(format_value(7.25, "%1 t"), "7.25 t");
        assert_eq!(format_value(-3.0, "[%1]"), "[-3]");
    }
}
