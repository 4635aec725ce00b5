use crate::feed::decode::scale_price;

/// Precision tier boundary: small prices get the long tail of decimals.
const SMALL_VALUE_MAX: f64 = 100.0;
const SMALL_VALUE_DECIMALS: usize = 10;
const LARGE_VALUE_DECIMALS: usize = 3;

/// Format a raw integer price for display using the feed exponent.
pub fn format_price(raw: u64, exponent: i32) -> String {
    format_display_value(scale_price(raw, exponent))
}

/// Format an already-scaled price: thousands separators on the integer part,
/// 10 decimals up to 100, 3 above.
pub fn format_display_value(value: f64) -> String {
    let decimals = if value <= SMALL_VALUE_MAX {
        SMALL_VALUE_DECIMALS
    } else {
        LARGE_VALUE_DECIMALS
    };
    let plain = format!("{:.*}", decimals, value);
    let (int_part, frac_part) = match plain.split_once('.') {
        Some((i, f)) => (i, f),
        None => (plain.as_str(), ""),
    };
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    let digits = int_part.len();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (digits - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if frac_part.is_empty() {
        grouped
    } else {
        format!("{}.{}", grouped, frac_part)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_value_gets_ten_decimals() {
        assert_eq!(format_price(50_000, -8), "0.0005000000");
    }

    #[test]
    fn large_value_gets_three_decimals_and_grouping() {
        // 64_123.45678900 at exponent -8
        assert_eq!(format_price(6_412_345_678_900, -8), "64,123.457");
    }

    #[test]
    fn tier_switches_at_one_hundred() {
        assert_eq!(format_display_value(100.0), "100.0000000000");
        assert_eq!(format_display_value(100.001), "100.001");
    }

    #[test]
    fn grouping_handles_long_integer_parts() {
        assert_eq!(format_display_value(1_234_567.0), "1,234,567.000");
    }

    #[test]
    fn keeps_single_leading_zero() {
        assert_eq!(format_display_value(0.5), "0.5000000000");
    }
}
