use lazer_watch::model::price::{format_display_value, format_price};

#[test]
/// raw 50000 at exponent -8 is 0.0005: small values take the long-precision
/// tier.
fn small_raw_price_uses_high_precision_tier() {
    assert_eq!(format_price(50_000, -8), "0.0005000000");
}

#[test]
fn precision_tier_switches_at_one_hundred() {
    // at the boundary: still the fine tier
    assert_eq!(format_display_value(100.0), "100.0000000000");
    // just above: the coarse tier
    assert_eq!(format_display_value(100.5), "100.500");
}

#[test]
fn large_prices_are_grouped() {
    assert_eq!(format_price(6_412_345_678_900, -8), "64,123.457");
    assert_eq!(format_display_value(1_000_000.25), "1,000,000.250");
}

#[test]
fn positive_exponent_is_treated_by_magnitude() {
    // exponent sign is ignored, only the magnitude scales
    assert_eq!(format_price(50_000, 8), format_price(50_000, -8));
}
