//! Price Calculator
//!
//! Pure discounted-price arithmetic on whole-baht integers.

/// Discounted unit price: `price × (1 − percent/100)`, rounded half-up to
/// the nearest baht
///
/// Zero percent returns the price exactly unchanged. Percent is clamped
/// to 100, so the result never goes negative.
pub fn discounted_unit_price(price: i64, percent: u32) -> i64 {
    if percent == 0 {
        return price;
    }
    let remaining = i128::from(100 - percent.min(100));
    let scaled = i128::from(price) * remaining;
    // Round half up on a non-negative numerator
    ((scaled + 50) / 100) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twenty_percent_off_1000_is_800() {
        assert_eq!(discounted_unit_price(1000, 20), 800);
    }

    #[test]
    fn zero_percent_returns_price_unchanged() {
        assert_eq!(discounted_unit_price(1234, 0), 1234);
    }

    #[test]
    fn rounds_half_up() {
        // 999 * 0.85 = 849.15 -> 849
        assert_eq!(discounted_unit_price(999, 15), 849);
        // 150 * 0.99 = 148.5 -> 149 (half-up, not banker's)
        assert_eq!(discounted_unit_price(150, 1), 149);
        // 1250 * 0.9 = 1125 exactly
        assert_eq!(discounted_unit_price(1250, 10), 1125);
    }

    #[test]
    fn monotonic_in_percent() {
        let price = 1789;
        let mut last = price;
        for percent in 0..=100 {
            let current = discounted_unit_price(price, percent);
            assert!(current <= last, "percent {} raised the price", percent);
            last = current;
        }
        assert_eq!(discounted_unit_price(price, 100), 0);
    }

    #[test]
    fn percent_above_100_clamps_to_free() {
        assert_eq!(discounted_unit_price(1000, 150), 0);
    }
}
