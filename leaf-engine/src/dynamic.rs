//! Price-linked savings adjustment.
//!
//! Models "pricier systems recover marginally more": every full step the
//! price climbs above the tier's maximum adds a fixed monthly bump to the
//! savings band. Below the maximum the band is untouched.

use crate::config::DynamicSavingsRule;
use crate::range::Range;

/// The monthly-dollar bump for a price under the given rule. Zero for any
/// price at or below `tier_max`, non-decreasing in `price`.
pub fn price_bump(price: f64, tier_max: f64, rule: &DynamicSavingsRule) -> f64 {
    if !price.is_finite() || rule.step_size_dollars <= 0.0 {
        return 0.0;
    }
    let over = (price - tier_max).max(0.0);
    let steps = (over / rule.step_size_dollars).floor();
    steps * rule.bump_per_step_monthly
}

/// Shift a monthly savings band upward by the bump the price earns.
pub fn adjust_savings_for_price(
    base: &Range,
    price: f64,
    tier_max: f64,
    rule: &DynamicSavingsRule,
) -> Range {
    base.shift(price_bump(price, tier_max, rule))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule() -> DynamicSavingsRule {
        DynamicSavingsRule {
            step_size_dollars: 1000.0,
            bump_per_step_monthly: 5.0,
        }
    }

    #[test]
    fn no_bump_at_or_below_tier_max() {
        assert_eq!(price_bump(6000.0, 6000.0, &rule()), 0.0);
        assert_eq!(price_bump(4200.0, 6000.0, &rule()), 0.0);
    }

    #[test]
    fn full_steps_only() {
        let r = rule();
        assert_eq!(price_bump(6999.0, 6000.0, &r), 0.0);
        assert_eq!(price_bump(7000.0, 6000.0, &r), 5.0);
        assert_eq!(price_bump(8500.0, 6000.0, &r), 10.0);
    }

    #[test]
    fn zero_step_size_disables_the_rule() {
        let disabled = DynamicSavingsRule {
            step_size_dollars: 0.0,
            bump_per_step_monthly: 5.0,
        };
        assert_eq!(price_bump(50_000.0, 6000.0, &disabled), 0.0);
    }

    #[test]
    fn bump_is_non_decreasing_in_price() {
        let r = rule();
        let mut last = 0.0;
        for i in 0..200 {
            let bump = price_bump(5000.0 + 50.0 * i as f64, 6000.0, &r);
            assert!(bump >= last);
            last = bump;
        }
    }

    #[test]
    fn adjustment_shifts_the_whole_band() {
        let base = Range::ordered(20.0, 30.0);
        let adjusted = adjust_savings_for_price(&base, 8200.0, 6000.0, &rule());
        assert_eq!((adjusted.min, adjusted.max), (30.0, 40.0));
        assert!(adjusted.min <= adjusted.center && adjusted.center <= adjusted.max);
    }

    #[test]
    fn non_finite_price_is_ignored() {
        assert_eq!(price_bump(f64::NAN, 6000.0, &rule()), 0.0);
        assert_eq!(price_bump(f64::INFINITY, 6000.0, &rule()), 0.0);
    }
}
