//! Dollar and year ranges with a tracked center point.
//!
//! `center` is the model's point estimate, not necessarily `(min+max)/2`:
//! the savings projector sets it to the unbanded estimate directly. The
//! invariant `min <= center <= max` holds for every constructor.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
    pub center: f64,
}

impl Range {
    /// The all-zero range. Payback uses it to mean "unknown", never
    /// "instant"; consumers must check [`Range::is_zero`] before rendering.
    pub const ZERO: Range = Range {
        min: 0.0,
        max: 0.0,
        center: 0.0,
    };

    /// Build a range from two bounds in either order. Upstream data entry
    /// sometimes supplies (max, min); the constructor reorders rather than
    /// trusting the caller.
    pub fn ordered(a: f64, b: f64) -> Range {
        let (min, max) = if a <= b { (a, b) } else { (b, a) };
        Range {
            min,
            max,
            center: (min + max) / 2.0,
        }
    }

    /// Multiplicative uncertainty band around a point estimate. `center`
    /// is the estimate itself, preserved exactly.
    pub fn banded(center: f64, low_factor: f64, high_factor: f64) -> Range {
        let a = center * low_factor;
        let b = center * high_factor;
        let (min, max) = if a <= b { (a, b) } else { (b, a) };
        Range {
            min,
            max,
            center: center.clamp(min, max),
        }
    }

    /// Shift every bound by the same amount. Preserves the ordering
    /// invariant for any finite `delta`.
    pub fn shift(&self, delta: f64) -> Range {
        Range {
            min: self.min + delta,
            max: self.max + delta,
            center: self.center + delta,
        }
    }

    /// Scale every bound by a non-negative factor.
    pub fn scale(&self, factor: f64) -> Range {
        let a = self.min * factor;
        let b = self.max * factor;
        let (min, max) = if a <= b { (a, b) } else { (b, a) };
        Range {
            min,
            max,
            center: (self.center * factor).clamp(min, max),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.min == 0.0 && self.max == 0.0 && self.center == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordered_reorders_swapped_bounds() {
        let r = Range::ordered(9000.0, 4500.0);
        assert_eq!(r.min, 4500.0);
        assert_eq!(r.max, 9000.0);
        assert_eq!(r.center, 6750.0);
    }

    #[test]
    fn banded_keeps_point_estimate_as_center() {
        let r = Range::banded(309.0, 0.85, 1.15);
        assert!((r.min - 262.65).abs() < 1e-9);
        assert!((r.max - 355.35).abs() < 1e-9);
        assert_eq!(r.center, 309.0);
        assert!(r.min <= r.center && r.center <= r.max);
    }

    #[test]
    fn banded_zero_center_collapses() {
        let r = Range::banded(0.0, 0.85, 1.15);
        assert!(r.is_zero());
    }

    #[test]
    fn shift_moves_all_bounds() {
        let r = Range::ordered(10.0, 20.0).shift(5.0);
        assert_eq!((r.min, r.center, r.max), (15.0, 20.0, 25.0));
    }

    #[test]
    fn scale_divides_into_months() {
        let r = Range::banded(120.0, 0.85, 1.15).scale(1.0 / 12.0);
        assert!((r.center - 10.0).abs() < 1e-9);
        assert!(r.min <= r.center && r.center <= r.max);
    }
}
