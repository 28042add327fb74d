//! Payback calculator.
//!
//! Pairs the install-cost range against the annual savings range
//! best-case/worst-case: the shortest payback divides the low cost by the
//! high savings, the longest divides the high cost by the low savings.

use serde::{Deserialize, Serialize};

use crate::config::SavingsModelParams;
use crate::range::Range;

/// Install cost as captured at intake. Either bound may be missing; when
/// only one is present it stands in for both ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InstallCostInput {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl InstallCostInput {
    pub fn from_band(min: f64, max: f64) -> InstallCostInput {
        InstallCostInput {
            min: Some(min),
            max: Some(max),
        }
    }

    /// Resolve to an ordered `(low, high)` pair, or `None` when no cost
    /// data was supplied at all.
    pub fn resolved(&self) -> Option<(f64, f64)> {
        let a = self.min.or(self.max)?;
        let b = self.max.or(self.min)?;
        let a = if a.is_finite() { a.max(0.0) } else { 0.0 };
        let b = if b.is_finite() { b.max(0.0) } else { 0.0 };
        Some(if a <= b { (a, b) } else { (b, a) })
    }
}

/// Compute the payback range in years.
///
/// Returns [`Range::ZERO`] when no cost data is supplied; callers must
/// treat the all-zero range as "unknown", not "instant payback". Savings
/// are floored at `params.payback_epsilon` before dividing, and results
/// are clamped to `params.payback_ceiling_years` for display sanity.
pub fn payback_range(
    install_cost: &InstallCostInput,
    annual_savings: &Range,
    params: &SavingsModelParams,
) -> Range {
    let Some((low_cost, high_cost)) = install_cost.resolved() else {
        return Range::ZERO;
    };

    let high_savings = annual_savings.max.max(params.payback_epsilon);
    let low_savings = annual_savings.min.max(params.payback_epsilon);

    let shortest = low_cost / high_savings;
    let longest = high_cost / low_savings;

    let ceiling = params.payback_ceiling_years;
    Range::ordered(shortest.min(ceiling), longest.min(ceiling))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> SavingsModelParams {
        SavingsModelParams::default()
    }

    #[test]
    fn missing_cost_data_means_unknown() {
        let savings = Range::banded(300.0, 0.85, 1.15);
        let payback = payback_range(&InstallCostInput::default(), &savings, &params());
        assert_eq!(payback, Range::ZERO);
    }

    #[test]
    fn best_and_worst_case_pairing() {
        let savings = Range::ordered(250.0, 350.0);
        let cost = InstallCostInput::from_band(5000.0, 7000.0);
        let payback = payback_range(&cost, &savings, &params());
        assert!((payback.min - 5000.0 / 350.0).abs() < 1e-9);
        assert!((payback.max - 7000.0 / 250.0).abs() < 1e-9);
        assert!(payback.min <= payback.max);
    }

    #[test]
    fn single_bound_stands_in_for_both() {
        let savings = Range::ordered(250.0, 350.0);
        let only_max = InstallCostInput {
            min: None,
            max: Some(6000.0),
        };
        let payback = payback_range(&only_max, &savings, &params());
        assert!((payback.min - 6000.0 / 350.0).abs() < 1e-9);
        assert!((payback.max - 6000.0 / 250.0).abs() < 1e-9);
    }

    #[test]
    fn zero_savings_hits_the_ceiling_not_infinity() {
        let payback = payback_range(
            &InstallCostInput::from_band(5000.0, 7000.0),
            &Range::ZERO,
            &params(),
        );
        assert_eq!(payback.min, params().payback_ceiling_years);
        assert_eq!(payback.max, params().payback_ceiling_years);
    }

    #[test]
    fn swapped_cost_bounds_are_reordered() {
        let savings = Range::ordered(250.0, 350.0);
        let swapped = InstallCostInput::from_band(7000.0, 5000.0);
        let ordered = InstallCostInput::from_band(5000.0, 7000.0);
        assert_eq!(
            payback_range(&swapped, &savings, &params()),
            payback_range(&ordered, &savings, &params())
        );
    }

    #[test]
    fn ceiling_is_configurable() {
        let mut p = params();
        p.payback_ceiling_years = 30.0;
        let payback = payback_range(
            &InstallCostInput::from_band(100_000.0, 500_000.0),
            &Range::ordered(10.0, 20.0),
            &p,
        );
        assert_eq!(payback.max, 30.0);
    }
}
