//! Savings projector.
//!
//! Converts recoverable waste plus utility spend into annual and monthly
//! savings ranges. The ±15% band around the point estimate is a display
//! contract: consumers render `min`/`max` as the quoted spread and
//! `center` as the headline number.

use serde::{Deserialize, Serialize};

use crate::config::SavingsModelParams;
use crate::range::Range;

pub const MONTHS_PER_YEAR: f64 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavingsProjection {
    pub annual: Range,
    pub monthly: Range,
}

/// Project annual and monthly savings ranges from the waste model's
/// recoverable fraction.
///
/// `center` of each range is the point estimate exactly (numerically equal
/// to the midpoint here, since the band is symmetric multiplicative).
pub fn project_savings(
    recoverable_waste: f64,
    annual_utility_spend: f64,
    system_share: f64,
    params: &SavingsModelParams,
) -> SavingsProjection {
    let spend = if annual_utility_spend.is_finite() {
        annual_utility_spend.max(0.0)
    } else {
        0.0
    };
    let share = if system_share.is_finite() {
        system_share.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let recoverable = if recoverable_waste.is_finite() {
        recoverable_waste.clamp(0.0, 1.0)
    } else {
        0.0
    };

    let annual_system_cost = spend * share;
    let annual_center = annual_system_cost * recoverable;

    let annual = Range::banded(annual_center, params.band_low, params.band_high);
    let monthly = annual.scale(1.0 / MONTHS_PER_YEAR);

    SavingsProjection { annual, monthly }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> SavingsModelParams {
        SavingsModelParams::default()
    }

    #[test]
    fn point_estimate_is_spend_share_times_recoverable() {
        // 2400 * 0.4 * 0.32175 = 308.88
        let p = project_savings(0.32175, 2400.0, 0.4, &params());
        assert!((p.annual.center - 308.88).abs() < 1e-9);
        assert!((p.monthly.center - 25.74).abs() < 1e-9);
    }

    #[test]
    fn band_is_fifteen_percent_each_way() {
        let p = project_savings(0.5, 3000.0, 0.5, &params());
        assert!((p.annual.min - p.annual.center * 0.85).abs() < 1e-9);
        assert!((p.annual.max - p.annual.center * 1.15).abs() < 1e-9);
    }

    #[test]
    fn monthly_is_annual_over_twelve() {
        let p = project_savings(0.4, 2400.0, 0.4, &params());
        assert!((p.monthly.min - p.annual.min / 12.0).abs() < 1e-9);
        assert!((p.monthly.max - p.annual.max / 12.0).abs() < 1e-9);
    }

    #[test]
    fn share_is_clamped_to_unit_interval() {
        let over = project_savings(0.5, 2400.0, 1.7, &params());
        let full = project_savings(0.5, 2400.0, 1.0, &params());
        assert_eq!(over, full);
    }

    #[test]
    fn zero_spend_yields_zero_ranges() {
        let p = project_savings(0.5, 0.0, 0.4, &params());
        assert!(p.annual.is_zero());
        assert!(p.monthly.is_zero());
    }

    #[test]
    fn non_finite_inputs_collapse_to_zero() {
        let p = project_savings(f64::NAN, f64::INFINITY, 0.4, &params());
        assert!(p.annual.is_zero());
    }

    #[test]
    fn ordering_invariant_holds() {
        let p = project_savings(0.9, 5000.0, 0.8, &params());
        assert!(p.annual.min <= p.annual.center && p.annual.center <= p.annual.max);
        assert!(p.monthly.min <= p.monthly.center && p.monthly.center <= p.monthly.max);
    }
}
