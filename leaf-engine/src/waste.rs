//! Waste model.
//!
//! Estimates what fraction of a customer's utility spend the existing
//! system wastes (`current_waste`) and how much of that waste a replacement
//! tier can recover (`recoverable_waste`). The weighted-sum coefficients
//! below are the canonical values; the near-duplicate variants that drifted
//! across earlier implementations all collapse onto these.

use serde::{Deserialize, Serialize};

use crate::config::{
    FALLBACK_AGE_YEARS, FALLBACK_ANNUAL_UTILITY_SPEND, FALLBACK_EXPECTED_LIFE_YEARS,
    FALLBACK_SYSTEM_SHARE, FALLBACK_WEAR,
};

/// Weight of the wear factor in the current-waste estimate.
pub const WEAR_WEIGHT: f64 = 0.45;
/// Weight of the age factor.
pub const AGE_WEIGHT: f64 = 0.35;
/// Weight of the partial-failure factor.
pub const FAILURE_WEIGHT: f64 = 0.20;
/// Even a pristine system is assumed to waste at least this fraction.
pub const CURRENT_WASTE_FLOOR: f64 = 0.15;
/// No system is assumed to waste more than this fraction.
pub const CURRENT_WASTE_CEILING: f64 = 0.95;
/// Wear is ordinal on a clamped 0–5 scale, normalized by this maximum.
pub const WEAR_SCALE_MAX: f64 = 5.0;

/// The customer's existing equipment as captured at intake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExistingSystemCondition {
    pub age_years: f64,
    /// Ordinal wear level, 0 (like new) to 5 (failing).
    pub wear: f64,
    pub expected_life_years: f64,
    pub partial_failure: bool,
    /// Whole-home utility spend, USD per year.
    pub annual_utility_spend: f64,
    /// Fraction of utility spend attributable to this system, 0–1.
    pub system_share: f64,
}

impl Default for ExistingSystemCondition {
    fn default() -> Self {
        ExistingSystemCondition {
            age_years: FALLBACK_AGE_YEARS,
            wear: FALLBACK_WEAR,
            expected_life_years: FALLBACK_EXPECTED_LIFE_YEARS,
            partial_failure: false,
            annual_utility_spend: FALLBACK_ANNUAL_UTILITY_SPEND,
            system_share: FALLBACK_SYSTEM_SHARE,
        }
    }
}

impl ExistingSystemCondition {
    /// Replace non-finite numbers with the documented fallbacks and clamp
    /// the rest into their domains, so NaN/Infinity never reach a formula.
    pub fn sanitized(&self) -> ExistingSystemCondition {
        let or_fallback = |v: f64, fallback: f64| if v.is_finite() { v } else { fallback };

        let expected_life = or_fallback(self.expected_life_years, FALLBACK_EXPECTED_LIFE_YEARS);
        ExistingSystemCondition {
            age_years: or_fallback(self.age_years, FALLBACK_AGE_YEARS).max(0.0),
            wear: or_fallback(self.wear, FALLBACK_WEAR).clamp(0.0, WEAR_SCALE_MAX),
            expected_life_years: if expected_life > 0.0 {
                expected_life
            } else {
                FALLBACK_EXPECTED_LIFE_YEARS
            },
            partial_failure: self.partial_failure,
            annual_utility_spend: or_fallback(
                self.annual_utility_spend,
                FALLBACK_ANNUAL_UTILITY_SPEND,
            )
            .max(0.0),
            system_share: or_fallback(self.system_share, FALLBACK_SYSTEM_SHARE).clamp(0.0, 1.0),
        }
    }
}

/// Dimensionless waste fractions for one condition/tier pairing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WasteEstimate {
    pub current_waste: f64,
    pub recoverable_waste: f64,
}

/// Estimate waste fractions for an existing system against a tier's
/// recovery coefficient.
///
/// `recoverable_waste <= current_waste` always, since the coefficient is
/// clamped to [0, 1]; no further clamp is needed.
pub fn estimate_waste(
    condition: &ExistingSystemCondition,
    recovery_coefficient: f64,
) -> WasteEstimate {
    let c = condition.sanitized();

    let age_factor = (c.age_years / c.expected_life_years).min(1.0);
    let wear_factor = c.wear / WEAR_SCALE_MAX;
    let failure_factor = if c.partial_failure { 1.0 } else { 0.0 };

    let current_waste = (WEAR_WEIGHT * wear_factor
        + AGE_WEIGHT * age_factor
        + FAILURE_WEIGHT * failure_factor)
        .clamp(CURRENT_WASTE_FLOOR, CURRENT_WASTE_CEILING);

    let recovery = if recovery_coefficient.is_finite() {
        recovery_coefficient.clamp(0.0, 1.0)
    } else {
        0.0
    };

    WasteEstimate {
        current_waste,
        recoverable_waste: current_waste * recovery,
    }
}

/// Legacy catalogs carry a 0–100 efficiency score instead of a recovery
/// coefficient; normalize it onto the same 0–1 scale.
pub fn recovery_from_efficiency_score(score: f64) -> f64 {
    if score.is_finite() {
        score.clamp(0.0, 100.0) / 100.0
    } else {
        0.0
    }
}
