//! Engine configuration and calibration constants.
//!
//! Earlier implementations of these calculations drifted apart because each
//! page carried its own copy of the coefficients. Every coefficient now
//! lives here as a named constant wired into [`EngineConfig::default`], and
//! the engine never reads configuration implicitly: callers resolve one
//! `EngineConfig` value (base plus any overrides) and pass it into every
//! call.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

// ---------------------------------------------------------------------------
// Fallback defaults for missing or non-finite intake numbers
// ---------------------------------------------------------------------------

/// Assumed system age when intake data is missing or non-finite.
pub const FALLBACK_AGE_YEARS: f64 = 12.0;
/// Assumed wear level (ordinal 0–5) when missing.
pub const FALLBACK_WEAR: f64 = 3.0;
/// Assumed expected service life when missing.
pub const FALLBACK_EXPECTED_LIFE_YEARS: f64 = 18.0;
/// Assumed annual utility spend (USD/yr) when missing.
pub const FALLBACK_ANNUAL_UTILITY_SPEND: f64 = 2400.0;
/// Assumed share of utility spend attributable to the system when missing.
pub const FALLBACK_SYSTEM_SHARE: f64 = 0.4;

// ---------------------------------------------------------------------------
// Tier keys
// ---------------------------------------------------------------------------

/// One of the three replacement packages. Ordinal by data-authoring
/// convention: `best` carries at least the recovery strength and price band
/// of `better`, which carries at least those of `good`. The engine reads the
/// configured values as-is and does not enforce that ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TierKey {
    Good,
    Better,
    Best,
}

impl TierKey {
    pub const ALL: [TierKey; 3] = [TierKey::Good, TierKey::Better, TierKey::Best];

    pub fn as_str(&self) -> &'static str {
        match self {
            TierKey::Good => "good",
            TierKey::Better => "better",
            TierKey::Best => "best",
        }
    }
}

impl fmt::Display for TierKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TierKey {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "good" => Ok(TierKey::Good),
            "better" => Ok(TierKey::Better),
            "best" => Ok(TierKey::Best),
            _ => Err(EngineError::UnknownTier(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Bands and per-tier configuration
// ---------------------------------------------------------------------------

/// A dollar band. Bounds are reordered at construction so `min <= max`
/// holds regardless of input order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub min: f64,
    pub max: f64,
}

impl Band {
    pub fn new(a: f64, b: f64) -> Band {
        if a <= b {
            Band { min: a, max: b }
        } else {
            Band { min: b, max: a }
        }
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }
}

/// Per-tier configuration: the expected install price band, how strongly
/// the tier recovers existing waste, and (legacy catalogs only) a base
/// monthly savings band used by the price-linked adjustment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierConfig {
    pub price_band: Band,
    pub recovery_coefficient: f64,
    #[serde(default)]
    pub monthly_savings_band: Option<Band>,
}

/// All three tiers. A struct rather than a map so a missing tier is
/// unrepresentable once a [`TierKey`] has been parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierTable {
    pub good: TierConfig,
    pub better: TierConfig,
    pub best: TierConfig,
}

impl TierTable {
    pub fn get(&self, key: TierKey) -> &TierConfig {
        match key {
            TierKey::Good => &self.good,
            TierKey::Better => &self.better,
            TierKey::Best => &self.best,
        }
    }
}

impl Default for TierTable {
    fn default() -> Self {
        TierTable {
            good: TierConfig {
                price_band: Band::new(3000.0, 4500.0),
                recovery_coefficient: 0.40,
                monthly_savings_band: None,
            },
            better: TierConfig {
                price_band: Band::new(4500.0, 6000.0),
                recovery_coefficient: 0.55,
                monthly_savings_band: None,
            },
            best: TierConfig {
                price_band: Band::new(6000.0, 9000.0),
                recovery_coefficient: 0.70,
                monthly_savings_band: None,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Classifier offsets, dynamic rule, model parameters
// ---------------------------------------------------------------------------

/// Signed offsets widening the tier band for classification. A price below
/// `band.min + unreal_low_from_min` reads as unrealistically low; a price
/// above `band.max + overpriced_from_max` reads as overpriced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassifierOffsets {
    pub unreal_low_from_min: f64,
    pub overpriced_from_max: f64,
}

impl Default for ClassifierOffsets {
    fn default() -> Self {
        ClassifierOffsets {
            unreal_low_from_min: -500.0,
            overpriced_from_max: 3000.0,
        }
    }
}

/// Discrete bump schedule for prices above a tier's maximum: every full
/// `step_size_dollars` above the band adds `bump_per_step_monthly` to the
/// projected monthly savings band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DynamicSavingsRule {
    pub step_size_dollars: f64,
    pub bump_per_step_monthly: f64,
}

impl Default for DynamicSavingsRule {
    fn default() -> Self {
        DynamicSavingsRule {
            step_size_dollars: 1000.0,
            bump_per_step_monthly: 5.0,
        }
    }
}

/// Heuristic model constants. The ±15% uncertainty band and the payback
/// pairing are display contracts consumers rely on; they are configuration,
/// not derivable science.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavingsModelParams {
    /// Lower multiplicative bound of the savings uncertainty band.
    pub band_low: f64,
    /// Upper multiplicative bound of the savings uncertainty band.
    pub band_high: f64,
    /// Floor applied to savings before dividing install cost by them.
    pub payback_epsilon: f64,
    /// Display ceiling for payback years; keeps absurd numbers off screens.
    pub payback_ceiling_years: f64,
}

impl Default for SavingsModelParams {
    fn default() -> Self {
        SavingsModelParams {
            band_low: 0.85,
            band_high: 1.15,
            payback_epsilon: 1e-9,
            payback_ceiling_years: 200.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Engine configuration and typed overrides
// ---------------------------------------------------------------------------

/// Everything the engine reads. Resolved once at the call site and passed
/// in; no function reads configuration from ambient state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub tiers: TierTable,
    pub offsets: ClassifierOffsets,
    pub dynamic_rule: DynamicSavingsRule,
    pub params: SavingsModelParams,
}

/// Per-tier override. A present field wins; an absent field falls back to
/// the base tier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierOverride {
    pub price_band: Option<Band>,
    pub recovery_coefficient: Option<f64>,
    pub monthly_savings_band: Option<Band>,
}

impl TierOverride {
    fn apply(&self, base: &TierConfig) -> TierConfig {
        TierConfig {
            price_band: self.price_band.unwrap_or(base.price_band),
            recovery_coefficient: self
                .recovery_coefficient
                .unwrap_or(base.recovery_coefficient),
            monthly_savings_band: self
                .monthly_savings_band
                .or(base.monthly_savings_band),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.price_band.is_none()
            && self.recovery_coefficient.is_none()
            && self.monthly_savings_band.is_none()
    }
}

/// Deployment-level overrides. Explicit struct merge with per-field
/// precedence replaces the deep object spreads earlier implementations
/// used: every field either wins outright or falls back to the base.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfigOverride {
    pub good: Option<TierOverride>,
    pub better: Option<TierOverride>,
    pub best: Option<TierOverride>,
    pub offsets: Option<ClassifierOffsets>,
    pub dynamic_rule: Option<DynamicSavingsRule>,
    pub params: Option<SavingsModelParams>,
}

impl EngineConfigOverride {
    pub fn tier_mut(&mut self, key: TierKey) -> &mut Option<TierOverride> {
        match key {
            TierKey::Good => &mut self.good,
            TierKey::Better => &mut self.better,
            TierKey::Best => &mut self.best,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.good.is_none()
            && self.better.is_none()
            && self.best.is_none()
            && self.offsets.is_none()
            && self.dynamic_rule.is_none()
            && self.params.is_none()
    }
}

impl EngineConfig {
    /// Resolve the effective configuration for one invocation.
    pub fn merged(&self, overrides: &EngineConfigOverride) -> EngineConfig {
        let tier = |ov: &Option<TierOverride>, base: &TierConfig| match ov {
            Some(t) => t.apply(base),
            None => base.clone(),
        };
        EngineConfig {
            tiers: TierTable {
                good: tier(&overrides.good, &self.tiers.good),
                better: tier(&overrides.better, &self.tiers.better),
                best: tier(&overrides.best, &self.tiers.best),
            },
            offsets: overrides.offsets.unwrap_or(self.offsets),
            dynamic_rule: overrides.dynamic_rule.unwrap_or(self.dynamic_rule),
            params: overrides.params.unwrap_or(self.params),
        }
    }
}
