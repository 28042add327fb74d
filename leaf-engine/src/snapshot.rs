//! Snapshot assembly.
//!
//! One call that chains the waste model, savings projector, and payback
//! calculator for an intake and, when the admin has a price on the
//! slider, classifies it and applies the price-linked adjustment.
//! Incentive resolution stays separate; it depends on the job's location
//! and system identity, not on the savings chain.

use serde::{Deserialize, Serialize};

use crate::classify::{classify_price, CostClass};
use crate::config::{EngineConfig, TierKey};
use crate::dynamic::adjust_savings_for_price;
use crate::payback::{payback_range, InstallCostInput};
use crate::range::Range;
use crate::savings::project_savings;
use crate::waste::{estimate_waste, ExistingSystemCondition, WasteEstimate};

/// Everything the savings chain needs for one job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotIntake {
    pub condition: ExistingSystemCondition,
    pub tier: TierKey,
    #[serde(default)]
    pub install_cost: InstallCostInput,
    /// Observed or hypothetical install price, when the admin has one.
    #[serde(default)]
    pub quoted_price: Option<f64>,
}

/// The numbers and labels a snapshot shows the customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsSnapshot {
    pub tier: TierKey,
    pub waste: WasteEstimate,
    pub annual_savings: Range,
    pub monthly_savings: Range,
    /// All-zero when no install cost data was supplied ("unknown").
    pub payback_years: Range,
    /// Present only when a quoted price was supplied.
    pub cost_class: Option<CostClass>,
    /// Monthly savings after the price-linked adjustment; present only
    /// when a quoted price was supplied.
    pub adjusted_monthly_savings: Option<Range>,
}

/// Compute the full snapshot for one intake under one resolved config.
///
/// Deterministic and total: every input, however degenerate, yields a
/// well-formed snapshot (fallback defaults and clamps absorb bad numbers).
pub fn compute_snapshot(intake: &SnapshotIntake, config: &EngineConfig) -> SavingsSnapshot {
    let tier_config = config.tiers.get(intake.tier);
    let condition = intake.condition.sanitized();

    let waste = estimate_waste(&condition, tier_config.recovery_coefficient);
    let projection = project_savings(
        waste.recoverable_waste,
        condition.annual_utility_spend,
        condition.system_share,
        &config.params,
    );
    let payback_years = payback_range(&intake.install_cost, &projection.annual, &config.params);

    let (cost_class, adjusted_monthly_savings) = match intake.quoted_price {
        Some(price) => {
            let class = classify_price(price, &tier_config.price_band, &config.offsets);
            // Legacy catalogs pin a base monthly band per tier; newer ones
            // let the projection drive it.
            let base = tier_config
                .monthly_savings_band
                .map(|band| Range::ordered(band.min, band.max))
                .unwrap_or(projection.monthly);
            let adjusted = adjust_savings_for_price(
                &base,
                price,
                tier_config.price_band.max,
                &config.dynamic_rule,
            );
            (Some(class), Some(adjusted))
        }
        None => (None, None),
    };

    SavingsSnapshot {
        tier: intake.tier,
        waste,
        annual_savings: projection.annual,
        monthly_savings: projection.monthly,
        payback_years,
        cost_class,
        adjusted_monthly_savings,
    }
}
