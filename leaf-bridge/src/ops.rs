//! Advisor operations: the complete vocabulary of valid requests.
//!
//! The admin surface's JSON gets parsed into exactly one of these
//! variants. If it doesn't parse, the request is rejected; no partial
//! execution, no silently ignored fields. Tier keys travel as strings and
//! are resolved through `TierKey::from_str`, so a misspelled tier comes
//! back as a named error instead of a confusing parse failure.

use serde::{Deserialize, Serialize};

use leaf_engine::config::{Band, ClassifierOffsets, TierOverride};
use leaf_engine::incentives::{JobLocation, SystemIdentity};
use leaf_engine::snapshot::SnapshotIntake;

/// Every valid operation the admin surface can request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", content = "params")]
pub enum AdvisorOperation {
    // ========================================
    // CALCULATIONS (read-only, always safe)
    // ========================================
    /// Compute the full savings snapshot for one intake.
    /// Returns: waste, savings ranges, payback, classification.
    ComputeSnapshot { intake: SnapshotIntake },

    /// Classify a price against a tier's expected band.
    /// Returns: the five-way cost class and the band used.
    ClassifyPrice { tier: String, price: f64 },

    /// Apply the price-linked savings adjustment for a hypothetical price.
    /// `base_monthly` falls back to the tier's configured monthly band.
    AdjustSavingsForPrice {
        tier: String,
        price: f64,
        base_monthly: Option<Band>,
    },

    /// Resolve which catalog incentives a job/system pairing qualifies for.
    /// Returns: applied list, per-level grouping, and the total.
    ResolveIncentives {
        system: SystemIdentity,
        location: JobLocation,
    },

    /// Render the customer-facing snapshot text for one intake, with
    /// incentives included when a system and location are supplied.
    RenderSummary {
        intake: SnapshotIntake,
        system: Option<SystemIdentity>,
        location: Option<JobLocation>,
    },

    // ========================================
    // CONFIG OVERRIDES (mutations)
    // ========================================
    /// Update one tier's override. Present fields win; absent fields keep
    /// whatever the current override (or the base) says.
    SetTierOverride { tier: String, update: TierOverride },

    /// Replace the classifier offsets.
    SetClassifierOffsets { offsets: ClassifierOffsets },

    /// Drop every override, returning to the base configuration.
    ClearOverrides,
}

impl AdvisorOperation {
    /// Calculations are read-only; only the override operations mutate
    /// bridge state.
    pub fn is_read_only(&self) -> bool {
        !matches!(
            self,
            AdvisorOperation::SetTierOverride { .. }
                | AdvisorOperation::SetClassifierOffsets { .. }
                | AdvisorOperation::ClearOverrides
        )
    }

    /// Short description for the audit trail.
    pub fn describe(&self) -> String {
        match self {
            AdvisorOperation::ComputeSnapshot { intake } => {
                format!("ComputeSnapshot(tier={})", intake.tier)
            }
            AdvisorOperation::ClassifyPrice { tier, price } => {
                format!("ClassifyPrice(tier={}, price={:.2})", tier, price)
            }
            AdvisorOperation::AdjustSavingsForPrice { tier, price, .. } => {
                format!("AdjustSavingsForPrice(tier={}, price={:.2})", tier, price)
            }
            AdvisorOperation::ResolveIncentives { system, location } => format!(
                "ResolveIncentives(system={}, state={}, zip={})",
                system.id, location.state, location.zip
            ),
            AdvisorOperation::RenderSummary { intake, .. } => {
                format!("RenderSummary(tier={})", intake.tier)
            }
            AdvisorOperation::SetTierOverride { tier, .. } => {
                format!("SetTierOverride(tier={})", tier)
            }
            AdvisorOperation::SetClassifierOffsets { .. } => "SetClassifierOffsets".into(),
            AdvisorOperation::ClearOverrides => "ClearOverrides".into(),
        }
    }
}
