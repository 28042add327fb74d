//! LEAF savings & classification engine.
//!
//! Pure, deterministic calculations behind the customer-facing savings
//! snapshot: waste estimation, savings projection, payback, price
//! classification, the price-linked savings adjustment, and incentive
//! eligibility resolution. Every function here is synchronous, side-effect
//! free, and reads all configuration from an explicit [`EngineConfig`]
//! value; calling any of them twice with identical inputs yields
//! bit-identical outputs.

pub mod classify;
pub mod config;
pub mod dynamic;
pub mod error;
pub mod incentives;
pub mod payback;
pub mod range;
pub mod savings;
pub mod snapshot;
pub mod waste;

pub use classify::{classify_price, CostClass};
pub use config::{
    Band, ClassifierOffsets, DynamicSavingsRule, EngineConfig, EngineConfigOverride,
    SavingsModelParams, TierConfig, TierKey, TierOverride, TierTable,
};
pub use dynamic::adjust_savings_for_price;
pub use error::EngineError;
pub use incentives::{
    applied_total, group_by_level, resolve_incentives, AppliedIncentive, CatalogIncentive,
    GroupedIncentives, IncentiveLevel, IncentiveScope, IncentiveSource, JobLocation,
    SystemIdentity,
};
pub use payback::{payback_range, InstallCostInput};
pub use range::Range;
pub use savings::{project_savings, SavingsProjection};
pub use snapshot::{compute_snapshot, SavingsSnapshot, SnapshotIntake};
pub use waste::{estimate_waste, recovery_from_efficiency_score, ExistingSystemCondition, WasteEstimate};
