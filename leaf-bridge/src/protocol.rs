//! Request parsing, validation, execution, and response formatting.
//!
//! The flow for every request:
//! 1. JSON -> parse into `AdvisorRequest` (reject if malformed)
//! 2. Validate parameters (reject if out of bounds or unknown tier)
//! 3. Resolve the effective config once (base merged with overrides)
//! 4. Run the pure engine calculation
//! 5. Log the operation for the audit trail

use serde::{Deserialize, Serialize};

use leaf_engine::classify::{classify_price, CostClass};
use leaf_engine::config::{
    Band, EngineConfig, EngineConfigOverride, TierKey, TierOverride,
};
use leaf_engine::dynamic::adjust_savings_for_price;
use leaf_engine::incentives::{
    applied_total, group_by_level, resolve_incentives, AppliedIncentive, CatalogIncentive,
    GroupedIncentives,
};
use leaf_engine::range::Range;
use leaf_engine::snapshot::{compute_snapshot, SavingsSnapshot};

use crate::error::{BridgeError, BridgeResult};
use crate::ops::AdvisorOperation;
use crate::summary;

/// Prices above this are assumed to be data-entry mistakes.
const MAX_REASONABLE_PRICE: f64 = 10_000_000.0;

/// A request from the admin surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorRequest {
    /// The operation to perform.
    pub operation: AdvisorOperation,

    /// Request ID for tracking.
    pub request_id: String,

    /// Optional context: why is the surface making this request?
    pub context: Option<String>,
}

/// Structured result of one operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OperationOutcome {
    SnapshotResult {
        snapshot: SavingsSnapshot,
    },
    ClassificationResult {
        tier: TierKey,
        cost_class: CostClass,
        band: Band,
    },
    AdjustedSavingsResult {
        tier: TierKey,
        monthly_savings: Range,
    },
    IncentivesResult {
        applied: Vec<AppliedIncentive>,
        grouped: GroupedIncentives,
        total: f64,
    },
    SummaryResult {
        text: String,
    },
    OverridesResult {
        active: EngineConfigOverride,
    },
}

/// A response to the admin surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorResponse {
    /// The operation result.
    pub result: OperationOutcome,

    /// Request ID (echoed back).
    pub request_id: String,

    /// Was this operation read-only?
    pub read_only: bool,
}

/// Audit log entry, one per processed request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub seq: u64,
    pub request_id: String,
    pub operation: String,
    pub was_read_only: bool,
    pub success: bool,
    pub error: Option<String>,
}

/// The bridge holds the base configuration, the current overrides, and
/// the incentive catalog; every calculation runs against the effective
/// config resolved at that request.
pub struct Bridge {
    base_config: EngineConfig,
    overrides: EngineConfigOverride,
    catalog: Vec<CatalogIncentive>,

    /// Audit log of all operations.
    pub audit_log: Vec<AuditEntry>,

    seq: u64,
}

impl Bridge {
    pub fn new(base_config: EngineConfig, catalog: Vec<CatalogIncentive>) -> Self {
        Bridge {
            base_config,
            overrides: EngineConfigOverride::default(),
            catalog,
            audit_log: Vec::new(),
            seq: 0,
        }
    }

    /// The currently active overrides.
    pub fn overrides(&self) -> &EngineConfigOverride {
        &self.overrides
    }

    /// The effective configuration the next calculation would use.
    pub fn effective_config(&self) -> EngineConfig {
        self.base_config.merged(&self.overrides)
    }

    /// Parse raw JSON into a validated request.
    ///
    /// First line of defense: malformed input is rejected here, before
    /// anything touches the engine.
    pub fn parse_request(&self, raw_json: &str) -> BridgeResult<AdvisorRequest> {
        let request: AdvisorRequest = serde_json::from_str(raw_json)?;
        self.validate_operation(&request.operation)?;
        Ok(request)
    }

    /// Validate operation parameters.
    fn validate_operation(&self, op: &AdvisorOperation) -> BridgeResult<()> {
        let check_price = |op_name: &str, price: f64| -> BridgeResult<()> {
            if !price.is_finite() || price < 0.0 || price > MAX_REASONABLE_PRICE {
                return Err(BridgeError::InvalidParameter {
                    op: op_name.into(),
                    reason: format!("price={} out of range [0, {}]", price, MAX_REASONABLE_PRICE),
                });
            }
            Ok(())
        };

        match op {
            AdvisorOperation::ClassifyPrice { tier, price } => {
                tier.parse::<TierKey>()?;
                check_price("ClassifyPrice", *price)
            }
            AdvisorOperation::AdjustSavingsForPrice { tier, price, .. } => {
                tier.parse::<TierKey>()?;
                check_price("AdjustSavingsForPrice", *price)
            }
            AdvisorOperation::SetTierOverride { tier, update } => {
                tier.parse::<TierKey>()?;
                if let Some(r) = update.recovery_coefficient {
                    if !r.is_finite() || !(0.0..=1.0).contains(&r) {
                        return Err(BridgeError::InvalidParameter {
                            op: "SetTierOverride".into(),
                            reason: format!("recovery_coefficient={} outside [0, 1]", r),
                        });
                    }
                }
                Ok(())
            }
            // Snapshot intakes carry typed tiers already; bad numbers are
            // absorbed by the engine's fallback defaults.
            _ => Ok(()),
        }
    }

    /// Process a validated request.
    pub fn process(&mut self, request: &AdvisorRequest) -> BridgeResult<AdvisorResponse> {
        self.validate_operation(&request.operation)?;

        let result = self.dispatch(&request.operation);

        self.seq += 1;
        self.audit_log.push(AuditEntry {
            seq: self.seq,
            request_id: request.request_id.clone(),
            operation: request.operation.describe(),
            was_read_only: request.operation.is_read_only(),
            success: result.is_ok(),
            error: result.as_ref().err().map(|e| e.to_string()),
        });

        Ok(AdvisorResponse {
            result: result?,
            request_id: request.request_id.clone(),
            read_only: request.operation.is_read_only(),
        })
    }

    fn dispatch(&mut self, op: &AdvisorOperation) -> BridgeResult<OperationOutcome> {
        // Resolved once per request; the engine never sees the overrides.
        let effective = self.effective_config();

        match op {
            AdvisorOperation::ComputeSnapshot { intake } => Ok(OperationOutcome::SnapshotResult {
                snapshot: compute_snapshot(intake, &effective),
            }),

            AdvisorOperation::ClassifyPrice { tier, price } => {
                let key: TierKey = tier.parse()?;
                let band = effective.tiers.get(key).price_band;
                Ok(OperationOutcome::ClassificationResult {
                    tier: key,
                    cost_class: classify_price(*price, &band, &effective.offsets),
                    band,
                })
            }

            AdvisorOperation::AdjustSavingsForPrice {
                tier,
                price,
                base_monthly,
            } => {
                let key: TierKey = tier.parse()?;
                let tier_config = effective.tiers.get(key);
                let base = (*base_monthly)
                    .or(tier_config.monthly_savings_band)
                    .ok_or_else(|| BridgeError::InvalidParameter {
                        op: "AdjustSavingsForPrice".into(),
                        reason: format!(
                            "no base_monthly supplied and tier {} has no monthly savings band",
                            key
                        ),
                    })?;
                let adjusted = adjust_savings_for_price(
                    &Range::ordered(base.min, base.max),
                    *price,
                    tier_config.price_band.max,
                    &effective.dynamic_rule,
                );
                Ok(OperationOutcome::AdjustedSavingsResult {
                    tier: key,
                    monthly_savings: adjusted,
                })
            }

            AdvisorOperation::ResolveIncentives { system, location } => {
                let applied = resolve_incentives(&self.catalog, system, location);
                let grouped = group_by_level(&applied);
                let total = applied_total(&applied);
                Ok(OperationOutcome::IncentivesResult {
                    applied,
                    grouped,
                    total,
                })
            }

            AdvisorOperation::RenderSummary {
                intake,
                system,
                location,
            } => {
                let snapshot = compute_snapshot(intake, &effective);
                let grouped = match (system, location) {
                    (Some(system), Some(location)) => {
                        let applied = resolve_incentives(&self.catalog, system, location);
                        Some(group_by_level(&applied))
                    }
                    _ => None,
                };
                Ok(OperationOutcome::SummaryResult {
                    text: summary::render_snapshot_summary(&snapshot, grouped.as_ref()),
                })
            }

            AdvisorOperation::SetTierOverride { tier, update } => {
                let key: TierKey = tier.parse()?;
                let slot = self.overrides.tier_mut(key);
                let merged = match slot.take() {
                    // Field-wise: new fields win, untouched fields persist.
                    Some(previous) => TierOverride {
                        price_band: update.price_band.or(previous.price_band),
                        recovery_coefficient: update
                            .recovery_coefficient
                            .or(previous.recovery_coefficient),
                        monthly_savings_band: update
                            .monthly_savings_band
                            .or(previous.monthly_savings_band),
                    },
                    None => update.clone(),
                };
                *slot = Some(merged);
                Ok(OperationOutcome::OverridesResult {
                    active: self.overrides.clone(),
                })
            }

            AdvisorOperation::SetClassifierOffsets { offsets } => {
                self.overrides.offsets = Some(*offsets);
                Ok(OperationOutcome::OverridesResult {
                    active: self.overrides.clone(),
                })
            }

            AdvisorOperation::ClearOverrides => {
                self.overrides = EngineConfigOverride::default();
                Ok(OperationOutcome::OverridesResult {
                    active: self.overrides.clone(),
                })
            }
        }
    }
}

impl Default for Bridge {
    fn default() -> Self {
        Self::new(EngineConfig::default(), Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leaf_engine::classify::CostClass;
    use leaf_engine::incentives::IncentiveScope;
    use leaf_engine::payback::InstallCostInput;
    use leaf_engine::snapshot::SnapshotIntake;
    use leaf_engine::waste::ExistingSystemCondition;

    fn make_request(op: AdvisorOperation) -> AdvisorRequest {
        AdvisorRequest {
            operation: op,
            request_id: "test-001".into(),
            context: None,
        }
    }

    fn sample_intake() -> SnapshotIntake {
        SnapshotIntake {
            condition: ExistingSystemCondition {
                age_years: 18.0,
                wear: 3.0,
                expected_life_years: 20.0,
                partial_failure: false,
                annual_utility_spend: 2400.0,
                system_share: 0.4,
            },
            tier: TierKey::Better,
            install_cost: InstallCostInput::from_band(4800.0, 5800.0),
            quoted_price: Some(5200.0),
        }
    }

    #[test]
    fn parse_valid_request() {
        let bridge = Bridge::default();
        let json = r#"{
            "operation": { "op": "ClassifyPrice", "params": { "tier": "better", "price": 5200.0 } },
            "request_id": "req-001",
            "context": "price slider moved"
        }"#;
        assert!(bridge.parse_request(json).is_ok());
    }

    #[test]
    fn reject_invalid_json() {
        let bridge = Bridge::default();
        assert!(bridge.parse_request("not json at all").is_err());
    }

    #[test]
    fn reject_unknown_tier() {
        let bridge = Bridge::default();
        let json = r#"{
            "operation": { "op": "ClassifyPrice", "params": { "tier": "platinum", "price": 5200.0 } },
            "request_id": "req-002",
            "context": null
        }"#;
        let err = bridge.parse_request(json).unwrap_err();
        assert!(matches!(err, BridgeError::Engine(_)), "got {:?}", err);
    }

    #[test]
    fn reject_absurd_price() {
        let bridge = Bridge::default();
        let result = bridge.validate_operation(&AdvisorOperation::ClassifyPrice {
            tier: "better".into(),
            price: f64::INFINITY,
        });
        assert!(matches!(
            result,
            Err(BridgeError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn reject_out_of_range_recovery_coefficient() {
        let bridge = Bridge::default();
        let result = bridge.validate_operation(&AdvisorOperation::SetTierOverride {
            tier: "good".into(),
            update: TierOverride {
                recovery_coefficient: Some(1.4),
                ..TierOverride::default()
            },
        });
        assert!(matches!(
            result,
            Err(BridgeError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn compute_snapshot_round_trip() {
        let mut bridge = Bridge::default();
        let response = bridge
            .process(&make_request(AdvisorOperation::ComputeSnapshot {
                intake: sample_intake(),
            }))
            .unwrap();
        assert!(response.read_only);
        match response.result {
            OperationOutcome::SnapshotResult { snapshot } => {
                assert!((snapshot.waste.current_waste - 0.585).abs() < 1e-9);
                assert_eq!(snapshot.cost_class, Some(CostClass::InRange));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn overrides_take_effect_on_the_next_request() {
        let mut bridge = Bridge::default();

        // 5200 is in range for the stock better band (4500–6000)
        let before = bridge
            .process(&make_request(AdvisorOperation::ClassifyPrice {
                tier: "better".into(),
                price: 5200.0,
            }))
            .unwrap();
        match before.result {
            OperationOutcome::ClassificationResult { cost_class, .. } => {
                assert_eq!(cost_class, CostClass::InRange)
            }
            other => panic!("unexpected outcome: {:?}", other),
        }

        // Narrow the band so 5200 falls above it
        bridge
            .process(&make_request(AdvisorOperation::SetTierOverride {
                tier: "better".into(),
                update: TierOverride {
                    price_band: Some(Band::new(4000.0, 5000.0)),
                    ..TierOverride::default()
                },
            }))
            .unwrap();

        let after = bridge
            .process(&make_request(AdvisorOperation::ClassifyPrice {
                tier: "better".into(),
                price: 5200.0,
            }))
            .unwrap();
        match after.result {
            OperationOutcome::ClassificationResult { cost_class, .. } => {
                assert_eq!(cost_class, CostClass::LikelyOverpriced)
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn tier_override_updates_merge_field_wise() {
        let mut bridge = Bridge::default();
        bridge
            .process(&make_request(AdvisorOperation::SetTierOverride {
                tier: "best".into(),
                update: TierOverride {
                    recovery_coefficient: Some(0.75),
                    ..TierOverride::default()
                },
            }))
            .unwrap();
        bridge
            .process(&make_request(AdvisorOperation::SetTierOverride {
                tier: "best".into(),
                update: TierOverride {
                    price_band: Some(Band::new(6500.0, 9500.0)),
                    ..TierOverride::default()
                },
            }))
            .unwrap();

        let active = bridge.overrides().best.as_ref().unwrap();
        assert_eq!(active.recovery_coefficient, Some(0.75));
        assert_eq!(active.price_band, Some(Band::new(6500.0, 9500.0)));
    }

    #[test]
    fn clear_overrides_restores_base_config() {
        let mut bridge = Bridge::default();
        bridge
            .process(&make_request(AdvisorOperation::SetClassifierOffsets {
                offsets: leaf_engine::config::ClassifierOffsets {
                    unreal_low_from_min: -100.0,
                    overpriced_from_max: 500.0,
                },
            }))
            .unwrap();
        assert!(!bridge.overrides().is_empty());

        bridge
            .process(&make_request(AdvisorOperation::ClearOverrides))
            .unwrap();
        assert!(bridge.overrides().is_empty());
        assert_eq!(bridge.effective_config(), EngineConfig::default());
    }

    #[test]
    fn adjust_savings_requires_a_base_band() {
        let mut bridge = Bridge::default();
        // Stock config has no legacy monthly band and none supplied → reject
        let result = bridge.process(&make_request(AdvisorOperation::AdjustSavingsForPrice {
            tier: "better".into(),
            price: 8200.0,
            base_monthly: None,
        }));
        assert!(matches!(
            result,
            Err(BridgeError::InvalidParameter { .. })
        ));

        // With an explicit base the bump applies: $8200 is two steps over
        let response = bridge
            .process(&make_request(AdvisorOperation::AdjustSavingsForPrice {
                tier: "better".into(),
                price: 8200.0,
                base_monthly: Some(Band::new(20.0, 30.0)),
            }))
            .unwrap();
        match response.result {
            OperationOutcome::AdjustedSavingsResult {
                monthly_savings, ..
            } => {
                assert_eq!((monthly_savings.min, monthly_savings.max), (30.0, 40.0));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn resolve_incentives_through_the_bridge() {
        let catalog = vec![CatalogIncentive {
            id: "or-rebate".into(),
            name: "Oregon Heat Pump Rebate".into(),
            amount: 1200.0,
            scope: IncentiveScope::State {
                states: vec!["OR".into()],
            },
            system_ids: vec![],
            system_tags: vec![],
        }];
        let mut bridge = Bridge::new(EngineConfig::default(), catalog);
        let response = bridge
            .process(&make_request(AdvisorOperation::ResolveIncentives {
                system: leaf_engine::incentives::SystemIdentity {
                    id: "hp-3t-split".into(),
                    tags: vec![],
                },
                location: leaf_engine::incentives::JobLocation {
                    zip: "97206".into(),
                    state: "or".into(),
                },
            }))
            .unwrap();
        match response.result {
            OperationOutcome::IncentivesResult { applied, total, .. } => {
                assert_eq!(applied.len(), 1);
                assert_eq!(total, 1200.0);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn audit_log_is_populated() {
        let mut bridge = Bridge::default();
        let _ = bridge.process(&make_request(AdvisorOperation::ComputeSnapshot {
            intake: sample_intake(),
        }));
        let _ = bridge.process(&make_request(AdvisorOperation::ClearOverrides));

        assert_eq!(bridge.audit_log.len(), 2);
        assert!(bridge.audit_log[0].was_read_only);
        assert!(bridge.audit_log[0].success);
        assert!(!bridge.audit_log[1].was_read_only);
        assert_eq!(bridge.audit_log[1].seq, 2);
    }

    #[test]
    fn full_round_trip() {
        let mut bridge = Bridge::default();
        let json = r#"{
            "operation": { "op": "ClassifyPrice", "params": { "tier": "better", "price": 3800.0 } },
            "request_id": "rt-001",
            "context": null
        }"#;
        let request = bridge.parse_request(json).unwrap();
        let response = bridge.process(&request).unwrap();
        assert_eq!(response.request_id, "rt-001");
        assert!(response.read_only);
        match response.result {
            OperationOutcome::ClassificationResult { cost_class, .. } => {
                assert_eq!(cost_class, CostClass::UnrealisticallyLow)
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }
}
