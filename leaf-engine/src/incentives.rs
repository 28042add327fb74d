//! Incentive catalog resolution.
//!
//! Filters a catalog of incentive records down to the ones a specific
//! job/system pairing is eligible for:
//!
//! - **System match**: the record names the system's id, or shares a tag
//!   with it; a record with no system restriction matches every system.
//! - **Location match**: federal scope always matches; state scope matches
//!   the job's state (uppercased, trimmed); zip scope matches the job's zip
//!   (trimmed).
//! - An incentive is applied only when both match AND its amount is
//!   strictly positive; zero and negative amounts never reach the list.
//!
//! Absent or empty catalogs resolve to an empty list, never an error.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Geographic scope of a catalog incentive. An unknown tag fails
/// deserialization, which is the required rejection path for malformed
/// catalog entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum IncentiveScope {
    Federal,
    State { states: Vec<String> },
    Zip { zips: Vec<String> },
}

/// An incentive as authored in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogIncentive {
    pub id: String,
    pub name: String,
    pub amount: f64,
    pub scope: IncentiveScope,
    /// System ids this incentive is restricted to. Empty together with
    /// `system_tags` means no system restriction.
    #[serde(default)]
    pub system_ids: Vec<String>,
    /// System tags this incentive is restricted to.
    #[serde(default)]
    pub system_tags: Vec<String>,
}

/// The recommended replacement system, as the resolver sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemIdentity {
    pub id: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Where the job is located.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobLocation {
    pub zip: String,
    pub state: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncentiveLevel {
    Federal,
    State,
    Local,
}

impl fmt::Display for IncentiveLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IncentiveLevel::Federal => "federal",
            IncentiveLevel::State => "state",
            IncentiveLevel::Local => "local",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncentiveSource {
    Catalog,
    Manual,
}

/// A catalog incentive resolved for a specific job. `amount` is always
/// strictly positive; resolution filters the rest out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedIncentive {
    pub id: String,
    pub name: String,
    pub amount: f64,
    pub level: IncentiveLevel,
    pub applied: bool,
    pub source: IncentiveSource,
}

impl CatalogIncentive {
    fn matches_system(&self, system: &SystemIdentity) -> bool {
        if self.system_ids.is_empty() && self.system_tags.is_empty() {
            return true;
        }
        self.system_ids.iter().any(|id| id == &system.id)
            || self
                .system_tags
                .iter()
                .any(|tag| system.tags.iter().any(|t| t == tag))
    }

    fn matches_location(&self, job: &JobLocation) -> bool {
        match &self.scope {
            IncentiveScope::Federal => true,
            IncentiveScope::State { states } => {
                let wanted = job.state.trim().to_ascii_uppercase();
                states
                    .iter()
                    .any(|s| s.trim().to_ascii_uppercase() == wanted)
            }
            IncentiveScope::Zip { zips } => {
                let wanted = job.zip.trim();
                zips.iter().any(|z| z.trim() == wanted)
            }
        }
    }

    fn level(&self) -> IncentiveLevel {
        match self.scope {
            IncentiveScope::Federal => IncentiveLevel::Federal,
            IncentiveScope::State { .. } => IncentiveLevel::State,
            IncentiveScope::Zip { .. } => IncentiveLevel::Local,
        }
    }
}

/// Resolve a catalog against one job/system pairing, preserving catalog
/// order.
pub fn resolve_incentives(
    catalog: &[CatalogIncentive],
    system: &SystemIdentity,
    job: &JobLocation,
) -> Vec<AppliedIncentive> {
    catalog
        .iter()
        .filter(|inc| {
            inc.amount.is_finite()
                && inc.amount > 0.0
                && inc.matches_system(system)
                && inc.matches_location(job)
        })
        .map(|inc| AppliedIncentive {
            id: inc.id.clone(),
            name: inc.name.clone(),
            amount: inc.amount,
            level: inc.level(),
            applied: true,
            source: IncentiveSource::Catalog,
        })
        .collect()
}

/// Applied incentives partitioned by level, catalog order preserved within
/// each bucket.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupedIncentives {
    pub federal: Vec<AppliedIncentive>,
    pub state: Vec<AppliedIncentive>,
    pub local: Vec<AppliedIncentive>,
}

impl GroupedIncentives {
    pub fn total(&self) -> f64 {
        applied_total(&self.federal) + applied_total(&self.state) + applied_total(&self.local)
    }

    pub fn is_empty(&self) -> bool {
        self.federal.is_empty() && self.state.is_empty() && self.local.is_empty()
    }
}

/// Partition applied incentives into federal/state/local buckets.
pub fn group_by_level(entries: &[AppliedIncentive]) -> GroupedIncentives {
    let mut grouped = GroupedIncentives::default();
    for entry in entries {
        match entry.level {
            IncentiveLevel::Federal => grouped.federal.push(entry.clone()),
            IncentiveLevel::State => grouped.state.push(entry.clone()),
            IncentiveLevel::Local => grouped.local.push(entry.clone()),
        }
    }
    grouped
}

/// Total over entries whose `applied` flag is set. Manual entries an admin
/// has toggled off contribute nothing.
pub fn applied_total(entries: &[AppliedIncentive]) -> f64 {
    entries
        .iter()
        .filter(|e| e.applied)
        .map(|e| e.amount)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heat_pump() -> SystemIdentity {
        SystemIdentity {
            id: "hp-3t-split".into(),
            tags: vec!["heat-pump".into(), "electric".into()],
        }
    }

    fn portland_job() -> JobLocation {
        JobLocation {
            zip: "97206".into(),
            state: "or".into(),
        }
    }

    fn federal_credit(amount: f64) -> CatalogIncentive {
        CatalogIncentive {
            id: "fed-25c".into(),
            name: "Federal 25C Credit".into(),
            amount,
            scope: IncentiveScope::Federal,
            system_ids: vec![],
            system_tags: vec!["heat-pump".into()],
        }
    }

    fn state_rebate() -> CatalogIncentive {
        CatalogIncentive {
            id: "or-rebate".into(),
            name: "Oregon Heat Pump Rebate".into(),
            amount: 1200.0,
            scope: IncentiveScope::State {
                states: vec!["OR".into(), "WA".into()],
            },
            system_ids: vec!["hp-3t-split".into()],
            system_tags: vec![],
        }
    }

    fn zip_program() -> CatalogIncentive {
        CatalogIncentive {
            id: "pdx-weatherize".into(),
            name: "Portland Weatherization Program".into(),
            amount: 400.0,
            scope: IncentiveScope::Zip {
                zips: vec!["97206".into(), "97211".into()],
            },
            system_ids: vec![],
            system_tags: vec![],
        }
    }

    #[test]
    fn lowercase_state_matches_after_normalization() {
        let applied = resolve_incentives(&[state_rebate()], &heat_pump(), &portland_job());
        assert_eq!(applied.len(), 1);
        assert_eq!(applied[0].level, IncentiveLevel::State);
    }

    #[test]
    fn wrong_state_does_not_match() {
        let job = JobLocation {
            zip: "83701".into(),
            state: "ID".into(),
        };
        assert!(resolve_incentives(&[state_rebate()], &heat_pump(), &job).is_empty());
    }

    #[test]
    fn zip_scope_maps_to_local_level() {
        let applied = resolve_incentives(&[zip_program()], &heat_pump(), &portland_job());
        assert_eq!(applied.len(), 1);
        assert_eq!(applied[0].level, IncentiveLevel::Local);
    }

    #[test]
    fn federal_scope_matches_everywhere() {
        let job = JobLocation {
            zip: "".into(),
            state: "".into(),
        };
        let applied = resolve_incentives(&[federal_credit(600.0)], &heat_pump(), &job);
        assert_eq!(applied.len(), 1);
        assert_eq!(applied[0].level, IncentiveLevel::Federal);
    }

    #[test]
    fn zero_amount_never_applies() {
        let applied = resolve_incentives(&[federal_credit(0.0)], &heat_pump(), &portland_job());
        assert!(applied.is_empty());
    }

    #[test]
    fn tag_mismatch_filters_out() {
        let furnace = SystemIdentity {
            id: "gas-furnace-80".into(),
            tags: vec!["gas".into()],
        };
        assert!(resolve_incentives(&[federal_credit(600.0)], &furnace, &portland_job()).is_empty());
    }

    #[test]
    fn unrestricted_incentive_matches_any_system() {
        let furnace = SystemIdentity {
            id: "gas-furnace-80".into(),
            tags: vec![],
        };
        let applied = resolve_incentives(&[zip_program()], &furnace, &portland_job());
        assert_eq!(applied.len(), 1);
    }

    #[test]
    fn grouping_preserves_catalog_order_and_totals_agree() {
        let catalog = vec![federal_credit(600.0), state_rebate(), zip_program()];
        let applied = resolve_incentives(&catalog, &heat_pump(), &portland_job());
        assert_eq!(applied.len(), 3);

        let grouped = group_by_level(&applied);
        assert_eq!(grouped.federal[0].id, "fed-25c");
        assert_eq!(grouped.state[0].id, "or-rebate");
        assert_eq!(grouped.local[0].id, "pdx-weatherize");
        assert!((grouped.total() - applied_total(&applied)).abs() < 1e-9);
        assert!((grouped.total() - 2200.0).abs() < 1e-9);
    }

    #[test]
    fn unapplied_manual_entries_are_excluded_from_totals() {
        let mut entries = resolve_incentives(
            &[federal_credit(600.0), state_rebate()],
            &heat_pump(),
            &portland_job(),
        );
        entries.push(AppliedIncentive {
            id: "manual-1".into(),
            name: "Dealer promo".into(),
            amount: 250.0,
            level: IncentiveLevel::Local,
            applied: false,
            source: IncentiveSource::Manual,
        });
        assert!((applied_total(&entries) - 1800.0).abs() < 1e-9);
    }

    #[test]
    fn empty_catalog_resolves_to_empty_list() {
        assert!(resolve_incentives(&[], &heat_pump(), &portland_job()).is_empty());
    }

    #[test]
    fn unknown_scope_tag_fails_deserialization() {
        let raw = r#"{
            "id": "x",
            "name": "Bad Scope",
            "amount": 100.0,
            "scope": { "type": "county", "counties": ["Multnomah"] }
        }"#;
        assert!(serde_json::from_str::<CatalogIncentive>(raw).is_err());
    }
}
