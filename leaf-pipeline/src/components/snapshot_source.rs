use async_trait::async_trait;
use rayon::prelude::*;

use leaf_engine::config::{EngineConfig, TierKey};
use leaf_engine::snapshot::compute_snapshot;

use crate::intake_loader::IntakeRecord;
use crate::source::Source;
use crate::types::{AdvisorRole, ProspectCandidate, ProspectQuery};

/// Tier assumed when neither the record nor the query names one.
const FALLBACK_TIER: TierKey = TierKey::Better;

/// Source that turns the intake book into `ProspectCandidate` items by
/// running the savings engine over every job in the queried states.
///
/// Snapshot computation is pure and per-record independent, so the batch
/// runs on the rayon pool. Recomputation is idempotent: the same book and
/// config always produce the same candidates.
pub struct SnapshotSource {
    records: Vec<IntakeRecord>,
    config: EngineConfig,
}

impl SnapshotSource {
    pub fn new(records: Vec<IntakeRecord>, config: EngineConfig) -> Self {
        Self { records, config }
    }

    fn analyze(&self, query: &ProspectQuery) -> Vec<ProspectCandidate> {
        let default_tier = query.default_tier.unwrap_or(FALLBACK_TIER);
        let timestamp = query.as_of.clone();

        self.records
            .par_iter()
            .filter(|record| query.states.iter().any(|s| s == &record.state))
            .map(|record| {
                let intake = record.to_snapshot_intake(default_tier);
                let snapshot = compute_snapshot(&intake, &self.config);
                ProspectCandidate {
                    id: format!("{}-{}", record.job_id, snapshot.tier),
                    job_id: record.job_id.clone(),
                    customer: record.customer.clone(),
                    state: record.state.clone(),
                    zip: record.zip.clone(),
                    system_id: record.system_id.clone(),
                    tier: snapshot.tier,
                    current_waste: snapshot.waste.current_waste,
                    recoverable_waste: snapshot.waste.recoverable_waste,
                    annual_savings: snapshot.annual_savings,
                    monthly_savings: snapshot.monthly_savings,
                    payback_years: snapshot.payback_years,
                    quoted_price: record.quoted_price,
                    cost_class: snapshot.cost_class,
                    adjusted_monthly_savings: snapshot.adjusted_monthly_savings,
                    computed_at: timestamp.clone(),
                    ..ProspectCandidate::default()
                }
            })
            .collect()
    }
}

#[async_trait]
impl Source<ProspectQuery, ProspectCandidate> for SnapshotSource {
    fn enable(&self, query: &ProspectQuery) -> bool {
        !query.states.is_empty() && !self.records.is_empty()
    }

    async fn get_candidates(&self, query: &ProspectQuery) -> Result<Vec<ProspectCandidate>, String> {
        let mut candidates = self.analyze(query);

        // Field reps only see their own territory.
        if let AdvisorRole::FieldRep { ref state } = query.role {
            candidates.retain(|c| &c.state == state);
        }

        // Tier filter, when the request narrows to specific tiers.
        if let Some(tiers) = query.filters.as_ref().and_then(|f| f.tiers.as_ref()) {
            candidates.retain(|c| tiers.contains(&c.tier));
        }

        // par_iter order is deterministic, but sort anyway so downstream
        // grouping never depends on the thread pool.
        candidates.sort_by(|a, b| a.job_id.cmp(&b.job_id));
        Ok(candidates)
    }
}
