use async_trait::async_trait;
use std::sync::Arc;

use leaf_engine::incentives::{applied_total, resolve_incentives, JobLocation};

use crate::catalog_loader::IncentiveCatalog;
use crate::hydrator::Hydrator;
use crate::types::{ProspectCandidate, ProspectQuery};

/// Hydrates candidates with their resolved incentive eligibility.
///
/// Resolution is per-candidate: the job's zip/state plus the recommended
/// system's id and tags decide which catalog records apply. The attached
/// total counts only applied entries.
pub struct IncentiveHydrator {
    catalog: Arc<IncentiveCatalog>,
}

impl IncentiveHydrator {
    pub fn new(catalog: Arc<IncentiveCatalog>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl Hydrator<ProspectQuery, ProspectCandidate> for IncentiveHydrator {
    fn enable(&self, _query: &ProspectQuery) -> bool {
        !self.catalog.incentives.is_empty()
    }

    async fn hydrate(
        &self,
        _query: &ProspectQuery,
        candidates: &[ProspectCandidate],
    ) -> Result<Vec<ProspectCandidate>, String> {
        let hydrated = candidates
            .iter()
            .map(|c| {
                let system = self.catalog.system_identity(&c.system_id);
                let job = JobLocation {
                    zip: c.zip.clone(),
                    state: c.state.clone(),
                };
                let applied = resolve_incentives(&self.catalog.incentives, &system, &job);
                let total = applied_total(&applied);
                ProspectCandidate {
                    incentives: applied,
                    incentive_total: total,
                    ..ProspectCandidate::default()
                }
            })
            .collect();
        Ok(hydrated)
    }

    fn update(&self, candidate: &mut ProspectCandidate, hydrated: ProspectCandidate) {
        candidate.incentives = hydrated.incentives;
        candidate.incentive_total = hydrated.incentive_total;
    }
}
