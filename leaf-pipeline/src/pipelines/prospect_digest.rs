use async_trait::async_trait;
use std::sync::Arc;

use leaf_engine::config::EngineConfig;

use crate::candidate_pipeline::CandidatePipeline;
use crate::catalog_loader::IncentiveCatalog;
use crate::components::default_tier_query_hydrator::DefaultTierQueryHydrator;
use crate::components::digest_log_side_effect::DigestLogSideEffect;
use crate::components::incentive_hydrator::IncentiveHydrator;
use crate::components::low_savings_filter::LowSavingsFilter;
use crate::components::savings_impact_scorer::SavingsImpactScorer;
use crate::components::snapshot_source::SnapshotSource;
use crate::components::territory_diversity_scorer::TerritoryDiversityScorer;
use crate::components::top_k_selector::TopKSelector;
use crate::filter::Filter;
use crate::hydrator::Hydrator;
use crate::intake_loader::IntakeRecord;
use crate::query_hydrator::QueryHydrator;
use crate::scorer::Scorer;
use crate::selector::Selector;
use crate::side_effect::SideEffect;
use crate::source::Source;
use crate::types::{ProspectCandidate, ProspectQuery};

/// The prospect digest pipeline: which jobs in the book deserve the next
/// follow-up call.
///
/// Pipeline flow:
/// 1. DefaultTierQueryHydrator fills in the default recommendation tier
/// 2. SnapshotSource runs the savings engine over the intake book
/// 3. IncentiveHydrator attaches resolved incentive eligibility
/// 4. LowSavingsFilter removes jobs under the monthly-savings floor
/// 5. SavingsImpactScorer assigns priority scores
/// 6. TerritoryDiversityScorer attenuates repeated states
/// 7. TopKSelector picks the top N
/// 8. DigestLogSideEffect records the outcome
pub struct ProspectDigestPipeline {
    query_hydrators: Vec<Box<dyn QueryHydrator<ProspectQuery>>>,
    sources: Vec<Box<dyn Source<ProspectQuery, ProspectCandidate>>>,
    hydrators: Vec<Box<dyn Hydrator<ProspectQuery, ProspectCandidate>>>,
    filters: Vec<Box<dyn Filter<ProspectQuery, ProspectCandidate>>>,
    scorers: Vec<Box<dyn Scorer<ProspectQuery, ProspectCandidate>>>,
    selector: TopKSelector,
    post_selection_hydrators: Vec<Box<dyn Hydrator<ProspectQuery, ProspectCandidate>>>,
    post_selection_filters: Vec<Box<dyn Filter<ProspectQuery, ProspectCandidate>>>,
    side_effects: Arc<Vec<Box<dyn SideEffect<ProspectQuery, ProspectCandidate>>>>,
    result_size: usize,
}

impl ProspectDigestPipeline {
    /// Create a pipeline over an intake book with the default digest size.
    pub fn with_book(
        records: Vec<IntakeRecord>,
        catalog: IncentiveCatalog,
        config: EngineConfig,
    ) -> Self {
        Self::with_book_and_size(records, catalog, config, 5)
    }

    /// Create a pipeline with a custom digest size.
    pub fn with_book_and_size(
        records: Vec<IntakeRecord>,
        catalog: IncentiveCatalog,
        config: EngineConfig,
        result_size: usize,
    ) -> Self {
        let catalog = Arc::new(catalog);

        let query_hydrators: Vec<Box<dyn QueryHydrator<ProspectQuery>>> =
            vec![Box::new(DefaultTierQueryHydrator::default())];

        let sources: Vec<Box<dyn Source<ProspectQuery, ProspectCandidate>>> =
            vec![Box::new(SnapshotSource::new(records, config))];

        let hydrators: Vec<Box<dyn Hydrator<ProspectQuery, ProspectCandidate>>> =
            vec![Box::new(IncentiveHydrator::new(Arc::clone(&catalog)))];

        let filters: Vec<Box<dyn Filter<ProspectQuery, ProspectCandidate>>> =
            vec![Box::new(LowSavingsFilter::default())];

        let scorers: Vec<Box<dyn Scorer<ProspectQuery, ProspectCandidate>>> = vec![
            Box::new(SavingsImpactScorer),
            Box::new(TerritoryDiversityScorer::default()),
        ];

        let selector = TopKSelector { k: result_size };

        let side_effects: Arc<Vec<Box<dyn SideEffect<ProspectQuery, ProspectCandidate>>>> =
            Arc::new(vec![Box::new(DigestLogSideEffect)]);

        Self {
            query_hydrators,
            sources,
            hydrators,
            filters,
            scorers,
            selector,
            post_selection_hydrators: Vec::new(),
            post_selection_filters: Vec::new(),
            side_effects,
            result_size,
        }
    }
}

#[async_trait]
impl CandidatePipeline<ProspectQuery, ProspectCandidate> for ProspectDigestPipeline {
    fn query_hydrators(&self) -> &[Box<dyn QueryHydrator<ProspectQuery>>] {
        &self.query_hydrators
    }

    fn sources(&self) -> &[Box<dyn Source<ProspectQuery, ProspectCandidate>>] {
        &self.sources
    }

    fn hydrators(&self) -> &[Box<dyn Hydrator<ProspectQuery, ProspectCandidate>>] {
        &self.hydrators
    }

    fn filters(&self) -> &[Box<dyn Filter<ProspectQuery, ProspectCandidate>>] {
        &self.filters
    }

    fn scorers(&self) -> &[Box<dyn Scorer<ProspectQuery, ProspectCandidate>>] {
        &self.scorers
    }

    fn selector(&self) -> &dyn Selector<ProspectQuery, ProspectCandidate> {
        &self.selector
    }

    fn post_selection_hydrators(&self) -> &[Box<dyn Hydrator<ProspectQuery, ProspectCandidate>>] {
        &self.post_selection_hydrators
    }

    fn post_selection_filters(&self) -> &[Box<dyn Filter<ProspectQuery, ProspectCandidate>>] {
        &self.post_selection_filters
    }

    fn side_effects(&self) -> Arc<Vec<Box<dyn SideEffect<ProspectQuery, ProspectCandidate>>>> {
        Arc::clone(&self.side_effects)
    }

    fn result_size(&self) -> usize {
        self.result_size
    }
}
