//! The staged candidate pipeline.
//!
//! `execute` drives a query through every stage in a fixed order:
//! query hydration → sources → hydrators → filters → scorers → selection →
//! post-selection hydration/filtering → side effects. A failing stage is
//! logged and skipped; one broken component degrades the digest, it never
//! kills it.

use async_trait::async_trait;
use std::sync::Arc;

use crate::filter::Filter;
use crate::hydrator::Hydrator;
use crate::query_hydrator::QueryHydrator;
use crate::scorer::Scorer;
use crate::selector::Selector;
use crate::side_effect::{SideEffect, SideEffectInput};
use crate::source::Source;

/// Queries expose their request id so every stage can log against it.
pub trait HasRequestId {
    fn request_id(&self) -> &str;
}

/// Everything `execute` produced, including the intermediate sets the
/// digest summary reports on.
pub struct PipelineResult<Q, C> {
    pub query: Q,
    /// Every candidate the sources produced.
    pub retrieved_candidates: Vec<C>,
    /// Candidates removed by filters.
    pub filtered_candidates: Vec<C>,
    /// The final ranked selection.
    pub selected_candidates: Vec<C>,
}

#[async_trait]
pub trait CandidatePipeline<Q, C>: Send + Sync
where
    Q: Clone + Send + Sync + HasRequestId + 'static,
    C: Clone + Send + Sync + 'static,
{
    fn query_hydrators(&self) -> &[Box<dyn QueryHydrator<Q>>];
    fn sources(&self) -> &[Box<dyn Source<Q, C>>];
    fn hydrators(&self) -> &[Box<dyn Hydrator<Q, C>>];
    fn filters(&self) -> &[Box<dyn Filter<Q, C>>];
    fn scorers(&self) -> &[Box<dyn Scorer<Q, C>>];
    fn selector(&self) -> &dyn Selector<Q, C>;
    fn post_selection_hydrators(&self) -> &[Box<dyn Hydrator<Q, C>>];
    fn post_selection_filters(&self) -> &[Box<dyn Filter<Q, C>>];
    fn side_effects(&self) -> Arc<Vec<Box<dyn SideEffect<Q, C>>>>;
    fn result_size(&self) -> usize;

    /// Run the full pipeline for one query.
    async fn execute(&self, query: Q) -> PipelineResult<Q, C> {
        let mut query = query;

        for stage in self.query_hydrators() {
            if !stage.enable(&query) {
                continue;
            }
            match stage.hydrate(&query).await {
                Ok(hydrated) => stage.update(&mut query, hydrated),
                Err(e) => log::warn!(
                    "request_id={} query hydrator {} failed: {}",
                    query.request_id(),
                    stage.name(),
                    e
                ),
            }
        }

        let mut retrieved: Vec<C> = Vec::new();
        for source in self.sources() {
            if !source.enable(&query) {
                continue;
            }
            match source.get_candidates(&query).await {
                Ok(candidates) => retrieved.extend(candidates),
                Err(e) => log::warn!(
                    "request_id={} source {} failed: {}",
                    query.request_id(),
                    source.name(),
                    e
                ),
            }
        }

        let mut candidates = retrieved.clone();
        run_hydrators(self.hydrators(), &query, &mut candidates).await;

        let mut filtered_out: Vec<C> = Vec::new();
        run_filters(self.filters(), &query, &mut candidates, &mut filtered_out).await;

        for scorer in self.scorers() {
            if !scorer.enable(&query) {
                continue;
            }
            match scorer.score(&query, &candidates).await {
                Ok(scored) => {
                    for (candidate, partial) in candidates.iter_mut().zip(scored) {
                        scorer.update(candidate, partial);
                    }
                }
                Err(e) => log::warn!(
                    "request_id={} scorer {} failed: {}",
                    query.request_id(),
                    scorer.name(),
                    e
                ),
            }
        }

        let mut selected = self.selector().select(&query, candidates);

        run_hydrators(self.post_selection_hydrators(), &query, &mut selected).await;
        run_filters(
            self.post_selection_filters(),
            &query,
            &mut selected,
            &mut filtered_out,
        )
        .await;
        selected.truncate(self.result_size());

        let input = Arc::new(SideEffectInput {
            query: Arc::new(query.clone()),
            selected_candidates: selected.clone(),
        });
        for effect in self.side_effects().iter() {
            if !effect.enable(Arc::clone(&input.query)) {
                continue;
            }
            if let Err(e) = effect.run(Arc::clone(&input)).await {
                log::warn!(
                    "request_id={} side effect {} failed: {}",
                    query.request_id(),
                    effect.name(),
                    e
                );
            }
        }

        PipelineResult {
            query,
            retrieved_candidates: retrieved,
            filtered_candidates: filtered_out,
            selected_candidates: selected,
        }
    }
}

async fn run_hydrators<Q, C>(stages: &[Box<dyn Hydrator<Q, C>>], query: &Q, candidates: &mut [C])
where
    Q: Clone + Send + Sync + HasRequestId + 'static,
    C: Clone + Send + Sync + 'static,
{
    for stage in stages {
        if !stage.enable(query) {
            continue;
        }
        match stage.hydrate(query, candidates).await {
            Ok(hydrated) => {
                for (candidate, partial) in candidates.iter_mut().zip(hydrated) {
                    stage.update(candidate, partial);
                }
            }
            Err(e) => log::warn!(
                "request_id={} hydrator {} failed: {}",
                query.request_id(),
                stage.name(),
                e
            ),
        }
    }
}

async fn run_filters<Q, C>(
    stages: &[Box<dyn Filter<Q, C>>],
    query: &Q,
    candidates: &mut Vec<C>,
    filtered_out: &mut Vec<C>,
) where
    Q: Clone + Send + Sync + HasRequestId + 'static,
    C: Clone + Send + Sync + 'static,
{
    for stage in stages {
        if !stage.enable(query) {
            continue;
        }
        match stage.filter(query, candidates.clone()).await {
            Ok(result) => {
                *candidates = result.kept;
                filtered_out.extend(result.removed);
            }
            Err(e) => log::warn!(
                "request_id={} filter {} failed: {}",
                query.request_id(),
                stage.name(),
                e
            ),
        }
    }
}
