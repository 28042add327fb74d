use async_trait::async_trait;

use crate::util;

/// Scorers compute per-candidate scores. Each scorer returns a parallel
/// vector of partial candidates carrying only the fields it computed;
/// `update` copies those fields back onto the originals. Scorers run
/// sequentially, so a later scorer sees the scores of an earlier one.
#[async_trait]
pub trait Scorer<Q, C>: Send + Sync
where
    Q: Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    /// Decide if this scorer should run for the given query.
    fn enable(&self, _query: &Q) -> bool {
        true
    }

    /// Score the candidate list. The result must be index-aligned with the
    /// input slice.
    async fn score(&self, query: &Q, candidates: &[C]) -> Result<Vec<C>, String>;

    /// Copy the scored fields onto the original candidate.
    fn update(&self, candidate: &mut C, scored: C);

    /// Returns a stable name for logging.
    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}
