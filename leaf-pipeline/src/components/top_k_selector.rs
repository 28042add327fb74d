use crate::selector::Selector;
use crate::types::{ProspectCandidate, ProspectQuery};

/// Selects the top K candidates by priority score.
pub struct TopKSelector {
    pub k: usize,
}

impl Default for TopKSelector {
    fn default() -> Self {
        Self { k: 5 }
    }
}

impl Selector<ProspectQuery, ProspectCandidate> for TopKSelector {
    fn score(&self, candidate: &ProspectCandidate) -> f64 {
        candidate.priority_score.unwrap_or(f64::NEG_INFINITY)
    }

    fn size(&self) -> Option<usize> {
        Some(self.k)
    }
}
