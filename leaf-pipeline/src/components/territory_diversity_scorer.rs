use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::HashMap;

use crate::scorer::Scorer;
use crate::types::{ProspectCandidate, ProspectQuery};

/// Attenuates scores for repeated states so a manager's digest covers the
/// territory instead of stacking one state's jobs at the top.
///
/// Candidates are walked in current-score order; each later appearance of
/// the same state is multiplied by `decay_factor^position`, never dropping
/// below `floor`.
pub struct TerritoryDiversityScorer {
    pub decay_factor: f64,
    pub floor: f64,
}

impl Default for TerritoryDiversityScorer {
    fn default() -> Self {
        Self {
            decay_factor: 0.7,
            floor: 0.1,
        }
    }
}

impl TerritoryDiversityScorer {
    fn multiplier(&self, position: usize) -> f64 {
        (1.0 - self.floor) * self.decay_factor.powf(position as f64) + self.floor
    }
}

#[async_trait]
impl Scorer<ProspectQuery, ProspectCandidate> for TerritoryDiversityScorer {
    async fn score(
        &self,
        _query: &ProspectQuery,
        candidates: &[ProspectCandidate],
    ) -> Result<Vec<ProspectCandidate>, String> {
        let mut state_counts: HashMap<String, usize> = HashMap::new();
        let mut scored = vec![ProspectCandidate::default(); candidates.len()];

        let mut ordered: Vec<(usize, &ProspectCandidate)> =
            candidates.iter().enumerate().collect();
        ordered.sort_by(|(_, a), (_, b)| {
            let a_score = a.priority_score.unwrap_or(f64::NEG_INFINITY);
            let b_score = b.priority_score.unwrap_or(f64::NEG_INFINITY);
            b_score.partial_cmp(&a_score).unwrap_or(Ordering::Equal)
        });

        for (original_idx, candidate) in ordered {
            let entry = state_counts.entry(candidate.state.clone()).or_insert(0);
            let position = *entry;
            *entry += 1;

            let adjusted = candidate
                .priority_score
                .map(|s| s * self.multiplier(position));

            scored[original_idx] = ProspectCandidate {
                priority_score: adjusted,
                ..ProspectCandidate::default()
            };
        }

        Ok(scored)
    }

    fn update(&self, candidate: &mut ProspectCandidate, scored: ProspectCandidate) {
        candidate.priority_score = scored.priority_score;
    }
}
