use async_trait::async_trait;

use leaf_engine::classify::CostClass;

use crate::scorer::Scorer;
use crate::types::{ProspectCandidate, ProspectQuery};

/// Worst-case payback at or under this many years reads as a fast win.
const FAST_PAYBACK_YEARS: f64 = 5.0;
/// Worst-case payback beyond this many years drags the score down.
const SLOW_PAYBACK_YEARS: f64 = 10.0;

/// Scores candidates by annual savings on a log scale, shaped by payback
/// speed, the price-band verdict, and the incentive total.
pub struct SavingsImpactScorer;

impl SavingsImpactScorer {
    fn payback_multiplier(candidate: &ProspectCandidate) -> f64 {
        // An all-zero payback range means "no cost data yet", not instant.
        if candidate.payback_years.is_zero() {
            return 1.0;
        }
        match candidate.payback_years.max {
            y if y <= FAST_PAYBACK_YEARS => 1.3,
            y if y <= SLOW_PAYBACK_YEARS => 1.0,
            _ => 0.8,
        }
    }

    fn class_multiplier(candidate: &ProspectCandidate) -> f64 {
        match candidate.cost_class {
            None | Some(CostClass::BelowRange) => 1.0,
            Some(CostClass::InRange) => 1.1,
            Some(CostClass::LikelyOverpriced) => 0.9,
            Some(CostClass::UnrealisticallyLow) => 0.8,
            Some(CostClass::Overpriced) => 0.7,
        }
    }

    fn incentive_multiplier(candidate: &ProspectCandidate) -> f64 {
        // Up to +25% for a rich incentive package.
        1.0 + (candidate.incentive_total / 10_000.0).min(0.25)
    }
}

#[async_trait]
impl Scorer<ProspectQuery, ProspectCandidate> for SavingsImpactScorer {
    async fn score(
        &self,
        _query: &ProspectQuery,
        candidates: &[ProspectCandidate],
    ) -> Result<Vec<ProspectCandidate>, String> {
        let scored = candidates
            .iter()
            .map(|c| {
                let base = (c.annual_savings.center + 1.0).ln(); // log scale, +1 to handle $0
                let score = base
                    * Self::payback_multiplier(c)
                    * Self::class_multiplier(c)
                    * Self::incentive_multiplier(c);
                ProspectCandidate {
                    priority_score: Some(score),
                    ..ProspectCandidate::default()
                }
            })
            .collect();

        Ok(scored)
    }

    fn update(&self, candidate: &mut ProspectCandidate, scored: ProspectCandidate) {
        candidate.priority_score = scored.priority_score;
    }
}
