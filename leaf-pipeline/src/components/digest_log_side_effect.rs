use async_trait::async_trait;
use std::sync::Arc;

use crate::side_effect::{SideEffect, SideEffectInput};
use crate::types::{ProspectCandidate, ProspectQuery};

/// Logs the finished digest so operators can trace what each request
/// surfaced without re-running it.
pub struct DigestLogSideEffect;

#[async_trait]
impl SideEffect<ProspectQuery, ProspectCandidate> for DigestLogSideEffect {
    async fn run(
        &self,
        input: Arc<SideEffectInput<ProspectQuery, ProspectCandidate>>,
    ) -> Result<(), String> {
        let total_monthly: f64 = input
            .selected_candidates
            .iter()
            .map(|c| c.monthly_savings.center)
            .sum();
        log::info!(
            "request_id={} digest selected {} prospects, ${:.0}/mo combined savings center",
            input.query.request_id,
            input.selected_candidates.len(),
            total_monthly
        );
        Ok(())
    }
}
