use async_trait::async_trait;

use crate::filter::{Filter, FilterResult};
use crate::types::{ProspectCandidate, ProspectQuery};

/// Filters out jobs whose projected monthly savings are too small to be
/// worth a follow-up call. The request's own floor, when present, takes
/// precedence over the configured default.
pub struct LowSavingsFilter {
    pub min_monthly_savings: f64,
}

impl LowSavingsFilter {
    pub fn new(min_monthly_savings: f64) -> Self {
        Self {
            min_monthly_savings,
        }
    }
}

impl Default for LowSavingsFilter {
    fn default() -> Self {
        Self {
            min_monthly_savings: 10.0,
        }
    }
}

#[async_trait]
impl Filter<ProspectQuery, ProspectCandidate> for LowSavingsFilter {
    async fn filter(
        &self,
        query: &ProspectQuery,
        candidates: Vec<ProspectCandidate>,
    ) -> Result<FilterResult<ProspectCandidate>, String> {
        let floor = query
            .filters
            .as_ref()
            .and_then(|f| f.min_monthly_savings)
            .unwrap_or(self.min_monthly_savings);

        let (kept, removed): (Vec<_>, Vec<_>) = candidates
            .into_iter()
            .partition(|c| c.monthly_savings.center >= floor);

        Ok(FilterResult { kept, removed })
    }
}
