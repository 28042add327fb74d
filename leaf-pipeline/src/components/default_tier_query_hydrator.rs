use async_trait::async_trait;

use leaf_engine::config::TierKey;

use crate::query_hydrator::QueryHydrator;
use crate::types::ProspectQuery;

/// Fills in the digest's default recommendation tier when the request
/// leaves it unspecified. Jobs whose intake already names a tier are
/// unaffected; this only covers the not-yet-recommended ones.
pub struct DefaultTierQueryHydrator {
    pub default_tier: TierKey,
}

impl Default for DefaultTierQueryHydrator {
    fn default() -> Self {
        Self {
            default_tier: TierKey::Better,
        }
    }
}

#[async_trait]
impl QueryHydrator<ProspectQuery> for DefaultTierQueryHydrator {
    async fn hydrate(&self, query: &ProspectQuery) -> Result<ProspectQuery, String> {
        if query.default_tier.is_none() {
            Ok(ProspectQuery {
                default_tier: Some(self.default_tier),
                ..query.clone()
            })
        } else {
            Ok(query.clone())
        }
    }

    fn update(&self, query: &mut ProspectQuery, hydrated: ProspectQuery) {
        query.default_tier = hydrated.default_tier;
    }
}
