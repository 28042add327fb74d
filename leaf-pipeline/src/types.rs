use serde::Serialize;

use leaf_engine::classify::CostClass;
use leaf_engine::config::TierKey;
use leaf_engine::incentives::AppliedIncentive;
use leaf_engine::range::Range;

use crate::candidate_pipeline::HasRequestId;

// ---------------------------------------------------------------------------
// Query types
// ---------------------------------------------------------------------------

/// The role of the user requesting a digest.
#[derive(Clone, Debug)]
pub enum AdvisorRole {
    /// Sees the whole book.
    SalesManager,
    /// Sees only jobs in their own state.
    FieldRep { state: String },
}

/// Optional narrowing filters a digest request can apply.
#[derive(Clone, Debug, Default)]
pub struct ProspectFilters {
    pub min_monthly_savings: Option<f64>,
    pub tiers: Option<Vec<TierKey>>,
}

/// A digest request from the admin surface.
#[derive(Clone, Debug)]
pub struct ProspectQuery {
    pub request_id: String,
    pub user_id: String,
    pub role: AdvisorRole,
    /// States to include. Empty means nothing to analyze.
    pub states: Vec<String>,
    /// Tier used for jobs whose intake has no recommendation yet.
    /// Defaulted by the query hydrator when absent.
    pub default_tier: Option<TierKey>,
    /// ISO-8601 timestamp stamped onto every computed candidate.
    pub as_of: String,
    pub filters: Option<ProspectFilters>,
}

impl HasRequestId for ProspectQuery {
    fn request_id(&self) -> &str {
        &self.request_id
    }
}

// ---------------------------------------------------------------------------
// Candidate types
// ---------------------------------------------------------------------------

/// One job's computed snapshot, carried through the pipeline stages.
#[derive(Clone, Debug, Serialize)]
pub struct ProspectCandidate {
    pub id: String,
    pub job_id: String,
    pub customer: String,
    pub state: String,
    pub zip: String,
    pub system_id: String,
    pub tier: TierKey,

    // Engine outputs
    pub current_waste: f64,
    pub recoverable_waste: f64,
    pub annual_savings: Range,
    pub monthly_savings: Range,
    pub payback_years: Range,
    pub quoted_price: Option<f64>,
    pub cost_class: Option<CostClass>,
    pub adjusted_monthly_savings: Option<Range>,

    // Populated by the incentive hydrator
    pub incentives: Vec<AppliedIncentive>,
    pub incentive_total: f64,

    // Populated by scorers
    pub priority_score: Option<f64>,

    pub computed_at: String,
}

impl Default for ProspectCandidate {
    fn default() -> Self {
        ProspectCandidate {
            id: String::new(),
            job_id: String::new(),
            customer: String::new(),
            state: String::new(),
            zip: String::new(),
            system_id: String::new(),
            tier: TierKey::Better,
            current_waste: 0.0,
            recoverable_waste: 0.0,
            annual_savings: Range::ZERO,
            monthly_savings: Range::ZERO,
            payback_years: Range::ZERO,
            quoted_price: None,
            cost_class: None,
            adjusted_monthly_savings: None,
            incentives: Vec::new(),
            incentive_total: 0.0,
            priority_score: None,
            computed_at: String::new(),
        }
    }
}
