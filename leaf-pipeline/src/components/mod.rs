pub mod default_tier_query_hydrator;
pub mod digest_log_side_effect;
pub mod incentive_hydrator;
pub mod low_savings_filter;
pub mod savings_impact_scorer;
pub mod snapshot_source;
pub mod territory_diversity_scorer;
pub mod top_k_selector;
