/// Short type name for stage logging: the last segment of a full module
/// path, so `leaf_pipeline::components::top_k_selector::TopKSelector`
/// becomes `TopKSelector`.
pub fn short_type_name(full: &str) -> &str {
    full.rsplit("::").next().unwrap_or(full)
}
