//! JSON incentive catalog loader.
//!
//! The catalog document carries the replacement-system table (id → tags)
//! and the incentive records. A record whose scope tag names no known
//! variant fails the load; malformed catalog entries are rejected up
//! front rather than silently skipped at resolution time.

use serde::{Deserialize, Serialize};
use std::io::Read;

use leaf_engine::incentives::{CatalogIncentive, SystemIdentity};

/// A replacement system the contractor sells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSystem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// The full catalog document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IncentiveCatalog {
    #[serde(default)]
    pub systems: Vec<CatalogSystem>,
    #[serde(default)]
    pub incentives: Vec<CatalogIncentive>,
}

impl IncentiveCatalog {
    /// Resolve a system id to its identity. Unknown ids resolve to an
    /// identity with no tags; the id alone can still match incentives.
    pub fn system_identity(&self, system_id: &str) -> SystemIdentity {
        let tags = self
            .systems
            .iter()
            .find(|s| s.id == system_id)
            .map(|s| s.tags.clone())
            .unwrap_or_default();
        SystemIdentity {
            id: system_id.to_string(),
            tags,
        }
    }
}

/// Load a catalog from a JSON reader.
pub fn load_catalog<R: Read>(reader: R) -> Result<IncentiveCatalog, String> {
    serde_json::from_reader(reader).map_err(|e| format!("Catalog parse error: {}", e))
}

/// Load a catalog from a JSON file path.
pub fn load_catalog_file(path: &str) -> Result<IncentiveCatalog, String> {
    let file = std::fs::File::open(path)
        .map_err(|e| format!("Failed to open '{}': {}", path, e))?;
    load_catalog(file)
}
