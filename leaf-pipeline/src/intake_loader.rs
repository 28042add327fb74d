//! CSV intake loader.
//!
//! Parses the intake export into `IntakeRecord` structs. Expected columns:
//!   job_id, customer, state, zip, system_id, age_years, wear,
//!   expected_life_years, partial_failure, annual_utility_spend,
//!   system_share, tier, install_cost_min, install_cost_max, quoted_price
//!
//! `tier` may be empty (no recommendation yet); the pipeline falls back to
//! the query's default tier. A non-empty tier that isn't good/better/best
//! is a load error, not a silent skip.

use serde::Deserialize;
use std::io::Read;

use leaf_engine::config::TierKey;
use leaf_engine::payback::InstallCostInput;
use leaf_engine::snapshot::SnapshotIntake;
use leaf_engine::waste::ExistingSystemCondition;

/// One intake job as exported from the admin tool.
#[derive(Debug, Clone, Deserialize)]
pub struct IntakeRecord {
    pub job_id: String,
    pub customer: String,
    pub state: String,
    pub zip: String,
    pub system_id: String,
    pub age_years: f64,
    pub wear: f64,
    pub expected_life_years: f64,
    #[serde(deserialize_with = "deserialize_bool")]
    pub partial_failure: bool,
    pub annual_utility_spend: f64,
    pub system_share: f64,
    /// Recommended tier, if the admin has picked one.
    #[serde(deserialize_with = "deserialize_optional_string")]
    pub tier: Option<String>,
    pub install_cost_min: Option<f64>,
    pub install_cost_max: Option<f64>,
    pub quoted_price: Option<f64>,
}

impl IntakeRecord {
    /// The record's own tier, parsed. `None` when no recommendation yet.
    pub fn tier_key(&self) -> Option<TierKey> {
        self.tier.as_deref().and_then(|t| t.parse().ok())
    }

    /// Build the engine intake, falling back to `default_tier` when the
    /// record carries no recommendation.
    pub fn to_snapshot_intake(&self, default_tier: TierKey) -> SnapshotIntake {
        SnapshotIntake {
            condition: ExistingSystemCondition {
                age_years: self.age_years,
                wear: self.wear,
                expected_life_years: self.expected_life_years,
                partial_failure: self.partial_failure,
                annual_utility_spend: self.annual_utility_spend,
                system_share: self.system_share,
            },
            tier: self.tier_key().unwrap_or(default_tier),
            install_cost: InstallCostInput {
                min: self.install_cost_min,
                max: self.install_cost_max,
            },
            quoted_price: self.quoted_price,
        }
    }

}

/// Load intake records from a CSV reader, validating tiers as they parse.
pub fn load_intake<R: Read>(reader: R) -> Result<Vec<IntakeRecord>, String> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for (line_num, result) in csv_reader.deserialize().enumerate() {
        let record: IntakeRecord = result
            .map_err(|e| format!("CSV parse error at line {}: {}", line_num + 2, e))?;
        if let Some(raw) = record.tier.as_deref() {
            raw.parse::<TierKey>().map_err(|e| {
                format!("CSV parse error at line {}: {}", line_num + 2, e)
            })?;
        }
        records.push(record);
    }

    Ok(records)
}

/// Load intake records from a CSV file path.
pub fn load_intake_file(path: &str) -> Result<Vec<IntakeRecord>, String> {
    let file = std::fs::File::open(path)
        .map_err(|e| format!("Failed to open '{}': {}", path, e))?;
    load_intake(file)
}

/// Group records by state, states sorted.
pub fn group_by_state(records: &[IntakeRecord]) -> Vec<(String, Vec<IntakeRecord>)> {
    let mut groups: std::collections::HashMap<String, Vec<IntakeRecord>> =
        std::collections::HashMap::new();
    for record in records {
        groups
            .entry(record.state.clone())
            .or_default()
            .push(record.clone());
    }
    let mut result: Vec<_> = groups.into_iter().collect();
    result.sort_by(|a, b| a.0.cmp(&b.0));
    result
}

/// Flexible bool deserializer: handles "true"/"false", "1"/"0", "yes"/"no".
fn deserialize_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    match s.to_lowercase().trim() {
        "true" | "1" | "yes" | "y" => Ok(true),
        "false" | "0" | "no" | "n" | "" => Ok(false),
        other => Err(serde::de::Error::custom(format!(
            "expected bool value, got '{}'",
            other
        ))),
    }
}

/// Empty CSV cells become `None` rather than `Some("")`.
fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    let trimmed = s.trim();
    if trimmed.is_empty() {
        Ok(None)
    } else {
        Ok(Some(trimmed.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CSV: &str = "\
job_id,customer,state,zip,system_id,age_years,wear,expected_life_years,partial_failure,annual_utility_spend,system_share,tier,install_cost_min,install_cost_max,quoted_price
JOB-1001,Alvarez,OR,97206,hp-3t-split,18,3,20,false,2400,0.4,better,4800,5800,
JOB-1002,Nguyen,WA,98103,hp-3t-split,22,4,18,true,3100,0.45,best,7200,8400,7900
JOB-1003,Okafor,OR,97211,gas-furnace-80,9,1,20,false,1800,0.35,,,,
";

    #[test]
    fn load_sample_csv() {
        let records = load_intake(SAMPLE_CSV.as_bytes()).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].job_id, "JOB-1001");
        assert_eq!(records[0].tier_key(), Some(TierKey::Better));
        assert!(records[1].partial_failure);
        assert_eq!(records[1].quoted_price, Some(7900.0));
        // empty tier and cost columns
        assert_eq!(records[2].tier_key(), None);
        assert_eq!(records[2].install_cost_min, None);
        assert_eq!(records[2].quoted_price, None);
    }

    #[test]
    fn unknown_tier_is_a_load_error() {
        let csv_data = "\
job_id,customer,state,zip,system_id,age_years,wear,expected_life_years,partial_failure,annual_utility_spend,system_share,tier,install_cost_min,install_cost_max,quoted_price
JOB-1,X,OR,97206,hp,10,2,20,false,2000,0.4,platinum,,,
";
        let err = load_intake(csv_data.as_bytes()).unwrap_err();
        assert!(err.contains("line 2"), "unexpected error: {}", err);
        assert!(err.contains("platinum"), "unexpected error: {}", err);
    }

    #[test]
    fn to_snapshot_intake_falls_back_to_default_tier() {
        let records = load_intake(SAMPLE_CSV.as_bytes()).unwrap();
        let intake = records[2].to_snapshot_intake(TierKey::Good);
        assert_eq!(intake.tier, TierKey::Good);
        // a record with its own tier keeps it
        let intake = records[1].to_snapshot_intake(TierKey::Good);
        assert_eq!(intake.tier, TierKey::Best);
    }

    #[test]
    fn group_records_by_state() {
        let records = load_intake(SAMPLE_CSV.as_bytes()).unwrap();
        let groups = group_by_state(&records);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "OR");
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].0, "WA");
    }

    #[test]
    fn bool_parsing_handles_variants() {
        let csv_data = "\
job_id,customer,state,zip,system_id,age_years,wear,expected_life_years,partial_failure,annual_utility_spend,system_share,tier,install_cost_min,install_cost_max,quoted_price
J1,A,OR,97206,hp,10,2,20,1,2000,0.4,good,,,
J2,B,OR,97206,hp,10,2,20,yes,2000,0.4,good,,,
J3,C,OR,97206,hp,10,2,20,TRUE,2000,0.4,good,,,
";
        let records = load_intake(csv_data.as_bytes()).unwrap();
        assert!(records.iter().all(|r| r.partial_failure));
    }
}
