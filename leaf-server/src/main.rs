use std::env;
use std::process;
use std::time::Instant;

use chrono::Utc;
use serde::Serialize;

use leaf_engine::config::{EngineConfig, TierKey};
use leaf_pipeline::candidate_pipeline::CandidatePipeline;
use leaf_pipeline::catalog_loader::load_catalog_file;
use leaf_pipeline::intake_loader::{load_intake_file, IntakeRecord};
use leaf_pipeline::pipelines::prospect_digest::ProspectDigestPipeline;
use leaf_pipeline::types::{AdvisorRole, ProspectCandidate, ProspectQuery};

// ---------------------------------------------------------------------------
// JSON output contract
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct DigestJson {
    generated_at: String,
    state_filter: Vec<String>,
    pipeline_ms: u128,
    prospects: Vec<ProspectJson>,
    summary: SummaryJson,
}

#[derive(Serialize)]
struct ProspectJson {
    job_id: String,
    customer: String,
    state: String,
    zip: String,
    tier: String,
    current_waste: f64,
    recoverable_waste: f64,
    annual_savings: leaf_engine::range::Range,
    monthly_savings: leaf_engine::range::Range,
    payback_years: leaf_engine::range::Range,
    priority_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    quoted_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cost_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    adjusted_monthly_savings: Option<leaf_engine::range::Range>,
    incentive_total: f64,
    incentives: Vec<IncentiveJson>,
    context: String,
    computed_at: String,
}

#[derive(Serialize)]
struct IncentiveJson {
    id: String,
    name: String,
    level: String,
    amount: f64,
}

#[derive(Serialize)]
struct SummaryJson {
    total_prospects: usize,
    combined_monthly_savings: f64,
    combined_incentive_total: f64,
    states_covered: usize,
    jobs_processed: usize,
    jobs_computed: usize,
    jobs_filtered_out: usize,
}

/// Generate a human-readable context string for a prospect.
fn generate_context(candidate: &ProspectCandidate) -> String {
    let mut parts = Vec::new();

    parts.push(format!(
        "Projected ${:.0}/mo savings on the {} package",
        candidate.monthly_savings.center, candidate.tier
    ));

    if candidate.payback_years.is_zero() {
        parts.push("no install cost captured yet".into());
    } else {
        parts.push(format!(
            "payback {:.1}-{:.1} years",
            candidate.payback_years.min, candidate.payback_years.max
        ));
    }

    if let Some(class) = candidate.cost_class {
        parts.push(format!("quoted price is {}", class));
    }

    if candidate.incentive_total > 0.0 {
        parts.push(format!(
            "${} in incentives",
            format_dollars(candidate.incentive_total)
        ));
    }

    parts.join(". ") + "."
}

fn build_json(
    result: &leaf_pipeline::candidate_pipeline::PipelineResult<ProspectQuery, ProspectCandidate>,
    state_filter: &[String],
    total_records: usize,
    pipeline_ms: u128,
) -> DigestJson {
    let mut states_covered: Vec<&str> = result
        .selected_candidates
        .iter()
        .map(|c| c.state.as_str())
        .collect();
    states_covered.sort();
    states_covered.dedup();

    let combined_monthly: f64 = result
        .selected_candidates
        .iter()
        .map(|c| c.monthly_savings.center)
        .sum();
    let combined_incentives: f64 = result
        .selected_candidates
        .iter()
        .map(|c| c.incentive_total)
        .sum();

    DigestJson {
        generated_at: Utc::now().to_rfc3339(),
        state_filter: state_filter.to_vec(),
        pipeline_ms,
        prospects: result
            .selected_candidates
            .iter()
            .map(|c| ProspectJson {
                job_id: c.job_id.clone(),
                customer: c.customer.clone(),
                state: c.state.clone(),
                zip: c.zip.clone(),
                tier: c.tier.to_string(),
                current_waste: c.current_waste,
                recoverable_waste: c.recoverable_waste,
                annual_savings: c.annual_savings,
                monthly_savings: c.monthly_savings,
                payback_years: c.payback_years,
                priority_score: c.priority_score.unwrap_or(0.0),
                quoted_price: c.quoted_price,
                cost_class: c.cost_class.map(|cc| cc.to_string()),
                adjusted_monthly_savings: c.adjusted_monthly_savings,
                incentive_total: c.incentive_total,
                incentives: c
                    .incentives
                    .iter()
                    .map(|i| IncentiveJson {
                        id: i.id.clone(),
                        name: i.name.clone(),
                        level: i.level.to_string(),
                        amount: i.amount,
                    })
                    .collect(),
                context: generate_context(c),
                computed_at: c.computed_at.clone(),
            })
            .collect(),
        summary: SummaryJson {
            total_prospects: result.selected_candidates.len(),
            combined_monthly_savings: combined_monthly,
            combined_incentive_total: combined_incentives,
            states_covered: states_covered.len(),
            jobs_processed: total_records,
            jobs_computed: result.retrieved_candidates.len(),
            jobs_filtered_out: result.filtered_candidates.len(),
        },
    }
}

// ---------------------------------------------------------------------------
// Human-readable output
// ---------------------------------------------------------------------------

/// Format a number with comma thousands separators.
fn format_dollars(amount: f64) -> String {
    let whole = amount.abs() as u64;
    let sign = if amount < 0.0 { "-" } else { "" };

    if whole < 1_000 {
        return format!("{}{}", sign, whole);
    }

    let s = whole.to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    format!("{}{}", sign, result.chars().rev().collect::<String>())
}

fn print_human(
    result: &leaf_pipeline::candidate_pipeline::PipelineResult<ProspectQuery, ProspectCandidate>,
    state_filter: &[String],
    total_records: usize,
    load_ms: u128,
    pipeline_ms: u128,
) {
    println!();
    println!("  {:=<64}", "");
    println!("  LEAF \u{00b7} Prospect Digest");
    println!("  {:=<64}", "");
    println!();

    let combined_monthly: f64 = result
        .selected_candidates
        .iter()
        .map(|c| c.monthly_savings.center)
        .sum();
    let kept_count = result.retrieved_candidates.len() - result.filtered_candidates.len();
    println!(
        "  {} states \u{00b7} {} jobs in book \u{00b7} {} snapshots computed",
        state_filter.len(),
        total_records,
        result.retrieved_candidates.len()
    );
    println!(
        "  {} passed filters ({} removed) \u{00b7} Top {} selected \u{00b7} ${}/mo combined savings",
        kept_count,
        result.filtered_candidates.len(),
        result.selected_candidates.len(),
        format_dollars(combined_monthly)
    );
    println!();

    if result.selected_candidates.is_empty() {
        println!("  No prospects cleared the savings floor. Nothing to chase today.");
    } else {
        println!("  {:\u{2500}<64}", "");
        for (i, c) in result.selected_candidates.iter().enumerate() {
            let priority = c.priority_score.unwrap_or(0.0);
            let marker = match priority {
                p if p >= 8.0 => "!!",
                p if p >= 6.0 => "! ",
                _ => "  ",
            };

            println!(
                "  {} {}. {:10} {:3} {:7} {:>9}/mo  score {:.1}",
                marker,
                i + 1,
                c.job_id,
                c.state,
                c.tier.to_string(),
                format!("${}", format_dollars(c.monthly_savings.center)),
                priority,
            );
            println!("       {}", generate_context(c));
            println!();
        }
        println!("  {:\u{2500}<64}", "");
    }

    println!();
    println!(
        "  Data loaded in {}ms \u{00b7} Pipeline ran in {}ms \u{00b7} Total {}ms",
        load_ms,
        pipeline_ms,
        load_ms + pipeline_ms
    );
    println!();
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() {
    env_logger::init();
    let args: Vec<String> = env::args().collect();

    if args.len() < 3 {
        eprintln!("Usage: leaf-server <intake.csv> <catalog.json> [--states s1,s2,...] [--tier good|better|best] [--top N] [--json]");
        eprintln!();
        eprintln!("Options:");
        eprintln!("  --states   Comma-separated states to analyze (default: all in the book)");
        eprintln!("  --tier     Default tier for jobs without a recommendation (default: better)");
        eprintln!("  --top      Number of prospects to return (default: 5)");
        eprintln!("  --json     Output as JSON instead of formatted text");
        eprintln!();
        eprintln!("Example:");
        eprintln!("  leaf-server fixtures/sample_intake.csv fixtures/incentive_catalog.json");
        eprintln!("  leaf-server fixtures/sample_intake.csv fixtures/incentive_catalog.json --states OR,WA --top 3 --json");
        process::exit(1);
    }

    let csv_path = &args[1];
    let catalog_path = &args[2];

    // Parse optional flags
    let mut state_filter: Option<Vec<String>> = None;
    let mut default_tier: Option<TierKey> = None;
    let mut top_k: usize = 5;
    let mut json_output = false;
    let mut i = 3;
    while i < args.len() {
        match args[i].as_str() {
            "--states" => {
                if i + 1 < args.len() {
                    state_filter = Some(
                        args[i + 1]
                            .split(',')
                            .map(|s| s.trim().to_string())
                            .collect(),
                    );
                    i += 2;
                } else {
                    eprintln!("Error: --states requires a comma-separated list of states");
                    process::exit(1);
                }
            }
            "--tier" => {
                if i + 1 < args.len() {
                    match args[i + 1].parse::<TierKey>() {
                        Ok(tier) => default_tier = Some(tier),
                        Err(e) => {
                            eprintln!("Error: {}", e);
                            process::exit(1);
                        }
                    }
                    i += 2;
                } else {
                    eprintln!("Error: --tier requires good, better, or best");
                    process::exit(1);
                }
            }
            "--top" => {
                if i + 1 < args.len() {
                    top_k = args[i + 1].parse().unwrap_or_else(|_| {
                        eprintln!("Error: --top requires a positive integer");
                        process::exit(1);
                    });
                    i += 2;
                } else {
                    eprintln!("Error: --top requires a number");
                    process::exit(1);
                }
            }
            "--json" => {
                json_output = true;
                i += 1;
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                process::exit(1);
            }
        }
    }

    // Load the intake book and incentive catalog
    let load_start = Instant::now();
    let records: Vec<IntakeRecord> = match load_intake_file(csv_path) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error loading intake CSV: {}", e);
            process::exit(1);
        }
    };
    let catalog = match load_catalog_file(catalog_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading incentive catalog: {}", e);
            process::exit(1);
        }
    };
    let load_ms = load_start.elapsed().as_millis();

    let total_records = records.len();

    // Discover states present in the book
    let mut states: Vec<String> = records.iter().map(|r| r.state.clone()).collect();
    states.sort();
    states.dedup();

    let query_states: Vec<String> = if let Some(ref filter) = state_filter {
        states.iter().filter(|s| filter.contains(s)).cloned().collect()
    } else {
        states.clone()
    };

    if query_states.is_empty() {
        eprintln!("Error: no matching states found in the intake book");
        if let Some(ref filter) = state_filter {
            eprintln!("  Requested: {:?}", filter);
        }
        eprintln!("  Available: {:?}", states);
        process::exit(1);
    }

    // Build and run pipeline
    let pipeline_start = Instant::now();
    let pipeline = ProspectDigestPipeline::with_book_and_size(
        records,
        catalog,
        EngineConfig::default(),
        top_k,
    );

    let query = ProspectQuery {
        request_id: "digest-001".into(),
        user_id: "cli".into(),
        role: AdvisorRole::SalesManager,
        states: query_states.clone(),
        default_tier,
        as_of: Utc::now().to_rfc3339(),
        filters: None,
    };

    let result = pipeline.execute(query).await;
    let pipeline_ms = pipeline_start.elapsed().as_millis();

    if json_output {
        let digest = build_json(&result, &query_states, total_records, pipeline_ms);
        println!("{}", serde_json::to_string_pretty(&digest).unwrap());
    } else {
        print_human(&result, &query_states, total_records, load_ms, pipeline_ms);
    }
}
