//! Customer-facing snapshot rendering.
//!
//! The admin surface never formats engine numbers itself; it shows the
//! customer this text block. Concise, structured, no raw fractions.

use leaf_engine::incentives::GroupedIncentives;
use leaf_engine::snapshot::SavingsSnapshot;

/// Format a dollar amount with comma thousands separators, no cents.
fn format_dollars(amount: f64) -> String {
    let whole = amount.abs().round() as u64;
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

fn incentive_lines(lines: &mut Vec<String>, grouped: &GroupedIncentives) {
    for entry in grouped
        .federal
        .iter()
        .chain(grouped.state.iter())
        .chain(grouped.local.iter())
    {
        lines.push(format!(
            "  [{}] {}: ${}",
            entry.level,
            entry.name,
            format_dollars(entry.amount)
        ));
    }
}

/// Render the text block the contractor shows the customer.
pub fn render_snapshot_summary(
    snapshot: &SavingsSnapshot,
    incentives: Option<&GroupedIncentives>,
) -> String {
    let mut lines = Vec::new();

    lines.push(format!(
        "Savings snapshot ({} package)",
        capitalize(snapshot.tier.as_str())
    ));

    let monthly = &snapshot.monthly_savings;
    let annual = &snapshot.annual_savings;
    lines.push(format!(
        "Estimated savings: ${}-${} per month (${}-${} per year)",
        format_dollars(monthly.min),
        format_dollars(monthly.max),
        format_dollars(annual.min),
        format_dollars(annual.max)
    ));

    // All-zero payback means no install cost was captured, not "free".
    if snapshot.payback_years.is_zero() {
        lines.push("Payback: available once install cost estimates are entered".into());
    } else {
        lines.push(format!(
            "Typical payback: {:.1}-{:.1} years",
            snapshot.payback_years.min, snapshot.payback_years.max
        ));
    }

    if let Some(class) = snapshot.cost_class {
        lines.push(format!("Price check: {}", class));
    }
    if let Some(adjusted) = snapshot.adjusted_monthly_savings {
        lines.push(format!(
            "Savings at this price: ${}-${} per month",
            format_dollars(adjusted.min),
            format_dollars(adjusted.max)
        ));
    }

    match incentives {
        Some(grouped) if !grouped.is_empty() => {
            lines.push("Incentives you may qualify for:".into());
            incentive_lines(&mut lines, grouped);
            lines.push(format!(
                "Total incentives: ${}",
                format_dollars(grouped.total())
            ));
        }
        _ => {}
    }

    lines.join("\n")
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
