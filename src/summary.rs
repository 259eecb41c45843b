use std::fmt::Write;

use crate::calculator::GoalReport;
use crate::format::{format_currency, format_number_with_commas, format_percent};
use crate::plan::Tier;

/// Plain-text summary of a report, suitable for pasting into a message or doc.
pub fn compose_summary(report: &GoalReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Revenue plan: {}", report.plan.name);
    let _ = writeln!(
        out,
        "Annual revenue goal: {}",
        format_currency(report.revenue_goal, 0)
    );
    let _ = writeln!(
        out,
        "Conversion rate: {}",
        format_percent(report.conversion_rate_pct)
    );
    out.push('\n');

    for (tier, row) in report.breakdown.iter() {
        let price = report.plan.price(tier);
        let price_label = if tier == Tier::Yearly {
            format!("{}/year", format_currency(price, 2))
        } else {
            format!(
                "{}/{}, {}/year",
                format_currency(price, 2),
                tier.period_label(),
                format_currency(row.revenue_per_user, 2)
            )
        };
        let _ = writeln!(out, "{tier} plan ({price_label})");
        let _ = writeln!(
            out,
            "  Paying users needed: {}",
            format_number_with_commas(row.users_needed)
        );
        let _ = writeln!(
            out,
            "  Visitors needed: {}",
            format_number_with_commas(*report.visitors_needed.get(tier))
        );
        let _ = writeln!(
            out,
            "  Total revenue: {}",
            format_currency(row.total_revenue, 0)
        );
    }

    out.push('\n');
    let _ = write!(out, "Recommendation: {}", report.mix.recommendation);
    out
}
