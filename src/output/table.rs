use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Row, Table};

use crate::calculator::{GoalReport, OptimalMix, PayoutCalculation, RevenueBreakdown};
use crate::format::{format_currency, format_number_with_commas, format_percent};
use crate::plan::{PerTier, PlanComparison, SubscriptionPlan, Tier};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn count_cell(value: f64) -> Cell {
    let cell = Cell::new(format_number_with_commas(value));
    if value.is_finite() {
        cell
    } else {
        cell.fg(Color::Red)
    }
}

fn price_label(plan: &SubscriptionPlan, tier: Tier) -> String {
    format!(
        "{}/{}",
        format_currency(plan.price(tier), 2),
        tier.period_label()
    )
}

pub fn render_breakdown_table(breakdown: &RevenueBreakdown, tiers: &[Tier]) -> String {
    let mut table = new_table();
    table.set_header(vec![
        "Tier",
        "Users Needed",
        "Total Revenue",
        "Revenue / User / Year",
    ]);
    for &tier in tiers {
        let row = breakdown.get(tier);
        table.add_row(Row::from(vec![
            Cell::new(tier.to_string()),
            count_cell(row.users_needed),
            Cell::new(format_currency(row.total_revenue, 2)),
            Cell::new(format_currency(row.revenue_per_user, 2)),
        ]));
    }
    table.to_string()
}

pub fn render_visitors_table(
    visitors: &PerTier<f64>,
    tiers: &[Tier],
    conversion_rate_pct: f64,
) -> String {
    let mut table = new_table();
    table.set_header(vec![
        "Tier".to_string(),
        format!("Visitors Needed @ {}", format_percent(conversion_rate_pct)),
    ]);
    for &tier in tiers {
        table.add_row(Row::from(vec![
            Cell::new(tier.to_string()),
            count_cell(*visitors.get(tier)),
        ]));
    }
    table.to_string()
}

pub fn render_report_table(report: &GoalReport) -> String {
    let mut table = new_table();
    table.set_header(vec![
        "Tier",
        "Price",
        "Revenue / User / Year",
        "Users Needed",
        "Visitors Needed",
        "Total Revenue",
    ]);
    for (tier, row) in report.breakdown.iter() {
        let tier_cell = if tier == report.mix.recommended {
            Cell::new(format!("{tier} *")).fg(Color::Green)
        } else {
            Cell::new(tier.to_string())
        };
        table.add_row(Row::from(vec![
            tier_cell,
            Cell::new(price_label(&report.plan, tier)),
            Cell::new(format_currency(row.revenue_per_user, 2)),
            count_cell(row.users_needed),
            count_cell(*report.visitors_needed.get(tier)),
            Cell::new(format_currency(row.total_revenue, 0)),
        ]));
    }

    let mut out = String::new();
    out.push_str(&table.to_string());
    out.push_str(&format!(
        "\nPlan: {}\nRevenue goal: {}\nConversion rate: {}\nRecommendation: {}",
        report.plan.name,
        format_currency(report.revenue_goal, 0),
        format_percent(report.conversion_rate_pct),
        report.mix.recommendation
    ));
    out
}

pub fn render_mix_table(mix: &OptimalMix) -> String {
    let mut table = new_table();
    table.set_header(vec![
        "Rank",
        "Tier",
        "Revenue / User / Year",
        "Users Needed",
    ]);
    for (idx, tier) in mix.ranking.iter().enumerate() {
        table.add_row(vec![
            (idx + 1).to_string(),
            tier.to_string(),
            format_currency(*mix.efficiency.get(*tier), 2),
            format_number_with_commas(mix.breakdown.get(*tier).users_needed),
        ]);
    }
    format!("{table}\nRecommendation: {}", mix.recommendation)
}

pub fn render_payout_table(
    plan: &SubscriptionPlan,
    payout: &PayoutCalculation,
    annual_revenue: f64,
) -> String {
    let mut table = new_table();
    table.set_header(vec!["Tier", "Subscribers", "Price", "Payout"]);
    let rows = [
        (Tier::Yearly, payout.yearly_users, payout.yearly_payout),
        (Tier::Monthly, payout.monthly_users, payout.monthly_payout),
        (Tier::Weekly, payout.weekly_users, payout.weekly_payout),
    ];
    for (tier, users, amount) in rows {
        table.add_row(vec![
            tier.to_string(),
            format_number_with_commas(users as f64),
            price_label(plan, tier),
            format_currency(amount, 2),
        ]);
    }
    table.add_row(vec![
        "Total".to_string(),
        format_number_with_commas(payout.total_users as f64),
        String::new(),
        format_currency(payout.total_payout(), 2),
    ]);
    format!(
        "{table}\nTotal annual revenue: {}",
        format_currency(annual_revenue, 2)
    )
}

pub fn render_comparison_table(plan: &SubscriptionPlan, comparison: &PlanComparison) -> String {
    let mut table = new_table();
    table.set_header(vec!["Tier", "Price", "Per Year", "Note"]);
    table.add_row(vec![
        "Yearly".to_string(),
        price_label(plan, Tier::Yearly),
        format_currency(comparison.yearly_price, 2),
        format!(
            "~{}/month, {} cheaper than monthly",
            format_currency(comparison.yearly_monthly_equivalent, 2),
            format_percent(comparison.yearly_discount_pct)
        ),
    ]);
    table.add_row(vec![
        "Monthly".to_string(),
        price_label(plan, Tier::Monthly),
        format_currency(comparison.monthly_annual, 2),
        String::new(),
    ]);
    table.add_row(vec![
        "Weekly".to_string(),
        price_label(plan, Tier::Weekly),
        format_currency(comparison.weekly_annual, 2),
        format!(
            "{} more than yearly",
            format_percent(comparison.weekly_premium_pct)
        ),
    ]);
    table.to_string()
}
