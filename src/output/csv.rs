use anyhow::Result;

use crate::calculator::{GoalReport, OptimalMix, PayoutCalculation, RevenueBreakdown};
use crate::plan::{PerTier, PlanComparison, SubscriptionPlan, Tier};

fn number_field(value: f64) -> String {
    if value.is_finite() {
        format!("{value}")
    } else {
        String::new()
    }
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

pub fn breakdown_to_csv(breakdown: &RevenueBreakdown, tiers: &[Tier]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["tier", "users_needed", "total_revenue", "revenue_per_user"])?;
    for &tier in tiers {
        let row = breakdown.get(tier);
        writer.write_record([
            tier.as_slug().to_string(),
            number_field(row.users_needed),
            number_field(row.total_revenue),
            number_field(row.revenue_per_user),
        ])?;
    }
    finish(writer)
}

pub fn visitors_to_csv(visitors: &PerTier<f64>, tiers: &[Tier]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["tier", "visitors_needed"])?;
    for &tier in tiers {
        writer.write_record([tier.as_slug().to_string(), number_field(*visitors.get(tier))])?;
    }
    finish(writer)
}

pub fn report_to_csv(report: &GoalReport) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "tier",
        "price",
        "annualized_price",
        "users_needed",
        "visitors_needed",
        "total_revenue",
        "recommended",
    ])?;
    for (tier, row) in report.breakdown.iter() {
        writer.write_record([
            tier.as_slug().to_string(),
            number_field(report.plan.price(tier)),
            number_field(row.revenue_per_user),
            number_field(row.users_needed),
            number_field(*report.visitors_needed.get(tier)),
            number_field(row.total_revenue),
            (report.mix.recommended == tier).to_string(),
        ])?;
    }
    finish(writer)
}

pub fn mix_to_csv(mix: &OptimalMix) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["rank", "tier", "revenue_per_user", "users_needed"])?;
    for (idx, tier) in mix.ranking.iter().enumerate() {
        writer.write_record([
            (idx + 1).to_string(),
            tier.as_slug().to_string(),
            number_field(*mix.efficiency.get(*tier)),
            number_field(mix.breakdown.get(*tier).users_needed),
        ])?;
    }
    finish(writer)
}

pub fn payout_to_csv(
    plan: &SubscriptionPlan,
    payout: &PayoutCalculation,
    annual_revenue: f64,
) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["tier", "users", "price", "payout"])?;
    let rows = [
        (Tier::Yearly, payout.yearly_users, payout.yearly_payout),
        (Tier::Monthly, payout.monthly_users, payout.monthly_payout),
        (Tier::Weekly, payout.weekly_users, payout.weekly_payout),
    ];
    for (tier, users, amount) in rows {
        writer.write_record([
            tier.as_slug().to_string(),
            users.to_string(),
            number_field(plan.price(tier)),
            number_field(amount),
        ])?;
    }
    writer.write_record([
        "total".to_string(),
        payout.total_users.to_string(),
        String::new(),
        number_field(payout.total_payout()),
    ])?;
    writer.write_record([
        "annual_revenue".to_string(),
        String::new(),
        String::new(),
        number_field(annual_revenue),
    ])?;
    finish(writer)
}

/// One row per metric; percentages are left empty when the tier they compare against is free.
pub fn comparison_to_csv(comparison: &PlanComparison) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["metric", "value"])?;
    let rows = [
        ("yearly_price", comparison.yearly_price),
        ("monthly_annual", comparison.monthly_annual),
        ("weekly_annual", comparison.weekly_annual),
        ("yearly_monthly_equivalent", comparison.yearly_monthly_equivalent),
        ("yearly_discount_pct", comparison.yearly_discount_pct),
        ("weekly_premium_pct", comparison.weekly_premium_pct),
    ];
    for (metric, value) in rows {
        writer.write_record([metric.to_string(), number_field(value)])?;
    }
    finish(writer)
}

#[cfg(test)]
mod tests {
    use crate::calculator::breakdown::{revenue_breakdown, users_needed_with_conversion};
    use crate::calculator::payout::{annual_revenue, payout_breakdown};
    use crate::output::csv::{breakdown_to_csv, comparison_to_csv, payout_to_csv, visitors_to_csv};
    use crate::plan::{compare_plan, SubscriptionPlan, Tier};

    #[test]
    fn breakdown_csv_leaves_unreachable_cells_empty() {
        let plan = SubscriptionPlan::new("Pro", 0.0, 12.0, 3.0);
        let csv = breakdown_to_csv(&revenue_breakdown(&plan, 100_000.0), &Tier::ALL).expect("csv");
        let lines = csv.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "tier,users_needed,total_revenue,revenue_per_user");
        assert_eq!(lines[1], "yearly,,,0");
        assert_eq!(lines[2], "monthly,695,100080,144");
    }

    #[test]
    fn payout_csv_includes_totals() {
        let plan = SubscriptionPlan::default();
        let payout = payout_breakdown(&plan, 10, 20, 30);
        let csv = payout_to_csv(&plan, &payout, annual_revenue(&plan, 10, 20, 30)).expect("csv");
        assert!(csv.contains("yearly,10,99,990\n"));
        assert!(csv.contains("total,60,,1320\n"));
        assert!(csv.contains("annual_revenue,,,8550\n"));
    }

    #[test]
    fn tier_filter_keeps_only_the_selected_rows() {
        let plan = SubscriptionPlan::default();
        let breakdown = revenue_breakdown(&plan, 100_000.0);
        let csv = breakdown_to_csv(&breakdown, &Tier::selection(Some(Tier::Weekly))).expect("csv");
        assert_eq!(
            csv,
            "tier,users_needed,total_revenue,revenue_per_user\nweekly,642,100152,156\n"
        );

        let visitors = users_needed_with_conversion(&plan, 100_000.0, 5.0);
        let csv = visitors_to_csv(&visitors, &[Tier::Monthly]).expect("csv");
        assert_eq!(csv, "tier,visitors_needed\nmonthly,13900\n");
    }

    #[test]
    fn comparison_csv_lists_each_metric() {
        let comparison = compare_plan(&SubscriptionPlan::default());
        let csv = comparison_to_csv(&comparison).expect("csv");
        let lines = csv.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "metric,value");
        assert_eq!(lines[1], "yearly_price,99");
        assert_eq!(lines[2], "monthly_annual,144");
        assert_eq!(lines[3], "weekly_annual,156");
        assert_eq!(lines[4], "yearly_monthly_equivalent,8.25");
        assert_eq!(lines[5], "yearly_discount_pct,31.25");
        assert!(lines[6].starts_with("weekly_premium_pct,57.57"));
    }

    #[test]
    fn comparison_csv_blanks_non_finite_percentages() {
        let comparison = compare_plan(&SubscriptionPlan::new("Odd", 0.0, 12.0, 3.0));
        let csv = comparison_to_csv(&comparison).expect("csv");
        assert!(csv.ends_with("weekly_premium_pct,\n"));
    }
}
