use crate::calculator::breakdown::{revenue_breakdown, users_needed_with_conversion};
use crate::calculator::mix::optimal_mix;
use crate::calculator::GoalReport;
use crate::plan::SubscriptionPlan;

pub fn goal_report(
    plan: &SubscriptionPlan,
    revenue_goal: f64,
    conversion_rate_pct: f64,
) -> GoalReport {
    GoalReport {
        plan: plan.clone(),
        revenue_goal,
        conversion_rate_pct,
        breakdown: revenue_breakdown(plan, revenue_goal),
        visitors_needed: users_needed_with_conversion(plan, revenue_goal, conversion_rate_pct),
        mix: optimal_mix(plan, revenue_goal),
    }
}

#[cfg(test)]
mod tests {
    use crate::calculator::report::goal_report;
    use crate::plan::{SubscriptionPlan, Tier};

    #[test]
    fn report_combines_breakdown_visitors_and_mix() {
        let report = goal_report(&SubscriptionPlan::default(), 100_000.0, 5.0);
        assert_eq!(report.breakdown.monthly.users_needed, 695.0);
        assert_eq!(report.visitors_needed.monthly, 13_900.0);
        assert_eq!(report.mix.breakdown, report.breakdown);
        assert!(report.unreachable_tiers().is_empty());
    }

    #[test]
    fn report_lists_unreachable_tiers() {
        let plan = SubscriptionPlan::new("Pro", 99.0, 0.0, 3.0);
        let report = goal_report(&plan, 100_000.0, 5.0);
        assert_eq!(report.unreachable_tiers(), vec![Tier::Monthly]);

        let report = goal_report(&SubscriptionPlan::default(), 100_000.0, 0.0);
        assert_eq!(report.unreachable_tiers(), Tier::ALL.to_vec());
    }
}
