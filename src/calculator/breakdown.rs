use tracing::debug;

use crate::calculator::{RevenueBreakdown, TierBreakdown};
use crate::plan::{PerTier, SubscriptionPlan, Tier};

pub fn tier_breakdown(plan: &SubscriptionPlan, tier: Tier, revenue_goal: f64) -> TierBreakdown {
    let revenue_per_user = plan.annualized_price(tier);
    let users_needed = (revenue_goal / revenue_per_user).ceil();
    if !users_needed.is_finite() {
        debug!("{tier} tier cannot reach a goal of {revenue_goal} at price {revenue_per_user}");
    }
    TierBreakdown {
        users_needed,
        total_revenue: users_needed * revenue_per_user,
        revenue_per_user,
    }
}

pub fn revenue_breakdown(plan: &SubscriptionPlan, revenue_goal: f64) -> RevenueBreakdown {
    PerTier::from_fn(|tier| tier_breakdown(plan, tier, revenue_goal))
}

/// Visitors required per tier when only `conversion_rate_pct` percent of them pay.
pub fn users_needed_with_conversion(
    plan: &SubscriptionPlan,
    revenue_goal: f64,
    conversion_rate_pct: f64,
) -> PerTier<f64> {
    let multiplier = 100.0 / conversion_rate_pct;
    revenue_breakdown(plan, revenue_goal).map(|row| (row.users_needed * multiplier).ceil())
}

#[cfg(test)]
mod tests {
    use crate::calculator::breakdown::{revenue_breakdown, users_needed_with_conversion};
    use crate::plan::{SubscriptionPlan, Tier};

    fn plan() -> SubscriptionPlan {
        SubscriptionPlan::new("Pro", 99.0, 12.0, 3.0)
    }

    #[test]
    fn computes_users_needed_per_tier() {
        let breakdown = revenue_breakdown(&plan(), 100_000.0);
        assert_eq!(breakdown.yearly.users_needed, 1011.0);
        assert_eq!(breakdown.monthly.users_needed, 695.0);
        // 100000 / 156 = 641.03
        assert_eq!(breakdown.weekly.users_needed, 642.0);

        assert_eq!(breakdown.yearly.total_revenue, 1011.0 * 99.0);
        assert_eq!(breakdown.monthly.revenue_per_user, 144.0);
        assert_eq!(breakdown.weekly.revenue_per_user, 156.0);
    }

    #[test]
    fn yearly_users_match_plain_ceiling() {
        let plans = [
            SubscriptionPlan::new("a", 99.0, 12.0, 3.0),
            SubscriptionPlan::new("b", 49.5, 4.99, 1.25),
            SubscriptionPlan::new("c", 1.0, 1.0, 1.0),
        ];
        for plan in &plans {
            for goal in [0.0, 1.0, 99.0, 12_345.67, 1_000_000.0] {
                let breakdown = revenue_breakdown(plan, goal);
                assert_eq!(breakdown.yearly.users_needed, (goal / plan.yearly_price).ceil());
            }
        }
    }

    #[test]
    fn total_revenue_covers_goal() {
        let breakdown = revenue_breakdown(&plan(), 250_000.0);
        for (_, row) in breakdown.iter() {
            assert!(row.total_revenue >= 250_000.0);
            assert!(row.total_revenue - row.revenue_per_user < 250_000.0);
        }
    }

    #[test]
    fn larger_goals_never_need_fewer_users() {
        let plan = SubscriptionPlan::new("Pro", 79.99, 9.99, 2.49);
        let mut previous = revenue_breakdown(&plan, 0.0);
        let mut goal = 0.0;
        while goal < 50_000.0 {
            goal += 137.5;
            let current = revenue_breakdown(&plan, goal);
            for ((_, before), (_, after)) in previous.iter().zip(current.iter()) {
                assert!(after.users_needed >= before.users_needed);
            }
            previous = current;
        }
    }

    #[test]
    fn repeated_calls_are_identical() {
        let first = revenue_breakdown(&plan(), 42_000.0);
        let second = revenue_breakdown(&plan(), 42_000.0);
        assert_eq!(first, second);
    }

    #[test]
    fn zero_price_only_affects_its_own_tier() {
        let plan = SubscriptionPlan::new("Pro", 0.0, 12.0, 3.0);
        let breakdown = revenue_breakdown(&plan, 100_000.0);
        assert!(!breakdown.yearly.users_needed.is_finite());
        assert!(!breakdown.yearly.is_reachable());
        assert!(breakdown.monthly.is_reachable());
        assert!(breakdown.weekly.is_reachable());
        assert_eq!(breakdown.unreachable_tiers(), vec![Tier::Yearly]);
    }

    #[test]
    fn zero_goal_on_zero_price_is_not_a_number() {
        let plan = SubscriptionPlan::new("Pro", 0.0, 12.0, 3.0);
        let breakdown = revenue_breakdown(&plan, 0.0);
        assert!(breakdown.yearly.users_needed.is_nan());
        assert_eq!(breakdown.monthly.users_needed, 0.0);
    }

    #[test]
    fn conversion_rate_scales_users_into_visitors() {
        let visitors = users_needed_with_conversion(&plan(), 100_000.0, 5.0);
        assert_eq!(visitors.yearly, 1011.0 * 20.0);
        assert_eq!(visitors.monthly, 695.0 * 20.0);
        assert_eq!(visitors.weekly, 642.0 * 20.0);
    }

    #[test]
    fn fractional_multiplier_rounds_up() {
        // 100 / 3 = 33.33..; 1011 * 33.33.. = 33700
        let visitors = users_needed_with_conversion(&plan(), 100_000.0, 3.0);
        assert_eq!(visitors.yearly, (1011.0 * (100.0 / 3.0_f64)).ceil());
        let full = users_needed_with_conversion(&plan(), 100_000.0, 100.0);
        assert_eq!(full.monthly, 695.0);
    }

    #[test]
    fn zero_conversion_rate_is_unreachable() {
        let visitors = users_needed_with_conversion(&plan(), 100_000.0, 0.0);
        assert!(visitors.yearly.is_infinite());
        assert!(visitors.monthly.is_infinite());
        assert!(visitors.weekly.is_infinite());
    }
}
