use std::cmp::Ordering;

use crate::calculator::breakdown::revenue_breakdown;
use crate::calculator::{Efficiency, OptimalMix};
use crate::plan::{SubscriptionPlan, Tier};

/// Orders tiers by annualized revenue per user, highest first. Ties keep
/// [`Tier::ALL`] order, so yearly beats both others and monthly beats weekly.
/// Comparison is IEEE equality, so `-0.0` ties with `0.0`.
pub fn rank_tiers(efficiency: &Efficiency) -> [Tier; 3] {
    let mut ranking = Tier::ALL;
    ranking.sort_by(|a, b| {
        efficiency
            .get(*b)
            .partial_cmp(efficiency.get(*a))
            .unwrap_or(Ordering::Equal)
    });
    ranking
}

pub fn recommendation_for(tier: Tier) -> &'static str {
    match tier {
        Tier::Yearly => "Focus on yearly subscriptions for maximum revenue per user",
        Tier::Monthly => "Focus on monthly subscriptions for balanced growth",
        Tier::Weekly => "Focus on weekly subscriptions for quick user acquisition",
    }
}

/// Recommends the tier with the highest revenue per user. This is a ranking,
/// not a search for the fewest users or the fastest route to the goal.
pub fn optimal_mix(plan: &SubscriptionPlan, revenue_goal: f64) -> OptimalMix {
    let breakdown = revenue_breakdown(plan, revenue_goal);
    let efficiency = plan.annualized_prices();
    let ranking = rank_tiers(&efficiency);
    let recommended = ranking[0];

    OptimalMix {
        recommendation: recommendation_for(recommended).to_string(),
        recommended,
        ranking,
        breakdown,
        efficiency,
    }
}
