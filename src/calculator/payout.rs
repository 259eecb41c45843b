use crate::calculator::PayoutCalculation;
use crate::plan::{SubscriptionPlan, Tier};

/// One billing period's payout per tier, at the raw (not annualized) price.
pub fn payout_breakdown(
    plan: &SubscriptionPlan,
    yearly_users: u64,
    monthly_users: u64,
    weekly_users: u64,
) -> PayoutCalculation {
    PayoutCalculation {
        total_users: yearly_users
            .saturating_add(monthly_users)
            .saturating_add(weekly_users),
        yearly_payout: yearly_users as f64 * plan.price(Tier::Yearly),
        monthly_payout: monthly_users as f64 * plan.price(Tier::Monthly),
        weekly_payout: weekly_users as f64 * plan.price(Tier::Weekly),
        yearly_users,
        monthly_users,
        weekly_users,
    }
}

pub fn annual_revenue(
    plan: &SubscriptionPlan,
    yearly_users: u64,
    monthly_users: u64,
    weekly_users: u64,
) -> f64 {
    yearly_users as f64 * plan.annualized_price(Tier::Yearly)
        + monthly_users as f64 * plan.annualized_price(Tier::Monthly)
        + weekly_users as f64 * plan.annualized_price(Tier::Weekly)
}
