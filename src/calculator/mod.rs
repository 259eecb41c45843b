//! Pure arithmetic between revenue goals, user counts and a [`SubscriptionPlan`].
//!
//! Nothing here clamps or validates. A zero price or a zero conversion rate
//! produces a non-finite value that is handed back to the caller, who is
//! expected to present it as an unreachable goal.

pub mod breakdown;
pub mod mix;
pub mod payout;
pub mod report;

use serde::{Deserialize, Serialize};

use crate::plan::{PerTier, SubscriptionPlan, Tier};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TierBreakdown {
    /// Integer-valued; `inf`/`NaN` when the tier's price is zero.
    pub users_needed: f64,
    pub total_revenue: f64,
    /// Annualized price of the tier.
    pub revenue_per_user: f64,
}

impl TierBreakdown {
    pub fn is_reachable(&self) -> bool {
        self.users_needed.is_finite()
    }
}

pub type RevenueBreakdown = PerTier<TierBreakdown>;

impl PerTier<TierBreakdown> {
    /// Tiers whose paying-user target is non-finite.
    pub fn unreachable_tiers(&self) -> Vec<Tier> {
        self.iter()
            .filter(|(_, row)| !row.is_reachable())
            .map(|(tier, _)| tier)
            .collect()
    }
}

/// Annualized revenue per user of each tier.
pub type Efficiency = PerTier<f64>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PayoutCalculation {
    pub total_users: u64,
    pub yearly_payout: f64,
    pub monthly_payout: f64,
    pub weekly_payout: f64,
    pub yearly_users: u64,
    pub monthly_users: u64,
    pub weekly_users: u64,
}

impl PayoutCalculation {
    pub fn total_payout(&self) -> f64 {
        self.yearly_payout + self.monthly_payout + self.weekly_payout
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OptimalMix {
    pub recommendation: String,
    pub recommended: Tier,
    /// Tiers by annualized revenue per user, best first.
    pub ranking: [Tier; 3],
    pub breakdown: RevenueBreakdown,
    pub efficiency: Efficiency,
}

impl OptimalMix {
    pub fn unreachable_tiers(&self) -> Vec<Tier> {
        self.breakdown.unreachable_tiers()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GoalReport {
    pub plan: SubscriptionPlan,
    pub revenue_goal: f64,
    pub conversion_rate_pct: f64,
    pub breakdown: RevenueBreakdown,
    pub visitors_needed: PerTier<f64>,
    pub mix: OptimalMix,
}

impl GoalReport {
    /// Tiers on which either the paying-user or the visitor target is non-finite.
    pub fn unreachable_tiers(&self) -> Vec<Tier> {
        self.breakdown
            .iter()
            .filter(|(tier, row)| !row.is_reachable() || !self.visitors_needed.get(*tier).is_finite())
            .map(|(tier, _)| tier)
            .collect()
    }
}
