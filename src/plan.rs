use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Billing cadence of a subscription price.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Yearly,
    Monthly,
    Weekly,
}

impl Tier {
    /// Tie-break order: earlier tiers win ties in rankings.
    pub const ALL: [Tier; 3] = [Tier::Yearly, Tier::Monthly, Tier::Weekly];

    pub fn as_slug(&self) -> &'static str {
        match self {
            Self::Yearly => "yearly",
            Self::Monthly => "monthly",
            Self::Weekly => "weekly",
        }
    }

    pub fn periods_per_year(&self) -> f64 {
        match self {
            Self::Yearly => 1.0,
            Self::Monthly => 12.0,
            Self::Weekly => 52.0,
        }
    }

    /// Every tier in tie-break order, or only `filter` when one is given.
    pub fn selection(filter: Option<Tier>) -> Vec<Tier> {
        filter
            .map(|tier| vec![tier])
            .unwrap_or_else(|| Tier::ALL.to_vec())
    }

    pub fn period_label(&self) -> &'static str {
        match self {
            Self::Yearly => "year",
            Self::Monthly => "month",
            Self::Weekly => "week",
        }
    }
}

impl Display for Tier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let display = match self {
            Self::Yearly => "Yearly",
            Self::Monthly => "Monthly",
            Self::Weekly => "Weekly",
        };
        write!(f, "{display}")
    }
}

#[derive(Debug, Error)]
#[error("unknown subscription tier: {0}")]
pub struct TierParseError(pub String);

impl FromStr for Tier {
    type Err = TierParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "yearly" | "annual" | "year" => Ok(Self::Yearly),
            "monthly" | "month" => Ok(Self::Monthly),
            "weekly" | "week" => Ok(Self::Weekly),
            _ => Err(TierParseError(s.to_string())),
        }
    }
}

/// One value per tier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct PerTier<T> {
    pub yearly: T,
    pub monthly: T,
    pub weekly: T,
}

impl<T> PerTier<T> {
    pub fn from_fn(mut f: impl FnMut(Tier) -> T) -> Self {
        Self {
            yearly: f(Tier::Yearly),
            monthly: f(Tier::Monthly),
            weekly: f(Tier::Weekly),
        }
    }

    pub fn get(&self, tier: Tier) -> &T {
        match tier {
            Tier::Yearly => &self.yearly,
            Tier::Monthly => &self.monthly,
            Tier::Weekly => &self.weekly,
        }
    }

    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> PerTier<U> {
        PerTier {
            yearly: f(&self.yearly),
            monthly: f(&self.monthly),
            weekly: f(&self.weekly),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Tier, &T)> {
        Tier::ALL.into_iter().map(move |tier| (tier, self.get(tier)))
    }
}

/// Per-tier prices of a subscription product. Prices are per billing period.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubscriptionPlan {
    pub name: String,
    pub yearly_price: f64,
    pub monthly_price: f64,
    pub weekly_price: f64,
}

impl SubscriptionPlan {
    pub fn new(name: &str, yearly_price: f64, monthly_price: f64, weekly_price: f64) -> Self {
        Self {
            name: name.to_string(),
            yearly_price,
            monthly_price,
            weekly_price,
        }
    }

    /// Raw price charged once per billing period of `tier`.
    pub fn price(&self, tier: Tier) -> f64 {
        match tier {
            Tier::Yearly => self.yearly_price,
            Tier::Monthly => self.monthly_price,
            Tier::Weekly => self.weekly_price,
        }
    }

    /// Revenue one subscriber on `tier` brings in over a year.
    pub fn annualized_price(&self, tier: Tier) -> f64 {
        self.price(tier) * tier.periods_per_year()
    }

    pub fn annualized_prices(&self) -> PerTier<f64> {
        PerTier::from_fn(|tier| self.annualized_price(tier))
    }
}

impl Default for SubscriptionPlan {
    fn default() -> Self {
        Self::new("Premium Plan", 99.0, 12.0, 3.0)
    }
}

/// How the tiers of a plan relate to each other once annualized.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PlanComparison {
    pub yearly_price: f64,
    pub monthly_annual: f64,
    pub weekly_annual: f64,
    pub yearly_monthly_equivalent: f64,
    pub yearly_discount_pct: f64,
    pub weekly_premium_pct: f64,
}

pub fn compare_plan(plan: &SubscriptionPlan) -> PlanComparison {
    let yearly_price = plan.yearly_price;
    let monthly_annual = plan.annualized_price(Tier::Monthly);
    let weekly_annual = plan.annualized_price(Tier::Weekly);

    let yearly_discount_pct = if monthly_annual > 0.0 {
        (monthly_annual - yearly_price) / monthly_annual * 100.0
    } else {
        0.0
    };
    // Relative to the yearly price: a free yearly tier yields a non-finite premium.
    let weekly_premium_pct = if weekly_annual > 0.0 {
        (weekly_annual - yearly_price) / yearly_price * 100.0
    } else {
        0.0
    };

    PlanComparison {
        yearly_price,
        monthly_annual,
        weekly_annual,
        yearly_monthly_equivalent: yearly_price / 12.0,
        yearly_discount_pct,
        weekly_premium_pct,
    }
}
