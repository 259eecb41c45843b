use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::input::normalize::{normalize_conversion_rate, normalize_goal, normalize_plan};
use crate::plan::SubscriptionPlan;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub plan: PlanConfig,
    #[serde(default)]
    pub goal: GoalConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanConfig {
    #[serde(default = "default_plan_name")]
    pub name: String,
    #[serde(default = "default_yearly_price")]
    pub yearly_price: f64,
    #[serde(default = "default_monthly_price")]
    pub monthly_price: f64,
    #[serde(default = "default_weekly_price")]
    pub weekly_price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalConfig {
    #[serde(default = "default_revenue_goal")]
    pub revenue_goal: f64,
    #[serde(default = "default_conversion_rate_pct")]
    pub conversion_rate_pct: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub plan_name: Option<String>,
    pub yearly_price: Option<f64>,
    pub monthly_price: Option<f64>,
    pub weekly_price: Option<f64>,
}

impl Config {
    pub fn default_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".config/revenue-calculator/config.toml")
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(|p| p.to_path_buf())
            .unwrap_or_else(Self::default_path);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(&path)
            .with_context(|| format!("failed reading config: {}", path.display()))?;
        Self::from_toml(&data)
            .with_context(|| format!("failed parsing TOML config: {}", path.display()))
    }

    pub fn from_toml(data: &str) -> Result<Self> {
        let parsed: Self = toml::from_str(data)?;
        Ok(parsed)
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(name) = overrides.plan_name {
            self.plan.name = name;
        }
        if let Some(price) = overrides.yearly_price {
            self.plan.yearly_price = price;
        }
        if let Some(price) = overrides.monthly_price {
            self.plan.monthly_price = price;
        }
        if let Some(price) = overrides.weekly_price {
            self.plan.weekly_price = price;
        }
    }

    /// Plan with prices clamped to non-negative values.
    pub fn subscription_plan(&self) -> SubscriptionPlan {
        let mut plan = SubscriptionPlan::new(
            &self.plan.name,
            self.plan.yearly_price,
            self.plan.monthly_price,
            self.plan.weekly_price,
        );
        normalize_plan(&mut plan);
        plan
    }

    pub fn revenue_goal(&self) -> f64 {
        normalize_goal(self.goal.revenue_goal)
    }

    pub fn conversion_rate_pct(&self) -> f64 {
        normalize_conversion_rate(self.goal.conversion_rate_pct)
    }

    pub fn write_template(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed creating config directory: {}", parent.display())
            })?;
        }
        fs::write(path, Self::default_template())
            .with_context(|| format!("failed writing config template: {}", path.display()))
    }

    pub fn default_template() -> String {
        let template = r#"# Prices are charged once per billing period.
[plan]
name = "Premium Plan"
yearly_price = 99.0
monthly_price = 12.0
weekly_price = 3.0

[goal]
revenue_goal = 100000.0
# Percentage of visitors who become paying customers.
conversion_rate_pct = 5.0

[server]
host = "127.0.0.1"
port = 3001
"#;
        template.to_string()
    }
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            name: default_plan_name(),
            yearly_price: default_yearly_price(),
            monthly_price: default_monthly_price(),
            weekly_price: default_weekly_price(),
        }
    }
}

impl Default for GoalConfig {
    fn default() -> Self {
        Self {
            revenue_goal: default_revenue_goal(),
            conversion_rate_pct: default_conversion_rate_pct(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_plan_name() -> String {
    "Premium Plan".to_string()
}

fn default_yearly_price() -> f64 {
    99.0
}

fn default_monthly_price() -> f64 {
    12.0
}

fn default_weekly_price() -> f64 {
    3.0
}

fn default_revenue_goal() -> f64 {
    100_000.0
}

fn default_conversion_rate_pct() -> f64 {
    5.0
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3001
}
