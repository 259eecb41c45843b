use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use revenue_calculator::calculator::breakdown::{revenue_breakdown, users_needed_with_conversion};
use revenue_calculator::calculator::mix::optimal_mix;
use revenue_calculator::calculator::payout::{annual_revenue, payout_breakdown};
use revenue_calculator::calculator::report::goal_report;
use revenue_calculator::calculator::{GoalReport, OptimalMix, RevenueBreakdown};
use revenue_calculator::config::{Config, ConfigOverrides};
use revenue_calculator::input::normalize::{normalize_conversion_rate, normalize_goal};
use revenue_calculator::input::{amount_arg, count_arg};
use revenue_calculator::output::csv::{
    breakdown_to_csv, comparison_to_csv, mix_to_csv, payout_to_csv, report_to_csv,
    visitors_to_csv,
};
use revenue_calculator::output::json::render_json;
use revenue_calculator::output::table::{
    render_breakdown_table, render_comparison_table, render_mix_table, render_payout_table,
    render_report_table, render_visitors_table,
};
use revenue_calculator::plan::{compare_plan, PerTier, SubscriptionPlan, Tier};
use revenue_calculator::server::run_server;
use revenue_calculator::summary::compose_summary;
use serde::Serialize;
use tracing::warn;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Debug, Parser)]
#[command(
    name = "revenue-calculator",
    about = "Users and visitors needed to hit a subscription revenue goal"
)]
struct Cli {
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
    #[command(flatten)]
    plan: PlanArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, clap::Args, Clone, Default)]
struct PlanArgs {
    #[arg(long = "name")]
    name: Option<String>,
    #[arg(long = "yearly", value_parser = amount_arg)]
    yearly_price: Option<f64>,
    #[arg(long = "monthly", value_parser = amount_arg)]
    monthly_price: Option<f64>,
    #[arg(long = "weekly", value_parser = amount_arg)]
    weekly_price: Option<f64>,
}

impl From<PlanArgs> for ConfigOverrides {
    fn from(value: PlanArgs) -> Self {
        Self {
            plan_name: value.name,
            yearly_price: value.yearly_price,
            monthly_price: value.monthly_price,
            weekly_price: value.weekly_price,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    Breakdown {
        #[arg(long, value_parser = amount_arg)]
        goal: Option<f64>,
        /// Only show one tier (yearly, monthly or weekly).
        #[arg(long, value_parser = Tier::from_str)]
        tier: Option<Tier>,
    },
    Visitors {
        #[arg(long, value_parser = amount_arg)]
        goal: Option<f64>,
        #[arg(long, value_parser = amount_arg)]
        conversion: Option<f64>,
        #[arg(long, value_parser = Tier::from_str)]
        tier: Option<Tier>,
    },
    Payout {
        #[arg(long = "yearly-users", value_parser = count_arg, default_value = "0")]
        yearly_users: u64,
        #[arg(long = "monthly-users", value_parser = count_arg, default_value = "0")]
        monthly_users: u64,
        #[arg(long = "weekly-users", value_parser = count_arg, default_value = "0")]
        weekly_users: u64,
    },
    Mix {
        #[arg(long, value_parser = amount_arg)]
        goal: Option<f64>,
    },
    Report {
        #[arg(long, value_parser = amount_arg)]
        goal: Option<f64>,
        #[arg(long, value_parser = amount_arg)]
        conversion: Option<f64>,
    },
    /// Plain-text summary; `--output json` wraps it, CSV is rejected.
    Summary {
        #[arg(long, value_parser = amount_arg)]
        goal: Option<f64>,
        #[arg(long, value_parser = amount_arg)]
        conversion: Option<f64>,
    },
    Compare,
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    Config {
        #[arg(long)]
        init: bool,
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(Some(&config_path))?;
    config.apply_overrides(cli.plan.clone().into());

    if matches!(cli.command, Commands::Config { .. }) {
        return handle_config_command(&cli.command, &config, &config_path);
    }
    if let Commands::Serve { host, port } = &cli.command {
        let host = host.clone().unwrap_or_else(|| config.server.host.clone());
        let port = port.unwrap_or(config.server.port);
        let bind = format!("{host}:{port}");
        let addr: SocketAddr = bind
            .parse()
            .map_err(|e| anyhow!("invalid bind address {bind}: {e}"))?;
        return run_server(config, addr).await;
    }

    let plan = config.subscription_plan();

    match &cli.command {
        Commands::Breakdown { goal, tier } => {
            let goal = resolve_goal(&config, *goal);
            let breakdown = revenue_breakdown(&plan, goal);
            warn_unreachable_breakdown(&breakdown);
            print_breakdown(&breakdown, *tier, cli.output)?;
        }
        Commands::Visitors {
            goal,
            conversion,
            tier,
        } => {
            let goal = resolve_goal(&config, *goal);
            let rate = resolve_conversion_rate(&config, *conversion);
            let visitors = users_needed_with_conversion(&plan, goal, rate);
            for (tier, value) in visitors.iter() {
                if !value.is_finite() {
                    warn!("{tier} tier cannot reach the goal at a {rate}% conversion rate");
                }
            }
            print_visitors(&visitors, *tier, rate, cli.output)?;
        }
        Commands::Payout {
            yearly_users,
            monthly_users,
            weekly_users,
        } => {
            let payout = payout_breakdown(&plan, *yearly_users, *monthly_users, *weekly_users);
            let annual = annual_revenue(&plan, *yearly_users, *monthly_users, *weekly_users);
            match cli.output {
                OutputFormat::Table => {
                    println!("{}", render_payout_table(&plan, &payout, annual))
                }
                OutputFormat::Json => println!(
                    "{}",
                    render_json(&PayoutOutput {
                        payout,
                        annual_revenue: annual,
                    })?
                ),
                OutputFormat::Csv => println!("{}", payout_to_csv(&plan, &payout, annual)?),
            }
        }
        Commands::Mix { goal } => {
            let goal = resolve_goal(&config, *goal);
            let mix = optimal_mix(&plan, goal);
            warn_unreachable_breakdown(&mix.breakdown);
            print_mix(&mix, cli.output)?;
        }
        Commands::Report { goal, conversion } => {
            let report = build_report(&config, &plan, *goal, *conversion);
            print_report(&report, cli.output)?;
        }
        Commands::Summary { goal, conversion } => {
            let report = build_report(&config, &plan, *goal, *conversion);
            let summary = compose_summary(&report);
            match cli.output {
                OutputFormat::Table => println!("{summary}"),
                OutputFormat::Json => println!("{}", render_json(&SummaryOutput { summary })?),
                OutputFormat::Csv => bail!("summary has no CSV form; use --output table or json"),
            }
        }
        Commands::Compare => {
            let comparison = compare_plan(&plan);
            match cli.output {
                OutputFormat::Table => {
                    println!("{}", render_comparison_table(&plan, &comparison))
                }
                OutputFormat::Json => println!("{}", render_json(&comparison)?),
                OutputFormat::Csv => println!("{}", comparison_to_csv(&comparison)?),
            }
        }
        Commands::Config { .. } => {}
        Commands::Serve { .. } => unreachable!("serve command handled before dispatch"),
    }

    Ok(())
}

#[derive(Debug, Serialize)]
struct PayoutOutput {
    payout: revenue_calculator::calculator::PayoutCalculation,
    annual_revenue: f64,
}

#[derive(Debug, Serialize)]
struct SummaryOutput {
    summary: String,
}

fn handle_config_command(command: &Commands, config: &Config, config_path: &PathBuf) -> Result<()> {
    let Commands::Config { init, show } = command else {
        return Ok(());
    };
    if *init {
        Config::write_template(config_path)?;
        println!("Wrote config template to {}", config_path.display());
    }
    if *show || !*init {
        println!("{}", render_json(config)?);
    }
    Ok(())
}

fn resolve_goal(config: &Config, goal: Option<f64>) -> f64 {
    goal.map(normalize_goal)
        .unwrap_or_else(|| config.revenue_goal())
}

fn resolve_conversion_rate(config: &Config, rate: Option<f64>) -> f64 {
    rate.map(normalize_conversion_rate)
        .unwrap_or_else(|| config.conversion_rate_pct())
}

fn build_report(
    config: &Config,
    plan: &SubscriptionPlan,
    goal: Option<f64>,
    conversion: Option<f64>,
) -> GoalReport {
    let goal = resolve_goal(config, goal);
    let rate = resolve_conversion_rate(config, conversion);
    let report = goal_report(plan, goal, rate);
    for tier in report.unreachable_tiers() {
        warn!("{tier} tier cannot reach the goal; check its price and the conversion rate");
    }
    report
}

fn warn_unreachable_breakdown(breakdown: &RevenueBreakdown) {
    for tier in breakdown.unreachable_tiers() {
        warn!("{tier} tier has no price; its goal is unreachable");
    }
}

fn print_breakdown(
    breakdown: &RevenueBreakdown,
    tier: Option<Tier>,
    format: OutputFormat,
) -> Result<()> {
    let tiers = Tier::selection(tier);
    match (format, tier) {
        (OutputFormat::Table, _) => println!("{}", render_breakdown_table(breakdown, &tiers)),
        (OutputFormat::Json, Some(tier)) => println!("{}", render_json(breakdown.get(tier))?),
        (OutputFormat::Json, None) => println!("{}", render_json(breakdown)?),
        (OutputFormat::Csv, _) => println!("{}", breakdown_to_csv(breakdown, &tiers)?),
    }
    Ok(())
}

fn print_visitors(
    visitors: &PerTier<f64>,
    tier: Option<Tier>,
    rate: f64,
    format: OutputFormat,
) -> Result<()> {
    let tiers = Tier::selection(tier);
    match (format, tier) {
        (OutputFormat::Table, _) => {
            println!("{}", render_visitors_table(visitors, &tiers, rate))
        }
        (OutputFormat::Json, Some(tier)) => println!("{}", render_json(visitors.get(tier))?),
        (OutputFormat::Json, None) => println!("{}", render_json(visitors)?),
        (OutputFormat::Csv, _) => println!("{}", visitors_to_csv(visitors, &tiers)?),
    }
    Ok(())
}

fn print_mix(mix: &OptimalMix, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_mix_table(mix)),
        OutputFormat::Json => println!("{}", render_json(mix)?),
        OutputFormat::Csv => println!("{}", mix_to_csv(mix)?),
    }
    Ok(())
}

fn print_report(report: &GoalReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_report_table(report)),
        OutputFormat::Json => println!("{}", render_json(report)?),
        OutputFormat::Csv => println!("{}", report_to_csv(report)?),
    }
    Ok(())
}
