use std::net::SocketAddr;

use anyhow::Result;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::calculator::breakdown::{revenue_breakdown, users_needed_with_conversion};
use crate::calculator::mix::optimal_mix;
use crate::calculator::payout::{annual_revenue, payout_breakdown};
use crate::calculator::report::goal_report;
use crate::calculator::{GoalReport, OptimalMix, PayoutCalculation, RevenueBreakdown};
use crate::config::Config;
use crate::input::normalize::{normalize_conversion_rate, normalize_goal, normalize_plan};
use crate::plan::{compare_plan, PerTier, PlanComparison, SubscriptionPlan, Tier};
use crate::summary::compose_summary;

#[derive(Clone)]
struct ApiState {
    config: Config,
}

#[derive(Debug, Serialize)]
struct ApiResponse<T: Serialize> {
    ok: bool,
    data: T,
}

#[derive(Debug, Serialize)]
struct ApiErrorBody {
    ok: bool,
    error: String,
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ApiErrorBody {
            ok: false,
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<ApiResponse<T>>, ApiError>;

#[derive(Debug, Clone, Default, Deserialize)]
struct PlanContextRequest {
    plan: Option<SubscriptionPlan>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct GoalRequest {
    #[serde(flatten)]
    context: PlanContextRequest,
    goal: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ConversionRequest {
    #[serde(flatten)]
    context: PlanContextRequest,
    goal: Option<f64>,
    conversion_rate_pct: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct PayoutRequest {
    #[serde(flatten)]
    context: PlanContextRequest,
    #[serde(default)]
    yearly_users: u64,
    #[serde(default)]
    monthly_users: u64,
    #[serde(default)]
    weekly_users: u64,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Debug, Serialize)]
struct BreakdownResponse {
    plan: SubscriptionPlan,
    revenue_goal: f64,
    breakdown: RevenueBreakdown,
    unreachable_tiers: Vec<Tier>,
}

#[derive(Debug, Serialize)]
struct VisitorsResponse {
    revenue_goal: f64,
    conversion_rate_pct: f64,
    visitors_needed: PerTier<f64>,
    unreachable_tiers: Vec<Tier>,
}

#[derive(Debug, Serialize)]
struct PayoutResponse {
    payout: PayoutCalculation,
    annual_revenue: f64,
}

#[derive(Debug, Serialize)]
struct MixResponse {
    #[serde(flatten)]
    mix: OptimalMix,
    unreachable_tiers: Vec<Tier>,
}

#[derive(Debug, Serialize)]
struct ReportResponse {
    #[serde(flatten)]
    report: GoalReport,
    unreachable_tiers: Vec<Tier>,
}

#[derive(Debug, Serialize)]
struct SummaryResponse {
    text: String,
}

#[derive(Debug, Serialize)]
struct CompareResponse {
    plan: SubscriptionPlan,
    comparison: PlanComparison,
}

fn router(config: Config) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/v1/config", get(show_config))
        .route("/v1/breakdown", post(breakdown))
        .route("/v1/visitors", post(visitors))
        .route("/v1/payout", post(payout))
        .route("/v1/mix", post(mix))
        .route("/v1/report", post(report))
        .route("/v1/summary", post(summary))
        .route("/v1/compare", get(compare))
        .layer(cors)
        .with_state(ApiState { config })
}

pub async fn run_server(config: Config, bind: SocketAddr) -> Result<()> {
    let app = router(config);
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("REST API listening on http://{bind}");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> Json<ApiResponse<HealthResponse>> {
    ok(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn show_config(State(state): State<ApiState>) -> Json<ApiResponse<Config>> {
    ok(state.config)
}

async fn breakdown(
    State(state): State<ApiState>,
    Json(request): Json<GoalRequest>,
) -> ApiResult<BreakdownResponse> {
    let plan = resolve_plan(&state, &request.context)?;
    let revenue_goal = resolve_goal(&state, request.goal);
    let breakdown = revenue_breakdown(&plan, revenue_goal);
    let unreachable_tiers = breakdown.unreachable_tiers();
    log_unreachable(&unreachable_tiers);

    Ok(ok(BreakdownResponse {
        plan,
        revenue_goal,
        breakdown,
        unreachable_tiers,
    }))
}

async fn visitors(
    State(state): State<ApiState>,
    Json(request): Json<ConversionRequest>,
) -> ApiResult<VisitorsResponse> {
    let plan = resolve_plan(&state, &request.context)?;
    let revenue_goal = resolve_goal(&state, request.goal);
    let conversion_rate_pct = resolve_conversion_rate(&state, request.conversion_rate_pct);
    let visitors_needed = users_needed_with_conversion(&plan, revenue_goal, conversion_rate_pct);
    let unreachable_tiers = visitors_needed
        .iter()
        .filter(|(_, value)| !value.is_finite())
        .map(|(tier, _)| tier)
        .collect::<Vec<_>>();
    log_unreachable(&unreachable_tiers);

    Ok(ok(VisitorsResponse {
        revenue_goal,
        conversion_rate_pct,
        visitors_needed,
        unreachable_tiers,
    }))
}

async fn payout(
    State(state): State<ApiState>,
    Json(request): Json<PayoutRequest>,
) -> ApiResult<PayoutResponse> {
    let plan = resolve_plan(&state, &request.context)?;
    let payout = payout_breakdown(
        &plan,
        request.yearly_users,
        request.monthly_users,
        request.weekly_users,
    );
    let annual_revenue = annual_revenue(
        &plan,
        request.yearly_users,
        request.monthly_users,
        request.weekly_users,
    );
    Ok(ok(PayoutResponse {
        payout,
        annual_revenue,
    }))
}

async fn mix(
    State(state): State<ApiState>,
    Json(request): Json<GoalRequest>,
) -> ApiResult<MixResponse> {
    let plan = resolve_plan(&state, &request.context)?;
    let revenue_goal = resolve_goal(&state, request.goal);
    let mix = optimal_mix(&plan, revenue_goal);
    let unreachable_tiers = mix.unreachable_tiers();
    log_unreachable(&unreachable_tiers);
    Ok(ok(MixResponse {
        mix,
        unreachable_tiers,
    }))
}

async fn report(
    State(state): State<ApiState>,
    Json(request): Json<ConversionRequest>,
) -> ApiResult<ReportResponse> {
    let report = build_report(&state, &request)?;
    let unreachable_tiers = report.unreachable_tiers();
    log_unreachable(&unreachable_tiers);
    Ok(ok(ReportResponse {
        report,
        unreachable_tiers,
    }))
}

async fn summary(
    State(state): State<ApiState>,
    Json(request): Json<ConversionRequest>,
) -> ApiResult<SummaryResponse> {
    let report = build_report(&state, &request)?;
    Ok(ok(SummaryResponse {
        text: compose_summary(&report),
    }))
}

async fn compare(State(state): State<ApiState>) -> Json<ApiResponse<CompareResponse>> {
    let plan = state.config.subscription_plan();
    let comparison = compare_plan(&plan);
    ok(CompareResponse { plan, comparison })
}

fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse { ok: true, data })
}

fn build_report(
    state: &ApiState,
    request: &ConversionRequest,
) -> std::result::Result<GoalReport, ApiError> {
    let plan = resolve_plan(state, &request.context)?;
    let revenue_goal = resolve_goal(state, request.goal);
    let conversion_rate_pct = resolve_conversion_rate(state, request.conversion_rate_pct);
    Ok(goal_report(&plan, revenue_goal, conversion_rate_pct))
}

fn resolve_plan(
    state: &ApiState,
    context: &PlanContextRequest,
) -> std::result::Result<SubscriptionPlan, ApiError> {
    let Some(plan) = &context.plan else {
        return Ok(state.config.subscription_plan());
    };
    if plan.name.trim().is_empty() {
        return Err(ApiError::bad_request("plan name cannot be empty"));
    }
    let mut plan = plan.clone();
    normalize_plan(&mut plan);
    Ok(plan)
}

fn resolve_goal(state: &ApiState, goal: Option<f64>) -> f64 {
    goal.map(normalize_goal)
        .unwrap_or_else(|| state.config.revenue_goal())
}

fn resolve_conversion_rate(state: &ApiState, rate: Option<f64>) -> f64 {
    rate.map(normalize_conversion_rate)
        .unwrap_or_else(|| state.config.conversion_rate_pct())
}

fn log_unreachable(tiers: &[Tier]) {
    for tier in tiers {
        warn!("{tier} tier cannot reach the requested goal");
    }
}

#[cfg(test)]
mod tests {
    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::Json;

    use super::{
        breakdown, compare, mix, payout, report, resolve_plan, summary, visitors, ApiState,
        ConversionRequest, GoalRequest, PayoutRequest, PlanContextRequest,
    };
    use crate::config::Config;
    use crate::plan::{SubscriptionPlan, Tier};

    fn state() -> ApiState {
        ApiState {
            config: Config::default(),
        }
    }

    #[test]
    fn breakdown_uses_configured_plan_and_goal() {
        let Json(response) =
            tokio_test::block_on(breakdown(State(state()), Json(GoalRequest::default())))
                .expect("breakdown");
        assert!(response.ok);
        assert_eq!(response.data.revenue_goal, 100_000.0);
        assert_eq!(response.data.breakdown.yearly.users_needed, 1011.0);
        assert!(response.data.unreachable_tiers.is_empty());
    }

    #[test]
    fn request_plan_replaces_configured_plan() {
        let request = GoalRequest {
            context: PlanContextRequest {
                plan: Some(SubscriptionPlan::new("Custom", -10.0, 10.0, 2.0)),
            },
            goal: Some(1_200.0),
        };
        let Json(response) =
            tokio_test::block_on(breakdown(State(state()), Json(request))).expect("breakdown");
        assert_eq!(response.data.plan.yearly_price, 0.0);
        assert_eq!(response.data.breakdown.monthly.users_needed, 10.0);
        assert_eq!(response.data.unreachable_tiers, vec![Tier::Yearly]);
    }

    #[test]
    fn rejects_unnamed_plans() {
        let context = PlanContextRequest {
            plan: Some(SubscriptionPlan::new("  ", 1.0, 1.0, 1.0)),
        };
        let error = resolve_plan(&state(), &context).expect_err("empty name");
        assert_eq!(error.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn visitors_clamp_conversion_rate() {
        let request = ConversionRequest {
            conversion_rate_pct: Some(400.0),
            ..ConversionRequest::default()
        };
        let Json(response) =
            tokio_test::block_on(visitors(State(state()), Json(request))).expect("visitors");
        assert_eq!(response.data.conversion_rate_pct, 100.0);
        assert_eq!(response.data.visitors_needed.yearly, 1011.0);

        let request = ConversionRequest {
            conversion_rate_pct: Some(0.0),
            ..ConversionRequest::default()
        };
        let Json(response) =
            tokio_test::block_on(visitors(State(state()), Json(request))).expect("visitors");
        assert_eq!(response.data.unreachable_tiers, Tier::ALL.to_vec());
    }

    #[test]
    fn mix_lists_unreachable_tiers() {
        let request = GoalRequest {
            context: PlanContextRequest {
                plan: Some(SubscriptionPlan::new("Weekly only", 0.0, 0.0, 3.0)),
            },
            goal: Some(1_560.0),
        };
        let Json(response) = tokio_test::block_on(mix(State(state()), Json(request))).expect("mix");
        assert_eq!(response.data.mix.recommended, Tier::Weekly);
        assert_eq!(response.data.mix.breakdown.weekly.users_needed, 10.0);
        assert_eq!(
            response.data.unreachable_tiers,
            vec![Tier::Yearly, Tier::Monthly]
        );

        let Json(response) =
            tokio_test::block_on(mix(State(state()), Json(GoalRequest::default()))).expect("mix");
        assert!(response.data.unreachable_tiers.is_empty());
    }

    #[test]
    fn payout_returns_period_payouts_and_annual_revenue() {
        let request = PayoutRequest {
            yearly_users: 10,
            monthly_users: 20,
            weekly_users: 30,
            ..PayoutRequest::default()
        };
        let Json(response) =
            tokio_test::block_on(payout(State(state()), Json(request))).expect("payout");
        assert_eq!(response.data.payout.monthly_payout, 240.0);
        assert_eq!(response.data.annual_revenue, 8550.0);
    }

    #[test]
    fn report_and_summary_agree() {
        let Json(report_response) = tokio_test::block_on(report(
            State(state()),
            Json(ConversionRequest::default()),
        ))
        .expect("report");
        assert_eq!(report_response.data.report.visitors_needed.yearly, 20_220.0);

        let Json(summary_response) = tokio_test::block_on(summary(
            State(state()),
            Json(ConversionRequest::default()),
        ))
        .expect("summary");
        assert!(summary_response.data.text.contains("Visitors needed: 20,220"));
    }

    #[test]
    fn compare_reports_yearly_discount() {
        let Json(response) = tokio_test::block_on(compare(State(state())));
        assert!((response.data.comparison.yearly_discount_pct - 31.25).abs() < 1e-9);
    }
}
