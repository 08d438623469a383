//! Dashboard API handlers.
//!
//! Read endpoints are public (optional auth); summary refresh and
//! backfill are role-gated because they write to the summary table.

use actix_web::{HttpResponse, get, post, web};
use chrono::{Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::{AuthUser, MaybeAuthUser, require_role};
use crate::db::Store;
use crate::error::{AppError, AppResult};
use crate::models::{
    DashboardStats, Pagination, PaginationParams, RecentRun, TodayExecution, TrendPoint,
};
use crate::services::aggregation;

use super::success;

/// Combined dashboard payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardAllResponse {
    pub stats: DashboardStats,
    pub today_execution: TodayExecution,
    pub trend: Vec<TrendPoint>,
}

/// Paginated recent-runs payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct RecentRunsResponse {
    pub runs: Vec<RecentRun>,
    pub pagination: Pagination,
}

/// Trend window query.
#[derive(Debug, Deserialize, ToSchema)]
pub struct TrendQuery {
    /// Window size in days (default 30, max 365).
    pub days: Option<u32>,
}

/// Refresh request body; date defaults to yesterday.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RefreshSummaryRequest {
    pub date: Option<NaiveDate>,
}

/// Backfill request body.
#[derive(Debug, Deserialize, ToSchema)]
pub struct BackfillRequest {
    pub days: Option<u32>,
}

/// Validate a user-supplied trend window.
fn validate_days(days: Option<u32>) -> AppResult<u32> {
    let days = days.unwrap_or(30);
    if !(1..=365).contains(&days) {
        return Err(AppError::Validation(
            "days must be between 1 and 365".to_string(),
        ));
    }
    Ok(days)
}

/// Combined dashboard payload: card stats, today's breakdown, and the
/// trend series, fetched concurrently.
#[utoipa::path(
    get,
    path = "/api/dashboard",
    tag = "Dashboard",
    params(("days" = Option<u32>, Query, description = "Trend window in days (1-365)")),
    responses(
        (status = 200, description = "Dashboard data", body = DashboardAllResponse),
        (status = 400, description = "Invalid window", body = crate::error::ErrorEnvelope),
        (status = 500, description = "Store unavailable", body = crate::error::ErrorEnvelope),
    )
)]
#[get("")]
pub async fn dashboard_all(
    _auth: MaybeAuthUser,
    store: web::Data<Store>,
    query: web::Query<TrendQuery>,
) -> AppResult<HttpResponse> {
    let days = validate_days(query.days)?;

    let (stats_data, today_data, trend_series) = tokio::try_join!(
        aggregation::get_stats(&store),
        aggregation::get_today_execution(&store),
        aggregation::get_trend(&store, days),
    )?;

    Ok(success(DashboardAllResponse {
        stats: stats_data,
        today_execution: today_data,
        trend: trend_series,
    }))
}

/// Card figures only.
#[utoipa::path(
    get,
    path = "/api/dashboard/stats",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Card stats", body = DashboardStats),
        (status = 500, description = "Store unavailable", body = crate::error::ErrorEnvelope),
    )
)]
#[get("/stats")]
pub async fn stats(_auth: MaybeAuthUser, store: web::Data<Store>) -> AppResult<HttpResponse> {
    let stats = aggregation::get_stats(&store).await?;
    Ok(success(stats))
}

/// Today's pass/fail/skip breakdown (ring chart data).
#[utoipa::path(
    get,
    path = "/api/dashboard/today-execution",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Today's breakdown", body = TodayExecution),
        (status = 500, description = "Store unavailable", body = crate::error::ErrorEnvelope),
    )
)]
#[get("/today-execution")]
pub async fn today_execution(
    _auth: MaybeAuthUser,
    store: web::Data<Store>,
) -> AppResult<HttpResponse> {
    let breakdown = aggregation::get_today_execution(&store).await?;
    Ok(success(breakdown))
}

/// Historical trend series (T-1, zero-filled).
#[utoipa::path(
    get,
    path = "/api/dashboard/trend",
    tag = "Dashboard",
    params(("days" = Option<u32>, Query, description = "Trend window in days (1-365)")),
    responses(
        (status = 200, description = "Trend series", body = [TrendPoint]),
        (status = 400, description = "Invalid window", body = crate::error::ErrorEnvelope),
    )
)]
#[get("/trend")]
pub async fn trend(
    _auth: MaybeAuthUser,
    store: web::Data<Store>,
    query: web::Query<TrendQuery>,
) -> AppResult<HttpResponse> {
    let days = validate_days(query.days)?;
    let trend = aggregation::get_trend(&store, days).await?;
    Ok(success(trend))
}

/// Period-over-period comparison.
#[utoipa::path(
    get,
    path = "/api/dashboard/comparison",
    tag = "Dashboard",
    params(("days" = Option<u32>, Query, description = "Period length in days (1-365)")),
    responses(
        (status = 200, description = "Comparison deltas", body = crate::models::ComparisonData),
    )
)]
#[get("/comparison")]
pub async fn comparison(
    _auth: MaybeAuthUser,
    store: web::Data<Store>,
    query: web::Query<TrendQuery>,
) -> AppResult<HttpResponse> {
    let days = validate_days(query.days)?;
    let comparison = aggregation::get_comparison(&store, days).await?;
    Ok(success(comparison))
}

/// Most recent executions, paginated. Most recent start time first,
/// ties broken by execution id descending.
#[utoipa::path(
    get,
    path = "/api/dashboard/recent-runs",
    tag = "Dashboard",
    params(
        ("page" = Option<u32>, Query, description = "Page number (1-based)"),
        ("limit" = Option<u32>, Query, description = "Page size (max 100)"),
    ),
    responses(
        (status = 200, description = "Recent runs", body = RecentRunsResponse),
    )
)]
#[get("/recent-runs")]
pub async fn recent_runs(
    _auth: MaybeAuthUser,
    store: web::Data<Store>,
    query: web::Query<PaginationParams>,
) -> AppResult<HttpResponse> {
    let limit = query.clamped_limit();
    let (runs, total) = store
        .query_recent_runs(query.offset() as u64, limit as u64)
        .await?;

    Ok(success(RecentRunsResponse {
        runs,
        pagination: Pagination::new(query.page(), limit, total),
    }))
}

/// Recompute the summary for one date (default yesterday).
#[utoipa::path(
    post,
    path = "/api/dashboard/refresh-summary",
    tag = "Dashboard",
    request_body = RefreshSummaryRequest,
    responses(
        (status = 200, description = "Summary refreshed"),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorEnvelope),
        (status = 403, description = "Insufficient role", body = crate::error::ErrorEnvelope),
    ),
    security(("bearer_auth" = []))
)]
#[post("/refresh-summary")]
pub async fn refresh_summary(
    auth: AuthUser,
    store: web::Data<Store>,
    body: web::Json<RefreshSummaryRequest>,
) -> AppResult<HttpResponse> {
    require_role(&auth.identity, &["admin", "tester"])?;

    let date = match body.date {
        Some(date) => date,
        None => Utc::now()
            .date_naive()
            .checked_sub_days(Days::new(1))
            .ok_or_else(|| AppError::Validation("Date out of range".to_string()))?,
    };

    let summary = aggregation::compute_daily_summary(&store, date).await?;
    tracing::info!(
        "Summary refreshed by user {} for {}: {} cases",
        auth.identity.id,
        date,
        summary.total_cases_run
    );

    Ok(success(summary))
}

/// Backfill summaries for the last N days.
#[utoipa::path(
    post,
    path = "/api/dashboard/backfill-summaries",
    tag = "Dashboard",
    request_body = BackfillRequest,
    responses(
        (status = 200, description = "Backfill report", body = crate::models::BackfillReport),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorEnvelope),
        (status = 403, description = "Insufficient role", body = crate::error::ErrorEnvelope),
    ),
    security(("bearer_auth" = []))
)]
#[post("/backfill-summaries")]
pub async fn backfill_summaries(
    auth: AuthUser,
    store: web::Data<Store>,
    body: web::Json<BackfillRequest>,
) -> AppResult<HttpResponse> {
    require_role(&auth.identity, &["admin"])?;

    let days = validate_days(body.days)?;
    let report = aggregation::backfill(&store, days).await?;

    Ok(success(report))
}

/// Summary coverage over the recent window: which T-1 dates carry
/// execution data.
#[utoipa::path(
    get,
    path = "/api/dashboard/summary-status",
    tag = "Dashboard",
    responses((status = 200, description = "Coverage report"))
)]
#[get("/summary-status")]
pub async fn summary_status(
    _auth: MaybeAuthUser,
    store: web::Data<Store>,
) -> AppResult<HttpResponse> {
    const CHECK_DAYS: u32 = 7;

    let trend_series = aggregation::get_trend(&store, CHECK_DAYS).await?;
    let missing: Vec<NaiveDate> = trend_series
        .iter()
        .filter(|p| p.total_executions == 0)
        .map(|p| p.date)
        .collect();
    let available = CHECK_DAYS - missing.len() as u32;

    Ok(success(serde_json::json!({
        "total_days": CHECK_DAYS,
        "available_days": available,
        "missing_days": missing,
        "completeness_rate": (available * 100) / CHECK_DAYS,
    })))
}

/// Configure dashboard routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/dashboard")
            .service(stats)
            .service(today_execution)
            .service(trend)
            .service(comparison)
            .service(recent_runs)
            .service(refresh_summary)
            .service(backfill_summaries)
            .service(summary_status)
            .service(dashboard_all),
    );
}
