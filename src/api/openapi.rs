//! OpenAPI documentation configuration.

use utoipa::OpenApi;

use crate::{api, error, models};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Autotest Dashboard Server",
        version = "0.4.0",
        description = "API server for aggregating and viewing automated test results: daily summaries, trend series, executions, and case metadata"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        // Health endpoints
        api::health::health,
        api::health::ready,
        // Dashboard endpoints
        api::dashboard::dashboard_all,
        api::dashboard::stats,
        api::dashboard::today_execution,
        api::dashboard::trend,
        api::dashboard::comparison,
        api::dashboard::recent_runs,
        api::dashboard::refresh_summary,
        api::dashboard::backfill_summaries,
        api::dashboard::summary_status,
        // Execution endpoints
        api::executions::callback,
        api::executions::start,
        api::executions::list,
        api::executions::detail,
        api::executions::results,
        // Case endpoints
        api::cases::list,
        api::cases::modules_list,
        api::cases::detail,
        api::cases::create,
        api::cases::update,
        api::cases::remove,
        // Task endpoints
        api::tasks::list,
        api::tasks::detail,
        api::tasks::create,
        api::tasks::remove,
        // Jenkins endpoints
        api::jenkins::trigger,
        api::jenkins::status,
        // Auth endpoints
        api::auth::me,
    ),
    components(
        schemas(
            // Common
            error::ErrorEnvelope,
            models::Pagination,
            models::PaginationParams,
            // Health
            api::health::HealthResponse,
            api::health::ReadyResponse,
            // Dashboard
            models::DashboardStats,
            models::TodayExecution,
            models::TrendPoint,
            models::DailySummaryData,
            models::ComparisonData,
            models::RecentRun,
            models::BackfillReport,
            api::dashboard::DashboardAllResponse,
            api::dashboard::RecentRunsResponse,
            api::dashboard::TrendQuery,
            api::dashboard::RefreshSummaryRequest,
            api::dashboard::BackfillRequest,
            // Executions
            models::ExecutionStatus,
            models::ResultStatus,
            models::CaseResultPayload,
            models::ExecutionCallbackRequest,
            api::executions::ExecutionResponse,
            api::executions::CaseResultResponse,
            api::executions::ListExecutionsQuery,
            // Cases
            models::CasePriority,
            models::CaseType,
            models::CaseQuery,
            models::CreateCaseRequest,
            models::UpdateCaseRequest,
            api::cases::CaseResponse,
            api::cases::CaseListResponse,
            // Tasks
            models::TaskStatus,
            models::CreateTaskRequest,
            api::tasks::TaskResponse,
            api::tasks::TaskDetailResponse,
            api::tasks::TaskListResponse,
            api::tasks::ListTasksQuery,
            // Jenkins
            api::jenkins::TriggerRequest,
            api::jenkins::TriggerResponse,
            api::jenkins::ExecutionStatusResponse,
            // Auth
            api::auth::MeResponse,
            // Filter state (shared with frontends)
            models::FilterStatus,
            models::ChartFilter,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Dashboard", description = "Aggregated stats, trend series, and recent runs"),
        (name = "Executions", description = "Runner callbacks and execution queries"),
        (name = "Cases", description = "Test case metadata"),
        (name = "Tasks", description = "Saved case groupings"),
        (name = "Jenkins", description = "CI build triggering"),
        (name = "Auth", description = "Identity echo (token issuance is external)")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Add bearer token security scheme.
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
