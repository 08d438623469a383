//! Execution API handlers: runner callbacks and execution queries.

use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::auth::{AuthUser, MaybeAuthUser};
use crate::db::Store;
use crate::entity::{task_execution, test_run_result};
use crate::error::{AppError, AppResult};
use crate::models::ExecutionCallbackRequest;

use super::{success, success_message};

/// Response shape for one execution.
#[derive(Debug, Serialize, ToSchema)]
pub struct ExecutionResponse {
    pub id: i32,
    pub task_id: Option<i32>,
    pub task_name: Option<String>,
    pub status: String,
    pub total_cases: i32,
    pub passed_cases: i32,
    pub failed_cases: i32,
    pub skipped_cases: i32,
    pub duration: i32,
    pub executed_by: i32,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

impl From<task_execution::Model> for ExecutionResponse {
    fn from(model: task_execution::Model) -> Self {
        ExecutionResponse {
            id: model.id,
            task_id: model.task_id,
            task_name: model.task_name,
            status: model.status,
            total_cases: model.total_cases,
            passed_cases: model.passed_cases,
            failed_cases: model.failed_cases,
            skipped_cases: model.skipped_cases,
            duration: model.duration,
            executed_by: model.executed_by,
            start_time: model.start_time,
            end_time: model.end_time,
        }
    }
}

/// Response shape for one case result.
#[derive(Debug, Serialize, ToSchema)]
pub struct CaseResultResponse {
    pub id: i32,
    pub case_id: i32,
    pub case_name: String,
    pub status: String,
    pub duration: Option<i32>,
    pub error_message: Option<String>,
    pub assertions_total: Option<i32>,
    pub assertions_passed: Option<i32>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

impl From<test_run_result::Model> for CaseResultResponse {
    fn from(model: test_run_result::Model) -> Self {
        CaseResultResponse {
            id: model.id,
            case_id: model.case_id,
            case_name: model.case_name,
            status: model.status,
            duration: model.duration,
            error_message: model.error_message,
            assertions_total: model.assertions_total,
            assertions_passed: model.assertions_passed,
            start_time: model.start_time,
            end_time: model.end_time,
        }
    }
}

/// List query for executions.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ListExecutionsQuery {
    /// Max entries to return (default 20, max 100).
    pub limit: Option<u64>,
}

/// Runner callback: record case results and close the execution.
///
/// The result rows are write-once; reporting the same execution twice
/// is rejected with 400 before anything is written.
#[utoipa::path(
    post,
    path = "/api/executions/callback",
    tag = "Executions",
    request_body = ExecutionCallbackRequest,
    responses(
        (status = 200, description = "Callback processed"),
        (status = 400, description = "Invalid callback", body = crate::error::ErrorEnvelope),
        (status = 404, description = "Unknown execution", body = crate::error::ErrorEnvelope),
    ),
    security(("bearer_auth" = []))
)]
#[post("/callback")]
pub async fn callback(
    auth: AuthUser,
    store: web::Data<Store>,
    body: web::Json<ExecutionCallbackRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    if !req.status.is_terminal() {
        return Err(AppError::Validation(format!(
            "Callback status must be terminal, got '{}'",
            req.status.as_str()
        )));
    }

    store.record_callback(&req).await?;

    info!(
        "Execution callback recorded: execution_id={}, status={}, results={}, caller={}",
        req.execution_id,
        req.status.as_str(),
        req.results.len(),
        auth.identity.id
    );

    Ok(success_message("Callback processed successfully"))
}

/// Mark an execution as running (the runner calls this when it picks
/// the build up).
#[utoipa::path(
    post,
    path = "/api/executions/{id}/start",
    tag = "Executions",
    params(("id" = i32, Path, description = "Execution id")),
    responses(
        (status = 200, description = "Execution marked as running"),
        (status = 404, description = "Unknown execution", body = crate::error::ErrorEnvelope),
    ),
    security(("bearer_auth" = []))
)]
#[post("/{id}/start")]
pub async fn start(
    _auth: AuthUser,
    store: web::Data<Store>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    store.mark_execution_running(id).await?;

    Ok(success_message("Execution marked as running"))
}

/// List recent executions.
#[utoipa::path(
    get,
    path = "/api/executions",
    tag = "Executions",
    params(("limit" = Option<u64>, Query, description = "Max entries (default 20)")),
    responses(
        (status = 200, description = "Recent executions", body = [ExecutionResponse]),
    )
)]
#[get("")]
pub async fn list(
    _auth: MaybeAuthUser,
    store: web::Data<Store>,
    query: web::Query<ListExecutionsQuery>,
) -> AppResult<HttpResponse> {
    let limit = query.limit.unwrap_or(20).clamp(1, 100);
    let executions = store.list_recent_executions(limit).await?;

    let response: Vec<ExecutionResponse> =
        executions.into_iter().map(ExecutionResponse::from).collect();

    Ok(success(response))
}

/// Execution detail.
#[utoipa::path(
    get,
    path = "/api/executions/{id}",
    tag = "Executions",
    params(("id" = i32, Path, description = "Execution id")),
    responses(
        (status = 200, description = "Execution detail", body = ExecutionResponse),
        (status = 404, description = "Unknown execution", body = crate::error::ErrorEnvelope),
    )
)]
#[get("/{id}")]
pub async fn detail(
    _auth: MaybeAuthUser,
    store: web::Data<Store>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let execution = store
        .get_execution_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Execution {}", id)))?;

    Ok(success(ExecutionResponse::from(execution)))
}

/// Case results of one execution.
#[utoipa::path(
    get,
    path = "/api/executions/{id}/results",
    tag = "Executions",
    params(("id" = i32, Path, description = "Execution id")),
    responses(
        (status = 200, description = "Case results", body = [CaseResultResponse]),
        (status = 404, description = "Unknown execution", body = crate::error::ErrorEnvelope),
    )
)]
#[get("/{id}/results")]
pub async fn results(
    _auth: MaybeAuthUser,
    store: web::Data<Store>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    store
        .get_execution_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Execution {}", id)))?;

    let rows = store.get_results_by_execution_id(id).await?;
    let response: Vec<CaseResultResponse> =
        rows.into_iter().map(CaseResultResponse::from).collect();

    Ok(success(response))
}

/// Configure execution routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/executions")
            .service(callback)
            .service(start)
            .service(results)
            .service(detail)
            .service(list),
    );
}
