//! Jenkins trigger API handlers.
//!
//! The Jenkins server and its build pipeline are external; these
//! endpoints only enqueue builds and echo execution status for pollers.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::auth::{AuthUser, MaybeAuthUser, require_role};
use crate::db::Store;
use crate::db::executions::NewExecution;
use crate::error::{AppError, AppResult};
use crate::models::ExecutionStatus;
use crate::services::JenkinsTrigger;

use super::success;

/// Trigger request body.
#[derive(Debug, Deserialize, ToSchema)]
pub struct TriggerRequest {
    pub task_id: i32,
}

/// Trigger response payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct TriggerResponse {
    pub execution_id: i32,
    pub task_id: i32,
}

/// Status echo payload for pollers.
#[derive(Debug, Serialize, ToSchema)]
pub struct ExecutionStatusResponse {
    pub execution_id: i32,
    pub status: String,
}

/// Create a pending execution for a task and enqueue the Jenkins build.
///
/// When the enqueue fails the execution is cancelled so no phantom
/// pending run lingers on the dashboard.
#[utoipa::path(
    post,
    path = "/api/jenkins/trigger",
    tag = "Jenkins",
    request_body = TriggerRequest,
    responses(
        (status = 200, description = "Build enqueued", body = TriggerResponse),
        (status = 400, description = "Jenkins not configured or unknown task", body = crate::error::ErrorEnvelope),
        (status = 403, description = "Insufficient role", body = crate::error::ErrorEnvelope),
        (status = 502, description = "Jenkins rejected the trigger", body = crate::error::ErrorEnvelope),
    ),
    security(("bearer_auth" = []))
)]
#[post("/trigger")]
pub async fn trigger(
    auth: AuthUser,
    store: web::Data<Store>,
    jenkins: web::Data<JenkinsTrigger>,
    body: web::Json<TriggerRequest>,
) -> AppResult<HttpResponse> {
    require_role(&auth.identity, &["admin", "tester"])?;

    if !jenkins.is_configured() {
        return Err(AppError::Validation(
            "Jenkins integration is not configured".to_string(),
        ));
    }

    let task = store
        .get_task_by_id(body.task_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Task {}", body.task_id)))?;

    let execution = store
        .insert_execution(NewExecution {
            task_id: Some(task.id),
            task_name: Some(task.name.clone()),
            executed_by: auth.identity.id,
        })
        .await?;

    if let Err(e) = jenkins.trigger_build(execution.id, task.id).await {
        warn!(
            "Jenkins trigger failed for execution {}: cancelling",
            execution.id
        );
        store
            .update_execution_status(execution.id, ExecutionStatus::Cancelled)
            .await?;
        return Err(e);
    }

    info!(
        "Jenkins build triggered: task_id={}, execution_id={}, by={}",
        task.id, execution.id, auth.identity.id
    );

    Ok(success(TriggerResponse {
        execution_id: execution.id,
        task_id: task.id,
    }))
}

/// Execution status echo for build pollers.
#[utoipa::path(
    get,
    path = "/api/jenkins/status/{execution_id}",
    tag = "Jenkins",
    params(("execution_id" = i32, Path, description = "Execution id")),
    responses(
        (status = 200, description = "Execution status", body = ExecutionStatusResponse),
        (status = 404, description = "Unknown execution", body = crate::error::ErrorEnvelope),
    )
)]
#[get("/status/{execution_id}")]
pub async fn status(
    _auth: MaybeAuthUser,
    store: web::Data<Store>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let execution = store
        .get_execution_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Execution {}", id)))?;

    Ok(success(ExecutionStatusResponse {
        execution_id: execution.id,
        status: execution.status,
    }))
}

/// Configure Jenkins routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/jenkins").service(trigger).service(status));
}
