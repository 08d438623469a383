//! Task API handlers.

use actix_web::{HttpResponse, delete, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::info;
use utoipa::ToSchema;

use crate::auth::{AuthUser, MaybeAuthUser, require_role};
use crate::db::Store;
use crate::entity::task;
use crate::error::{AppError, AppResult};
use crate::models::{CreateTaskRequest, TaskStatus};

use super::executions::ExecutionResponse;
use super::{success, success_message};

/// Response shape for one task.
#[derive(Debug, Serialize, ToSchema)]
pub struct TaskResponse {
    pub id: i32,
    pub name: String,
    pub project_id: Option<i32>,
    pub case_ids: JsonValue,
    pub status: String,
    pub cron_expr: Option<String>,
    pub created_by: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<task::Model> for TaskResponse {
    fn from(model: task::Model) -> Self {
        TaskResponse {
            id: model.id,
            name: model.name,
            project_id: model.project_id,
            case_ids: model.case_ids,
            status: model.status,
            cron_expr: model.cron_expr,
            created_by: model.created_by,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Task detail plus its recent executions.
#[derive(Debug, Serialize, ToSchema)]
pub struct TaskDetailResponse {
    pub task: TaskResponse,
    pub recent_executions: Vec<ExecutionResponse>,
}

/// Task list payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct TaskListResponse {
    pub tasks: Vec<TaskResponse>,
    pub total: u64,
}

/// List query for tasks.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ListTasksQuery {
    pub status: Option<TaskStatus>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// Task list.
#[utoipa::path(
    get,
    path = "/api/tasks",
    tag = "Tasks",
    responses((status = 200, description = "Task list", body = TaskListResponse))
)]
#[get("")]
pub async fn list(
    _auth: MaybeAuthUser,
    store: web::Data<Store>,
    query: web::Query<ListTasksQuery>,
) -> AppResult<HttpResponse> {
    let limit = query.limit.unwrap_or(50).clamp(1, 100);
    let offset = query.offset.unwrap_or(0);
    let (tasks, total) = store.query_tasks(query.status, offset, limit).await?;

    Ok(success(TaskListResponse {
        tasks: tasks.into_iter().map(TaskResponse::from).collect(),
        total,
    }))
}

/// Task detail with its recent executions.
#[utoipa::path(
    get,
    path = "/api/tasks/{id}",
    tag = "Tasks",
    params(("id" = i32, Path, description = "Task id")),
    responses(
        (status = 200, description = "Task detail", body = TaskDetailResponse),
        (status = 404, description = "Unknown task", body = crate::error::ErrorEnvelope),
    )
)]
#[get("/{id}")]
pub async fn detail(
    _auth: MaybeAuthUser,
    store: web::Data<Store>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let task = store
        .get_task_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Task {}", id)))?;

    let executions = store.get_task_executions(id, 10).await?;

    Ok(success(TaskDetailResponse {
        task: TaskResponse::from(task),
        recent_executions: executions.into_iter().map(ExecutionResponse::from).collect(),
    }))
}

/// Create a task.
#[utoipa::path(
    post,
    path = "/api/tasks",
    tag = "Tasks",
    request_body = CreateTaskRequest,
    responses(
        (status = 200, description = "Task created", body = TaskResponse),
        (status = 400, description = "Invalid payload", body = crate::error::ErrorEnvelope),
        (status = 403, description = "Insufficient role", body = crate::error::ErrorEnvelope),
    ),
    security(("bearer_auth" = []))
)]
#[post("")]
pub async fn create(
    auth: AuthUser,
    store: web::Data<Store>,
    body: web::Json<CreateTaskRequest>,
) -> AppResult<HttpResponse> {
    require_role(&auth.identity, &["admin", "tester"])?;

    let req = body.into_inner();
    if req.name.trim().is_empty() {
        return Err(AppError::Validation("Task name is required".to_string()));
    }

    let task = store.insert_task(&req, Some(auth.identity.id)).await?;
    info!("Task created: id={}, by={}", task.id, auth.identity.id);

    Ok(success(TaskResponse::from(task)))
}

/// Delete a task.
#[utoipa::path(
    delete,
    path = "/api/tasks/{id}",
    tag = "Tasks",
    params(("id" = i32, Path, description = "Task id")),
    responses(
        (status = 200, description = "Task deleted"),
        (status = 403, description = "Insufficient role", body = crate::error::ErrorEnvelope),
        (status = 404, description = "Unknown task", body = crate::error::ErrorEnvelope),
    ),
    security(("bearer_auth" = []))
)]
#[delete("/{id}")]
pub async fn remove(
    auth: AuthUser,
    store: web::Data<Store>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    require_role(&auth.identity, &["admin"])?;

    let id = path.into_inner();
    store.delete_task(id).await?;
    info!("Task deleted: id={}, by={}", id, auth.identity.id);

    Ok(success_message("Task deleted"))
}

/// Configure task routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/tasks")
            .service(create)
            .service(remove)
            .service(detail)
            .service(list),
    );
}
