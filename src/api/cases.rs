//! Test case metadata API handlers.

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::info;
use utoipa::ToSchema;

use crate::auth::{AuthUser, MaybeAuthUser, require_role};
use crate::db::Store;
use crate::entity::test_case;
use crate::error::{AppError, AppResult};
use crate::models::{CaseQuery, CreateCaseRequest, UpdateCaseRequest};

use super::{success, success_message};

/// Roles allowed to create and edit cases.
const EDITOR_ROLES: &[&str] = &["admin", "tester", "developer"];

/// Response shape for one test case.
#[derive(Debug, Serialize, ToSchema)]
pub struct CaseResponse {
    pub id: i32,
    pub case_key: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub project_id: Option<i32>,
    pub module: Option<String>,
    pub owner: Option<String>,
    pub source: Option<String>,
    pub priority: String,
    pub case_type: String,
    pub script_path: Option<String>,
    pub tags: Option<JsonValue>,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<test_case::Model> for CaseResponse {
    fn from(model: test_case::Model) -> Self {
        CaseResponse {
            id: model.id,
            case_key: model.case_key,
            name: model.name,
            description: model.description,
            project_id: model.project_id,
            module: model.module,
            owner: model.owner,
            source: model.source,
            priority: model.priority,
            case_type: model.case_type,
            script_path: model.script_path,
            tags: model.tags,
            enabled: model.enabled,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Paginated case list payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct CaseListResponse {
    pub cases: Vec<CaseResponse>,
    pub total: u64,
}

/// Filterable case list.
#[utoipa::path(
    get,
    path = "/api/cases",
    tag = "Cases",
    responses(
        (status = 200, description = "Case list", body = CaseListResponse),
    )
)]
#[get("")]
pub async fn list(
    _auth: MaybeAuthUser,
    store: web::Data<Store>,
    query: web::Query<CaseQuery>,
) -> AppResult<HttpResponse> {
    let (cases, total) = store.query_cases(&query).await?;

    Ok(success(CaseListResponse {
        cases: cases.into_iter().map(CaseResponse::from).collect(),
        total,
    }))
}

/// Distinct module names for filter dropdowns.
#[utoipa::path(
    get,
    path = "/api/cases/modules/list",
    tag = "Cases",
    responses((status = 200, description = "Module names", body = [String]))
)]
#[get("/modules/list")]
pub async fn modules_list(
    _auth: MaybeAuthUser,
    store: web::Data<Store>,
) -> AppResult<HttpResponse> {
    let modules = store.list_case_modules().await?;
    Ok(success(modules))
}

/// Case detail.
#[utoipa::path(
    get,
    path = "/api/cases/{id}",
    tag = "Cases",
    params(("id" = i32, Path, description = "Case id")),
    responses(
        (status = 200, description = "Case detail", body = CaseResponse),
        (status = 404, description = "Unknown case", body = crate::error::ErrorEnvelope),
    )
)]
#[get("/{id}")]
pub async fn detail(
    _auth: MaybeAuthUser,
    store: web::Data<Store>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let case = store
        .get_case_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Case {}", id)))?;

    Ok(success(CaseResponse::from(case)))
}

/// Create a case.
#[utoipa::path(
    post,
    path = "/api/cases",
    tag = "Cases",
    request_body = CreateCaseRequest,
    responses(
        (status = 200, description = "Case created", body = CaseResponse),
        (status = 400, description = "Invalid payload", body = crate::error::ErrorEnvelope),
        (status = 403, description = "Insufficient role", body = crate::error::ErrorEnvelope),
    ),
    security(("bearer_auth" = []))
)]
#[post("")]
pub async fn create(
    auth: AuthUser,
    store: web::Data<Store>,
    body: web::Json<CreateCaseRequest>,
) -> AppResult<HttpResponse> {
    require_role(&auth.identity, EDITOR_ROLES)?;

    let req = body.into_inner();
    if req.name.trim().is_empty() {
        return Err(AppError::Validation("Case name is required".to_string()));
    }

    let case = store.insert_case(&req, Some(auth.identity.id)).await?;
    info!("Case created: id={}, by={}", case.id, auth.identity.id);

    Ok(success(CaseResponse::from(case)))
}

/// Update a case. Absent fields are left untouched.
#[utoipa::path(
    put,
    path = "/api/cases/{id}",
    tag = "Cases",
    params(("id" = i32, Path, description = "Case id")),
    request_body = UpdateCaseRequest,
    responses(
        (status = 200, description = "Case updated", body = CaseResponse),
        (status = 403, description = "Insufficient role", body = crate::error::ErrorEnvelope),
        (status = 404, description = "Unknown case", body = crate::error::ErrorEnvelope),
    ),
    security(("bearer_auth" = []))
)]
#[put("/{id}")]
pub async fn update(
    auth: AuthUser,
    store: web::Data<Store>,
    path: web::Path<i32>,
    body: web::Json<UpdateCaseRequest>,
) -> AppResult<HttpResponse> {
    require_role(&auth.identity, EDITOR_ROLES)?;

    let id = path.into_inner();
    let case = store
        .update_case(id, &body, Some(auth.identity.id))
        .await?;

    Ok(success(CaseResponse::from(case)))
}

/// Delete a case.
#[utoipa::path(
    delete,
    path = "/api/cases/{id}",
    tag = "Cases",
    params(("id" = i32, Path, description = "Case id")),
    responses(
        (status = 200, description = "Case deleted"),
        (status = 403, description = "Insufficient role", body = crate::error::ErrorEnvelope),
        (status = 404, description = "Unknown case", body = crate::error::ErrorEnvelope),
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
    store.delete_case(id).await?;
    info!("Case deleted: id={}, by={}", id, auth.identity.id);

    Ok(success_message("Case deleted"))
}

/// Configure case routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/cases")
            .service(modules_list)
            .service(create)
            .service(update)
            .service(remove)
            .service(detail)
            .service(list),
    );
}
