//! Auth API handlers.
//!
//! Login, registration, and token issuance live in the external auth
//! service; only the identity echo is served here.

use actix_web::{HttpResponse, get, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::AuthUser;
use crate::db::Store;
use crate::error::AppResult;

use super::success;

/// Verified caller identity.
#[derive(Debug, Serialize, ToSchema)]
pub struct MeResponse {
    pub id: i32,
    pub email: String,
    pub role: String,
    pub display_name: Option<String>,
}

/// Echo the verified identity, enriched with the stored display name
/// when the user row still exists.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Caller identity", body = MeResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorEnvelope),
    ),
    security(("bearer_auth" = []))
)]
#[get("/me")]
pub async fn me(auth: AuthUser, store: web::Data<Store>) -> AppResult<HttpResponse> {
    let display_name = store
        .get_user_by_id(auth.identity.id)
        .await?
        .and_then(|u| u.display_name);

    Ok(success(MeResponse {
        id: auth.identity.id,
        email: auth.identity.email,
        role: auth.identity.role,
        display_name,
    }))
}

/// Configure auth routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/auth").service(me));
}
