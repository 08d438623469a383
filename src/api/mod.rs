//! API endpoint modules.

pub mod auth;
pub mod cases;
pub mod dashboard;
pub mod executions;
pub mod health;
pub mod jenkins;
pub mod openapi;
pub mod tasks;

pub use auth::configure_routes as configure_auth_routes;
pub use cases::configure_routes as configure_case_routes;
pub use dashboard::configure_routes as configure_dashboard_routes;
pub use executions::configure_routes as configure_execution_routes;
pub use health::configure_health_routes;
pub use jenkins::configure_routes as configure_jenkins_routes;
pub use openapi::ApiDoc;
pub use tasks::configure_routes as configure_task_routes;

use actix_web::HttpResponse;

/// Success envelope: `{"success": true, "data": ...}`.
pub(crate) fn success<T: serde::Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "data": data,
    }))
}

/// Success envelope for operations without a payload.
pub(crate) fn success_message(message: &str) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": message,
    }))
}
