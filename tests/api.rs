//! HTTP-level integration tests: route wiring, auth ladder, and the
//! uniform response envelope.

mod common;

use actix_web::{App, test, web};
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use secrecy::SecretString;
use serde_json::Value;

use autotest_dashboard_lib::api;
use autotest_dashboard_lib::auth::{Claims, JwtVerifier};
use autotest_dashboard_lib::services::JenkinsTrigger;

use common::{seed_day, test_store};

const TEST_SECRET: &str = "api-test-secret";

fn test_verifier() -> JwtVerifier {
    JwtVerifier::new(&SecretString::from(TEST_SECRET))
}

fn token_for_role(role: &str) -> String {
    let claims = Claims {
        id: 1,
        email: "tester@example.com".to_string(),
        role: role.to_string(),
        exp: Utc::now().timestamp() + 3600,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap()
}

macro_rules! init_app {
    ($store:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($store.clone()))
                .app_data(web::Data::new(test_verifier()))
                .app_data(web::Data::new(JenkinsTrigger::new(None)))
                .service(
                    web::scope("/api")
                        .configure(api::configure_health_routes)
                        .configure(api::configure_dashboard_routes)
                        .configure(api::configure_execution_routes)
                        .configure(api::configure_case_routes)
                        .configure(api::configure_task_routes)
                        .configure(api::configure_jenkins_routes)
                        .configure(api::configure_auth_routes),
                ),
        )
        .await
    };
}

#[actix_web::test]
async fn health_returns_status_and_timestamp() {
    let store = test_store().await;
    let app = init_app!(store);

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].is_string());
}

#[actix_web::test]
async fn dashboard_is_public_and_enveloped() {
    let store = test_store().await;
    seed_day(&store, Utc::now(), 6, 3, 1, 0).await;
    let app = init_app!(store);

    let req = test::TestRequest::get().uri("/api/dashboard").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["success"], true);
    let today = &body["data"]["today_execution"];
    assert_eq!(today["total"], 10);
    assert_eq!(today["passed"], 6);
    assert_eq!(today["failed"], 3);
    assert_eq!(today["skipped"], 1);
    assert_eq!(body["data"]["stats"]["today_success_rate"], 60.0);
    assert_eq!(body["data"]["trend"].as_array().unwrap().len(), 30);
}

#[actix_web::test]
async fn invalid_trend_window_is_rejected() {
    let store = test_store().await;
    let app = init_app!(store);

    let req = test::TestRequest::get()
        .uri("/api/dashboard/trend?days=900")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert!(body["message"].is_string());
}

#[actix_web::test]
async fn refresh_summary_requires_a_token() {
    let store = test_store().await;
    let app = init_app!(store);

    let req = test::TestRequest::post()
        .uri("/api/dashboard/refresh-summary")
        .set_json(serde_json::json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 401);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
}

#[actix_web::test]
async fn refresh_summary_rejects_insufficient_role() {
    let store = test_store().await;
    let app = init_app!(store);

    let req = test::TestRequest::post()
        .uri("/api/dashboard/refresh-summary")
        .insert_header((
            "Authorization",
            format!("Bearer {}", token_for_role("user")),
        ))
        .set_json(serde_json::json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 403);
}

#[actix_web::test]
async fn refresh_summary_accepts_tester_role() {
    let store = test_store().await;
    let app = init_app!(store);

    let req = test::TestRequest::post()
        .uri("/api/dashboard/refresh-summary")
        .insert_header((
            "Authorization",
            format!("Bearer {}", token_for_role("tester")),
        ))
        .set_json(serde_json::json!({}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["total_cases_run"], 0);
}

#[actix_web::test]
async fn unknown_execution_is_a_404_envelope() {
    let store = test_store().await;
    let app = init_app!(store);

    let req = test::TestRequest::get()
        .uri("/api/executions/9999")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 404);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
}

#[actix_web::test]
async fn jenkins_trigger_without_configuration_is_rejected() {
    let store = test_store().await;
    let app = init_app!(store);

    let req = test::TestRequest::post()
        .uri("/api/jenkins/trigger")
        .insert_header((
            "Authorization",
            format!("Bearer {}", token_for_role("admin")),
        ))
        .set_json(serde_json::json!({"task_id": 1}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn case_crud_round_trip() {
    let store = test_store().await;
    let app = init_app!(store);
    let auth_header = (
        "Authorization".to_string(),
        format!("Bearer {}", token_for_role("tester")),
    );

    // Create
    let req = test::TestRequest::post()
        .uri("/api/cases")
        .insert_header(auth_header.clone())
        .set_json(serde_json::json!({
            "name": "login works",
            "module": "auth",
            "case_type": "api"
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], true);
    let id = body["data"]["id"].as_i64().unwrap();

    // List with module filter
    let req = test::TestRequest::get()
        .uri("/api/cases?module=auth")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["total"], 1);

    // Update
    let req = test::TestRequest::put()
        .uri(&format!("/api/cases/{}", id))
        .insert_header(auth_header.clone())
        .set_json(serde_json::json!({"enabled": false}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["enabled"], false);

    // Delete requires admin; tester is forbidden
    let req = test::TestRequest::delete()
        .uri(&format!("/api/cases/{}", id))
        .insert_header(auth_header)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/cases/{}", id))
        .insert_header((
            "Authorization",
            format!("Bearer {}", token_for_role("admin")),
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
}
