//! Autotest dashboard server - Main entry point.
//!
//! Starts the Actix-web server with configured routes and middleware.

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, http::header, web};
use sea_orm_migration::MigratorTrait;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use autotest_dashboard_lib::api;
use autotest_dashboard_lib::auth::JwtVerifier;
use autotest_dashboard_lib::config::Config;
use autotest_dashboard_lib::db::Store;
use autotest_dashboard_lib::middleware::RequestLogger;
use autotest_dashboard_lib::migration::Migrator;
use autotest_dashboard_lib::services::{JenkinsTrigger, start_summary_scheduler};

/// Perform health check (for Docker healthcheck).
async fn health_check() -> bool {
    // Simple check - just verify we can load config
    Config::from_env().is_ok()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Check for --health-check flag (used by Docker HEALTHCHECK)
    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|arg| arg == "--health-check") {
        dotenvy::dotenv().ok();
        if health_check().await {
            std::process::exit(0);
        } else {
            std::process::exit(1);
        }
    }

    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            error!("");
            error!("Please check your environment variables:");
            error!("  - RUST_ENV must be set to 'development' or 'production'");
            error!("  - In production, USERS_DATABASE_URL and JWT_SECRET must be set");
            error!("  - In production, values must not match development defaults");
            std::process::exit(1);
        }
    };

    info!("========================================");
    info!("  Autotest Dashboard Server");
    info!("  Environment: {}", config.environment);
    info!("========================================");

    if config.is_development() {
        warn!("Running in DEVELOPMENT mode - do not use in production!");
        info!("Using development defaults for database URLs and JWT_SECRET");
    }

    // Ensure the SQLite file's directory exists before connecting
    if let Some(raw_path) = config.results_database_url.strip_prefix("sqlite://") {
        let path = raw_path.split('?').next().unwrap_or(raw_path);
        if path != ":memory:"
            && let Some(parent) = std::path::Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .expect("Failed to create database directory");
        }
    }

    // Connect both stores
    let store = Store::connect(&config)
        .await
        .expect("Failed to connect stores");
    info!("Store connections established");

    // Migrate the results store (the users schema is external)
    Migrator::up(store.results(), None)
        .await
        .expect("Failed to run migrations");
    info!("Results store migrations complete");

    // Shared state
    let verifier = JwtVerifier::new(&config.jwt_secret);
    let jenkins = JenkinsTrigger::new(config.jenkins.clone());
    if jenkins.is_configured() {
        info!("Jenkins trigger enabled");
    } else {
        info!("Jenkins trigger disabled (not configured)");
    }

    // Start the daily summary scheduler
    start_summary_scheduler(Arc::new(store.clone()));
    info!("Daily summary scheduler started");

    let bind_address = config.bind_address();
    let is_development = config.is_development();

    let worker_count = if is_development {
        info!(
            "Starting server at http://{} (4 workers - development mode)",
            bind_address
        );
        4
    } else {
        let cpus = num_cpus::get();
        info!(
            "Starting server at http://{} ({} workers)",
            bind_address, cpus
        );
        cpus
    };

    // Start HTTP server
    let server = HttpServer::new(move || {
        // Configure CORS
        let cors = if is_development {
            // Permissive CORS for the Vite dev server
            Cors::default()
                .allowed_origin("http://localhost:5173")
                .allowed_origin("http://127.0.0.1:5173")
                .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                .allowed_headers(vec![
                    header::AUTHORIZATION,
                    header::ACCEPT,
                    header::CONTENT_TYPE,
                ])
                .max_age(3600)
        } else {
            // Restrictive CORS for production (same-origin only)
            Cors::default()
                .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                .allowed_headers(vec![
                    header::AUTHORIZATION,
                    header::ACCEPT,
                    header::CONTENT_TYPE,
                ])
                .max_age(3600)
        };

        App::new()
            // Add CORS middleware (must be before other middleware)
            .wrap(cors)
            // Add request logging middleware
            .wrap(RequestLogger)
            // Add shared state
            .app_data(web::Data::new(store.clone()))
            .app_data(web::Data::new(verifier.clone()))
            .app_data(web::Data::new(jenkins.clone()))
            // Configure API routes
            .service(
                web::scope("/api")
                    .configure(api::configure_health_routes)
                    .configure(api::configure_dashboard_routes)
                    .configure(api::configure_execution_routes)
                    .configure(api::configure_case_routes)
                    .configure(api::configure_task_routes)
                    .configure(api::configure_jenkins_routes)
                    .configure(api::configure_auth_routes),
            )
            // Swagger UI + OpenAPI document (outside the /api scope so
            // the scope's 404 fallback cannot shadow it)
            .service(
                SwaggerUi::new("/docs/{_:.*}")
                    .url("/api-docs/openapi.json", api::ApiDoc::openapi()),
            )
    });

    server
        .workers(worker_count)
        .bind(&bind_address)?
        .run()
        .await
}
