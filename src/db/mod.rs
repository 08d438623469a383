//! Database module providing connection management and queries.
//!
//! `Store` owns the two connections (SQLite for execution data, MariaDB
//! for users) and is constructed once in `main`, then passed to handlers
//! via `web::Data`. No global connection state.

pub mod cases;
pub mod daily_summaries;
pub mod executions;
pub mod tasks;
pub mod users;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;

use crate::config::Config;
use crate::error::{AppError, AppResult};

/// Handle over both relational stores.
#[derive(Clone)]
pub struct Store {
    results: DatabaseConnection,
    users: DatabaseConnection,
}

impl Store {
    /// Connect both stores from configuration.
    pub async fn connect(config: &Config) -> AppResult<Self> {
        let results = connect_one(&config.results_database_url).await?;
        let users = connect_one(&config.users_database_url).await?;
        Ok(Store { results, users })
    }

    /// Build a store from pre-established connections. This is the
    /// injection seam used by tests (both sides may be in-memory SQLite).
    pub fn from_connections(results: DatabaseConnection, users: DatabaseConnection) -> Self {
        Store { results, users }
    }

    /// Connection to the SQLite execution/result/summary tables.
    pub fn results(&self) -> &DatabaseConnection {
        &self.results
    }

    /// Connection to the MariaDB user tables (read-only here).
    pub fn users(&self) -> &DatabaseConnection {
        &self.users
    }

    /// Ping both stores; used by the readiness endpoint.
    pub async fn ping(&self) -> AppResult<()> {
        self.results
            .ping()
            .await
            .map_err(|e| AppError::Store(format!("results store unreachable: {}", e)))?;
        self.users
            .ping()
            .await
            .map_err(|e| AppError::Store(format!("users store unreachable: {}", e)))?;
        Ok(())
    }
}

/// Open one connection with the shared pool settings.
async fn connect_one(url: &str) -> AppResult<DatabaseConnection> {
    let mut options = ConnectOptions::new(url.to_string());
    options
        .max_connections(10)
        .connect_timeout(Duration::from_secs(5))
        .sqlx_logging(false);

    Database::connect(options)
        .await
        .map_err(|e| AppError::Store(format!("Failed to connect to {}: {}", redact_url(url), e)))
}

/// Strip credentials from a connection URL before it reaches a log line.
fn redact_url(url: &str) -> String {
    match url.find("://").zip(url.rfind('@')) {
        Some((scheme_end, at)) if at > scheme_end => {
            format!("{}://***{}", &url[..scheme_end], &url[at..])
        }
        _ => url.to_string(),
    }
}
