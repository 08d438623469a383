//! Shared helpers for store-backed integration tests.
//!
//! Both stores run on in-memory SQLite: the results side through the
//! real migrator, the users side through a minimal hand-created table
//! standing in for the externally-owned MariaDB schema.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ConnectionTrait, Database, Set};
use sea_orm_migration::MigratorTrait;

use autotest_dashboard_lib::db::Store;
use autotest_dashboard_lib::entity::{task_execution, test_run_result};
use autotest_dashboard_lib::migration::Migrator;

/// Open a fresh store pair for one test.
pub async fn test_store() -> Store {
    let results = Database::connect("sqlite::memory:")
        .await
        .expect("results store");
    Migrator::up(&results, None).await.expect("migrations");

    let users = Database::connect("sqlite::memory:")
        .await
        .expect("users store");
    users
        .execute_unprepared(
            "CREATE TABLE users (
                id INTEGER PRIMARY KEY,
                username TEXT NOT NULL,
                email TEXT,
                display_name TEXT,
                role TEXT NOT NULL DEFAULT 'user',
                status TEXT NOT NULL DEFAULT 'active'
            )",
        )
        .await
        .expect("users schema");

    Store::from_connections(results, users)
}

/// Insert a user row into the stand-in users table.
pub async fn seed_user(store: &Store, id: i32, username: &str, display_name: Option<&str>) {
    let display = display_name
        .map(|d| format!("'{}'", d))
        .unwrap_or_else(|| "NULL".to_string());
    store
        .users()
        .execute_unprepared(&format!(
            "INSERT INTO users (id, username, email, display_name, role, status)
             VALUES ({}, '{}', NULL, {}, 'tester', 'active')",
            id, username, display
        ))
        .await
        .expect("seed user");
}

/// Insert an execution with an explicit start time and status.
pub async fn seed_execution(
    store: &Store,
    task_name: &str,
    status: &str,
    start_time: Option<DateTime<Utc>>,
) -> i32 {
    let now = Utc::now();
    let model = task_execution::ActiveModel {
        task_id: Set(None),
        task_name: Set(Some(task_name.to_string())),
        status: Set(status.to_string()),
        total_cases: Set(0),
        passed_cases: Set(0),
        failed_cases: Set(0),
        skipped_cases: Set(0),
        duration: Set(0),
        executed_by: Set(1),
        start_time: Set(start_time),
        end_time: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    model
        .insert(store.results())
        .await
        .expect("seed execution")
        .id
}

/// Insert one result row for an execution.
pub async fn seed_result(store: &Store, execution_id: i32, status: &str, duration: Option<i32>) {
    let now = Utc::now();
    let model = test_run_result::ActiveModel {
        execution_id: Set(execution_id),
        case_id: Set(1),
        case_name: Set(format!("case-{}", status)),
        status: Set(status.to_string()),
        duration: Set(duration),
        error_message: Set(None),
        error_stack: Set(None),
        assertions_total: Set(None),
        assertions_passed: Set(None),
        start_time: Set(None),
        end_time: Set(None),
        created_at: Set(now),
        ..Default::default()
    };

    model
        .insert(store.results())
        .await
        .expect("seed result");
}

/// Seed `passed`/`failed`/`skipped`/`error` result rows on a fresh
/// execution started at `start_time`, with the execution counters
/// rolled up the way the runner callback would leave them.
pub async fn seed_day(
    store: &Store,
    start_time: DateTime<Utc>,
    passed: usize,
    failed: usize,
    skipped: usize,
    errors: usize,
) -> i32 {
    let now = Utc::now();
    let total = passed + failed + skipped + errors;
    let model = task_execution::ActiveModel {
        task_id: Set(None),
        task_name: Set(Some("seeded".to_string())),
        status: Set("success".to_string()),
        total_cases: Set(total as i32),
        passed_cases: Set(passed as i32),
        failed_cases: Set(failed as i32),
        skipped_cases: Set(skipped as i32),
        duration: Set(1000),
        executed_by: Set(1),
        start_time: Set(Some(start_time)),
        end_time: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let execution = model
        .insert(store.results())
        .await
        .expect("seed execution")
        .id;
    for _ in 0..passed {
        seed_result(store, execution, "passed", Some(120)).await;
    }
    for _ in 0..failed {
        seed_result(store, execution, "failed", Some(340)).await;
    }
    for _ in 0..skipped {
        seed_result(store, execution, "skipped", None).await;
    }
    for _ in 0..errors {
        seed_result(store, execution, "error", None).await;
    }
    execution
}
