//! SeaORM migrations for the SQLite results store.
//!
//! The MariaDB user schema is an external collaborator and is not
//! migrated here.

pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_test_cases;
mod m20260301_000002_create_task_executions;
mod m20260301_000003_create_test_run_results;
mod m20260301_000004_create_daily_summaries;
mod m20260301_000005_create_tasks;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_test_cases::Migration),
            Box::new(m20260301_000002_create_task_executions::Migration),
            Box::new(m20260301_000003_create_test_run_results::Migration),
            Box::new(m20260301_000004_create_daily_summaries::Migration),
            Box::new(m20260301_000005_create_tasks::Migration),
        ]
    }
}
