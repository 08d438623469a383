//! Create test_run_results table.

use sea_orm_migration::prelude::*;

use super::m20260301_000002_create_task_executions::TaskExecution;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TestRunResult::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TestRunResult::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TestRunResult::ExecutionId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TestRunResult::CaseId).integer().not_null())
                    .col(ColumnDef::new(TestRunResult::CaseName).string().not_null())
                    .col(
                        ColumnDef::new(TestRunResult::Status)
                            .string()
                            .not_null()
                            .default("error"),
                    )
                    .col(ColumnDef::new(TestRunResult::Duration).integer())
                    .col(ColumnDef::new(TestRunResult::ErrorMessage).text())
                    .col(ColumnDef::new(TestRunResult::ErrorStack).text())
                    .col(ColumnDef::new(TestRunResult::AssertionsTotal).integer())
                    .col(ColumnDef::new(TestRunResult::AssertionsPassed).integer())
                    .col(ColumnDef::new(TestRunResult::StartTime).timestamp_with_time_zone())
                    .col(ColumnDef::new(TestRunResult::EndTime).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(TestRunResult::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TestRunResult::Table, TestRunResult::ExecutionId)
                            .to(TaskExecution::Table, TaskExecution::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_test_run_results_execution_id")
                    .table(TestRunResult::Table)
                    .col(TestRunResult::ExecutionId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TestRunResult::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum TestRunResult {
    #[sea_orm(iden = "test_run_results")]
    Table,
    Id,
    ExecutionId,
    CaseId,
    CaseName,
    Status,
    Duration,
    ErrorMessage,
    ErrorStack,
    AssertionsTotal,
    AssertionsPassed,
    StartTime,
    EndTime,
    CreatedAt,
}
