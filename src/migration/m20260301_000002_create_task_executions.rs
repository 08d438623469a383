//! Create task_executions table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TaskExecution::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TaskExecution::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TaskExecution::TaskId).integer())
                    .col(ColumnDef::new(TaskExecution::TaskName).string())
                    .col(
                        ColumnDef::new(TaskExecution::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(TaskExecution::TotalCases)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(TaskExecution::PassedCases)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(TaskExecution::FailedCases)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(TaskExecution::SkippedCases)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(TaskExecution::Duration)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(TaskExecution::ExecutedBy)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TaskExecution::StartTime).timestamp_with_time_zone())
                    .col(ColumnDef::new(TaskExecution::EndTime).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(TaskExecution::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TaskExecution::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Recent-runs ordering and per-day scans both hit start_time.
        manager
            .create_index(
                Index::create()
                    .name("idx_task_executions_start_time")
                    .table(TaskExecution::Table)
                    .col(TaskExecution::StartTime)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_task_executions_status")
                    .table(TaskExecution::Table)
                    .col(TaskExecution::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TaskExecution::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum TaskExecution {
    #[sea_orm(iden = "task_executions")]
    Table,
    Id,
    TaskId,
    TaskName,
    Status,
    TotalCases,
    PassedCases,
    FailedCases,
    SkippedCases,
    Duration,
    ExecutedBy,
    StartTime,
    EndTime,
    CreatedAt,
    UpdatedAt,
}
