//! Create daily_summaries table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DailySummary::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DailySummary::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    // Unique key: at most one row per date, and the anchor
                    // for the atomic upsert.
                    .col(
                        ColumnDef::new(DailySummary::SummaryDate)
                            .date()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(DailySummary::TotalExecutions)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(DailySummary::TotalCasesRun)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(DailySummary::PassedCases)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(DailySummary::FailedCases)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(DailySummary::SkippedCases)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(DailySummary::SuccessRate)
                            .double()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(DailySummary::AvgDuration)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(DailySummary::ActiveCasesCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(DailySummary::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DailySummary::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DailySummary::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum DailySummary {
    #[sea_orm(iden = "daily_summaries")]
    Table,
    Id,
    SummaryDate,
    TotalExecutions,
    TotalCasesRun,
    PassedCases,
    FailedCases,
    SkippedCases,
    SuccessRate,
    AvgDuration,
    ActiveCasesCount,
    CreatedAt,
    UpdatedAt,
}
