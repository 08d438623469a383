//! Create test_cases table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TestCase::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TestCase::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TestCase::CaseKey).string().unique_key())
                    .col(ColumnDef::new(TestCase::Name).string().not_null())
                    .col(ColumnDef::new(TestCase::Description).text())
                    .col(ColumnDef::new(TestCase::ProjectId).integer())
                    .col(ColumnDef::new(TestCase::Module).string())
                    .col(ColumnDef::new(TestCase::Owner).string())
                    .col(ColumnDef::new(TestCase::Source).string())
                    .col(
                        ColumnDef::new(TestCase::Priority)
                            .string()
                            .not_null()
                            .default("P2"),
                    )
                    .col(
                        ColumnDef::new(TestCase::CaseType)
                            .string()
                            .not_null()
                            .default("api"),
                    )
                    .col(ColumnDef::new(TestCase::ScriptPath).string())
                    .col(ColumnDef::new(TestCase::Tags).json())
                    .col(ColumnDef::new(TestCase::Config).json())
                    .col(
                        ColumnDef::new(TestCase::Enabled)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(TestCase::CreatedBy).integer())
                    .col(ColumnDef::new(TestCase::UpdatedBy).integer())
                    .col(
                        ColumnDef::new(TestCase::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TestCase::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_test_cases_module")
                    .table(TestCase::Table)
                    .col(TestCase::Module)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TestCase::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum TestCase {
    #[sea_orm(iden = "test_cases")]
    Table,
    Id,
    CaseKey,
    Name,
    Description,
    ProjectId,
    Module,
    Owner,
    Source,
    Priority,
    CaseType,
    ScriptPath,
    Tags,
    Config,
    Enabled,
    CreatedBy,
    UpdatedBy,
    CreatedAt,
    UpdatedAt,
}
