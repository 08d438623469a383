//! Task execution entity grouping the case results of one run.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "task_executions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub task_id: Option<i32>,
    pub task_name: Option<String>,
    pub status: String,
    pub total_cases: i32,
    pub passed_cases: i32,
    pub failed_cases: i32,
    pub skipped_cases: i32,
    /// Wall-clock duration of the run in milliseconds.
    pub duration: i32,
    /// User id in the MariaDB store; resolved lazily, no cross-store FK.
    pub executed_by: i32,
    pub start_time: Option<DateTimeUtc>,
    pub end_time: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::test_run_result::Entity")]
    TestRunResult,
}

impl Related<super::test_run_result::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TestRunResult.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
