//! Test run result entity: one row per executed case within an execution.
//!
//! Rows are write-once by the runner callback and never updated.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "test_run_results")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub execution_id: i32,
    pub case_id: i32,
    pub case_name: String,
    pub status: String,
    /// Case duration in milliseconds; null when the runner did not report one.
    pub duration: Option<i32>,
    #[sea_orm(column_type = "Text", nullable)]
    pub error_message: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub error_stack: Option<String>,
    pub assertions_total: Option<i32>,
    pub assertions_passed: Option<i32>,
    pub start_time: Option<DateTimeUtc>,
    pub end_time: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::task_execution::Entity",
        from = "Column::ExecutionId",
        to = "super::task_execution::Column::Id",
        on_delete = "Cascade"
    )]
    TaskExecution,
}

impl Related<super::task_execution::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TaskExecution.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
