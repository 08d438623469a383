//! Daily summary entity: one precomputed aggregate row per calendar date.
//!
//! The unique `summary_date` constraint is what serializes concurrent
//! same-date upserts.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "daily_summaries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub summary_date: Date,
    pub total_executions: i32,
    pub total_cases_run: i32,
    pub passed_cases: i32,
    pub failed_cases: i32,
    pub skipped_cases: i32,
    /// 0-100 with two-decimal precision; 0 when no cases ran that day.
    pub success_rate: f64,
    /// Mean case duration in milliseconds, rounded; 0 when no durations.
    pub avg_duration: i32,
    pub active_cases_count: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
