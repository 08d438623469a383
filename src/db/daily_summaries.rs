//! Database queries for the daily summary table.

use chrono::{NaiveDate, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::entity::daily_summary::{
    self, ActiveModel as DailySummaryActiveModel, Entity as DailySummary,
};
use crate::error::{AppError, AppResult};
use crate::models::DailySummaryData;

use super::Store;

impl Store {
    /// Upsert one computed summary, keyed by the unique date constraint.
    ///
    /// `ON CONFLICT (summary_date) DO UPDATE` makes recomputation
    /// overwrite rather than double-count, and serializes concurrent
    /// writers for the same date at the database level.
    pub async fn upsert_daily_summary(&self, data: &DailySummaryData) -> AppResult<()> {
        let now = Utc::now();

        let model = DailySummaryActiveModel {
            summary_date: Set(data.summary_date),
            total_executions: Set(data.total_executions),
            total_cases_run: Set(data.total_cases_run),
            passed_cases: Set(data.passed_cases),
            failed_cases: Set(data.failed_cases),
            skipped_cases: Set(data.skipped_cases),
            success_rate: Set(data.success_rate),
            avg_duration: Set(data.avg_duration),
            active_cases_count: Set(data.active_cases_count),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        DailySummary::insert(model)
            .on_conflict(
                OnConflict::column(daily_summary::Column::SummaryDate)
                    .update_columns([
                        daily_summary::Column::TotalExecutions,
                        daily_summary::Column::TotalCasesRun,
                        daily_summary::Column::PassedCases,
                        daily_summary::Column::FailedCases,
                        daily_summary::Column::SkippedCases,
                        daily_summary::Column::SuccessRate,
                        daily_summary::Column::AvgDuration,
                        daily_summary::Column::ActiveCasesCount,
                        daily_summary::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(self.results())
            .await
            .map_err(|e| AppError::Store(format!("Failed to upsert daily summary: {}", e)))?;

        Ok(())
    }

    /// Get stored summaries with `from <= summary_date < to`, ascending.
    pub async fn get_daily_summaries_between(
        &self,
        from: NaiveDate,
        to_exclusive: NaiveDate,
    ) -> AppResult<Vec<daily_summary::Model>> {
        let rows = DailySummary::find()
            .filter(daily_summary::Column::SummaryDate.gte(from))
            .filter(daily_summary::Column::SummaryDate.lt(to_exclusive))
            .order_by_asc(daily_summary::Column::SummaryDate)
            .all(self.results())
            .await
            .map_err(|e| AppError::Store(format!("Failed to get daily summaries: {}", e)))?;

        Ok(rows)
    }
}
