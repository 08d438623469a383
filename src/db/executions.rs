//! Database queries for task executions and their case results.

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseBackend, EntityTrait, FromQueryResult, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, Statement, TransactionTrait,
};

use crate::entity::task_execution::{
    self, ActiveModel as TaskExecutionActiveModel, Entity as TaskExecution,
};
use crate::entity::test_run_result::{
    self, ActiveModel as TestRunResultActiveModel, Entity as TestRunResult,
};
use crate::error::{AppError, AppResult};
use crate::models::{ExecutionCallbackRequest, ExecutionStatus, RecentRun};

use super::Store;

/// Represents an execution to be inserted (pending until the runner
/// starts it).
pub struct NewExecution {
    pub task_id: Option<i32>,
    pub task_name: Option<String>,
    pub executed_by: i32,
}

/// Result-row totals for one calendar date.
#[derive(Debug, Default, FromQueryResult)]
pub struct DayResultTotals {
    pub total_cases_run: i64,
    pub passed: i64,
    pub failed: i64,
    pub skipped: i64,
    pub avg_duration: Option<f64>,
}

/// Execution-counter totals over a date range, used for comparisons.
#[derive(Debug, Default, FromQueryResult)]
pub struct RangeTotals {
    pub runs: i64,
    pub passed: i64,
    pub failed: i64,
    pub total: i64,
}

impl Store {
    /// Insert a new pending execution.
    pub async fn insert_execution(&self, new: NewExecution) -> AppResult<task_execution::Model> {
        let now = Utc::now();

        let model = TaskExecutionActiveModel {
            task_id: Set(new.task_id),
            task_name: Set(new.task_name),
            status: Set(ExecutionStatus::Pending.as_str().to_string()),
            total_cases: Set(0),
            passed_cases: Set(0),
            failed_cases: Set(0),
            skipped_cases: Set(0),
            duration: Set(0),
            executed_by: Set(new.executed_by),
            start_time: Set(None),
            end_time: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(self.results())
            .await
            .map_err(|e| AppError::Store(format!("Failed to insert execution: {}", e)))?;

        Ok(result)
    }

    /// Get a single execution by id.
    pub async fn get_execution_by_id(&self, id: i32) -> AppResult<Option<task_execution::Model>> {
        let result = TaskExecution::find_by_id(id)
            .one(self.results())
            .await
            .map_err(|e| AppError::Store(format!("Failed to get execution: {}", e)))?;

        Ok(result)
    }

    /// Mark an execution as running and stamp its start time.
    pub async fn mark_execution_running(&self, id: i32) -> AppResult<task_execution::Model> {
        let execution = self
            .get_execution_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Execution {}", id)))?;

        let mut active: TaskExecutionActiveModel = execution.into();
        active.status = Set(ExecutionStatus::Running.as_str().to_string());
        active.start_time = Set(Some(Utc::now()));
        active.updated_at = Set(Utc::now());

        let updated = active
            .update(self.results())
            .await
            .map_err(|e| AppError::Store(format!("Failed to mark execution running: {}", e)))?;

        Ok(updated)
    }

    /// Record a runner callback: insert the result rows and roll their
    /// counts up into the execution, atomically.
    ///
    /// Result rows are write-once; recording a callback twice for the
    /// same execution is rejected before any row is written.
    pub async fn record_callback(&self, req: &ExecutionCallbackRequest) -> AppResult<()> {
        let execution = self
            .get_execution_by_id(req.execution_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Execution {}", req.execution_id)))?;

        if ExecutionStatus::parse(&execution.status).is_some_and(|s| s.is_terminal()) {
            return Err(AppError::Validation(format!(
                "Execution {} already has a terminal result",
                req.execution_id
            )));
        }

        let now = Utc::now();
        let passed = req
            .results
            .iter()
            .filter(|r| r.status == crate::models::ResultStatus::Passed)
            .count() as i32;
        let failed = req
            .results
            .iter()
            .filter(|r| r.status == crate::models::ResultStatus::Failed)
            .count() as i32;
        let skipped = req
            .results
            .iter()
            .filter(|r| r.status == crate::models::ResultStatus::Skipped)
            .count() as i32;

        let txn = self
            .results()
            .begin()
            .await
            .map_err(|e| AppError::Store(format!("Failed to open transaction: {}", e)))?;

        for result in &req.results {
            let row = TestRunResultActiveModel {
                execution_id: Set(req.execution_id),
                case_id: Set(result.case_id),
                case_name: Set(result.case_name.clone()),
                status: Set(result.status.as_str().to_string()),
                duration: Set(result.duration),
                error_message: Set(result.error_message.clone()),
                error_stack: Set(result.error_stack.clone()),
                assertions_total: Set(result.assertions_total),
                assertions_passed: Set(result.assertions_passed),
                start_time: Set(result.start_time),
                end_time: Set(result.end_time),
                created_at: Set(now),
                ..Default::default()
            };
            row.insert(&txn)
                .await
                .map_err(|e| AppError::Store(format!("Failed to insert result row: {}", e)))?;
        }

        let mut active: TaskExecutionActiveModel = execution.into();
        active.status = Set(req.status.as_str().to_string());
        active.total_cases = Set(req.results.len() as i32);
        active.passed_cases = Set(passed);
        active.failed_cases = Set(failed);
        active.skipped_cases = Set(skipped);
        active.duration = Set(req.duration);
        active.end_time = Set(Some(now));
        active.updated_at = Set(now);
        active
            .update(&txn)
            .await
            .map_err(|e| AppError::Store(format!("Failed to update execution: {}", e)))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Store(format!("Failed to commit callback: {}", e)))?;

        Ok(())
    }

    /// Overwrite an execution's status without touching its counters.
    pub async fn update_execution_status(
        &self,
        id: i32,
        status: ExecutionStatus,
    ) -> AppResult<()> {
        let execution = self
            .get_execution_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Execution {}", id)))?;

        let mut active: TaskExecutionActiveModel = execution.into();
        active.status = Set(status.as_str().to_string());
        active.updated_at = Set(Utc::now());
        active
            .update(self.results())
            .await
            .map_err(|e| AppError::Store(format!("Failed to update execution status: {}", e)))?;

        Ok(())
    }

    /// Get an execution's case results, in insertion order.
    pub async fn get_results_by_execution_id(
        &self,
        execution_id: i32,
    ) -> AppResult<Vec<test_run_result::Model>> {
        let results = TestRunResult::find()
            .filter(test_run_result::Column::ExecutionId.eq(execution_id))
            .order_by_asc(test_run_result::Column::Id)
            .all(self.results())
            .await
            .map_err(|e| AppError::Store(format!("Failed to get execution results: {}", e)))?;

        Ok(results)
    }

    /// List the most recent executions.
    pub async fn list_recent_executions(
        &self,
        limit: u64,
    ) -> AppResult<Vec<task_execution::Model>> {
        let executions = TaskExecution::find()
            .order_by_desc(task_execution::Column::StartTime)
            .order_by_desc(task_execution::Column::Id)
            .limit(limit)
            .all(self.results())
            .await
            .map_err(|e| AppError::Store(format!("Failed to list executions: {}", e)))?;

        Ok(executions)
    }

    /// Paginated recent runs with executor identity resolved from the
    /// users store. Ordering: most recent start time first, ties broken
    /// by execution id descending.
    pub async fn query_recent_runs(
        &self,
        offset: u64,
        limit: u64,
    ) -> AppResult<(Vec<RecentRun>, u64)> {
        let total = TaskExecution::find()
            .count(self.results())
            .await
            .map_err(|e| AppError::Store(format!("Failed to count executions: {}", e)))?;

        let executions = TaskExecution::find()
            .order_by_desc(task_execution::Column::StartTime)
            .order_by_desc(task_execution::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(self.results())
            .await
            .map_err(|e| AppError::Store(format!("Failed to query recent runs: {}", e)))?;

        let user_ids: Vec<i32> = executions.iter().map(|e| e.executed_by).collect();
        let names = self.get_user_display_names(&user_ids).await?;

        let runs = executions
            .into_iter()
            .map(|e| RecentRun {
                id: e.id,
                suite_name: e.task_name,
                status: e.status,
                duration: e.duration,
                start_time: e.start_time,
                total_cases: e.total_cases,
                passed_cases: e.passed_cases,
                failed_cases: e.failed_cases,
                executed_by: names.get(&e.executed_by).cloned(),
                executed_by_id: e.executed_by,
            })
            .collect();

        Ok((runs, total))
    }

    /// Count executions currently in the `running` state.
    pub async fn count_running_executions(&self) -> AppResult<u64> {
        let count = TaskExecution::find()
            .filter(task_execution::Column::Status.eq(ExecutionStatus::Running.as_str()))
            .count(self.results())
            .await
            .map_err(|e| AppError::Store(format!("Failed to count running executions: {}", e)))?;

        Ok(count)
    }

    /// Count executions whose start time falls on `date` (UTC).
    pub async fn count_executions_on(&self, date: NaiveDate) -> AppResult<u64> {
        #[derive(FromQueryResult)]
        struct CountRow {
            count: i64,
        }

        let row = CountRow::find_by_statement(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT COUNT(*) AS count FROM task_executions WHERE date(start_time) = ?",
            [date.to_string().into()],
        ))
        .one(self.results())
        .await
        .map_err(|e| AppError::Store(format!("Failed to count executions: {}", e)))?;

        Ok(row.map(|r| r.count.max(0) as u64).unwrap_or(0))
    }

    /// Aggregate result rows by status for all executions started on
    /// `date` (UTC). `avg_duration` ignores rows without a duration.
    pub async fn scan_day_result_totals(&self, date: NaiveDate) -> AppResult<DayResultTotals> {
        let totals = DayResultTotals::find_by_statement(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            r#"
            SELECT
                COUNT(r.id) AS total_cases_run,
                COALESCE(SUM(CASE WHEN r.status = 'passed' THEN 1 ELSE 0 END), 0) AS passed,
                COALESCE(SUM(CASE WHEN r.status = 'failed' THEN 1 ELSE 0 END), 0) AS failed,
                COALESCE(SUM(CASE WHEN r.status = 'skipped' THEN 1 ELSE 0 END), 0) AS skipped,
                AVG(r.duration) AS avg_duration
            FROM test_run_results r
            INNER JOIN task_executions e ON e.id = r.execution_id
            WHERE date(e.start_time) = ?
            "#,
            [date.to_string().into()],
        ))
        .one(self.results())
        .await
        .map_err(|e| AppError::Store(format!("Failed to scan day totals: {}", e)))?;

        Ok(totals.unwrap_or_default())
    }

    /// Aggregate execution counters over `[from, to)` (UTC dates), used
    /// for period-over-period comparison.
    pub async fn scan_range_totals(
        &self,
        from: NaiveDate,
        to_exclusive: NaiveDate,
    ) -> AppResult<RangeTotals> {
        let totals = RangeTotals::find_by_statement(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            r#"
            SELECT
                COUNT(*) AS runs,
                COALESCE(SUM(passed_cases), 0) AS passed,
                COALESCE(SUM(failed_cases), 0) AS failed,
                COALESCE(SUM(passed_cases + failed_cases + skipped_cases), 0) AS total
            FROM task_executions
            WHERE date(start_time) >= ? AND date(start_time) < ?
            "#,
            [from.to_string().into(), to_exclusive.to_string().into()],
        ))
        .one(self.results())
        .await
        .map_err(|e| AppError::Store(format!("Failed to scan range totals: {}", e)))?;

        Ok(totals.unwrap_or_default())
    }
}
