//! Dashboard aggregation models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// Card figures for the dashboard header.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DashboardStats {
    /// Enabled test cases.
    pub total_cases: u64,
    /// Executions started today.
    pub today_runs: u64,
    /// Today's pass rate in percent; `null` until a case has run today.
    pub today_success_rate: Option<f64>,
    /// Executions currently in the `running` state.
    pub running_tasks: u64,
}

/// Today's pass/fail/skip breakdown, recomputed live from result rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct TodayExecution {
    pub total: u64,
    pub passed: u64,
    pub failed: u64,
    pub skipped: u64,
}

/// One point of the trend series. Dates with no executions are
/// zero-filled so the chart axis stays continuous.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub total_executions: i32,
    pub passed_cases: i32,
    pub failed_cases: i32,
    pub skipped_cases: i32,
    pub success_rate: f64,
}

impl TrendPoint {
    /// Zero-filled point for a date with no recorded executions.
    pub fn empty(date: NaiveDate) -> Self {
        TrendPoint {
            date,
            total_executions: 0,
            passed_cases: 0,
            failed_cases: 0,
            skipped_cases: 0,
            success_rate: 0.0,
        }
    }
}

/// Computed aggregate for one calendar date, as persisted in the
/// summary table.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DailySummaryData {
    pub summary_date: NaiveDate,
    pub total_executions: i32,
    pub total_cases_run: i32,
    pub passed_cases: i32,
    pub failed_cases: i32,
    pub skipped_cases: i32,
    /// 0-100, rounded half-up to two decimals; 0 when no cases ran.
    pub success_rate: f64,
    /// Mean case duration in ms, rounded; 0 when no durations reported.
    pub avg_duration: i32,
    pub active_cases_count: i32,
}

/// Period-over-period deltas. Each figure is `null` when the previous
/// period has no base to compare against.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ComparisonData {
    pub runs_comparison: Option<f64>,
    pub success_rate_comparison: Option<f64>,
    pub failure_comparison: Option<f64>,
}

/// One entry of the recent-runs list.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecentRun {
    pub id: i32,
    pub suite_name: Option<String>,
    pub status: String,
    pub duration: i32,
    pub start_time: Option<DateTime<Utc>>,
    pub total_cases: i32,
    pub passed_cases: i32,
    pub failed_cases: i32,
    pub executed_by: Option<String>,
    pub executed_by_id: i32,
}

/// Outcome of a summary backfill pass.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BackfillReport {
    pub total_days: u32,
    pub success_count: u32,
    pub failed_dates: Vec<NaiveDate>,
}
