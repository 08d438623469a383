//! Daily summary computation, trend series, and live dashboard stats.
//!
//! All calendar arithmetic is in UTC. Summaries follow the T-1
//! convention: the newest chartable date is yesterday; "today" figures
//! are always recomputed live from the raw rows, never read from the
//! summary table.

use chrono::{Days, NaiveDate, Utc};

use crate::db::Store;
use crate::error::{AppError, AppResult};
use crate::models::{
    BackfillReport, ComparisonData, DailySummaryData, DashboardStats, TodayExecution, TrendPoint,
};

/// Round half-up to two decimals.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Pass rate in percent; `None` until at least one case ran.
fn success_rate(passed: i64, total: i64) -> Option<f64> {
    if total > 0 {
        Some(round2(passed as f64 / total as f64 * 100.0))
    } else {
        None
    }
}

/// Compute and persist the summary for one calendar date.
///
/// Scans every result row whose parent execution started on `date`,
/// counts by status, and upserts the aggregate keyed by the unique date
/// constraint. Recomputing a date with no new data yields an identical
/// row; it never double-counts.
pub async fn compute_daily_summary(store: &Store, date: NaiveDate) -> AppResult<DailySummaryData> {
    let totals = store.scan_day_result_totals(date).await?;
    let total_executions = store.count_executions_on(date).await?;
    let active_cases = store.count_enabled_cases().await?;

    let data = DailySummaryData {
        summary_date: date,
        total_executions: total_executions as i32,
        total_cases_run: totals.total_cases_run as i32,
        passed_cases: totals.passed as i32,
        failed_cases: totals.failed as i32,
        skipped_cases: totals.skipped as i32,
        // Persisted summaries store 0 for an empty day; only live
        // "today" figures are nullable.
        success_rate: success_rate(totals.passed, totals.total_cases_run).unwrap_or(0.0),
        avg_duration: totals.avg_duration.map(|d| d.round() as i32).unwrap_or(0),
        active_cases_count: active_cases as i32,
    };

    store.upsert_daily_summary(&data).await?;

    Ok(data)
}

/// Trend series for the `days` dates ending yesterday (T-1), strictly
/// ascending, zero-filled for dates with no stored summary.
pub async fn get_trend(store: &Store, days: u32) -> AppResult<Vec<TrendPoint>> {
    trend_window(store, Utc::now().date_naive(), days).await
}

/// Trend series for the `days` dates before `end_exclusive`.
pub async fn trend_window(
    store: &Store,
    end_exclusive: NaiveDate,
    days: u32,
) -> AppResult<Vec<TrendPoint>> {
    let from = end_exclusive
        .checked_sub_days(Days::new(days as u64))
        .ok_or_else(|| AppError::Validation("Trend window out of range".to_string()))?;

    let stored = store
        .get_daily_summaries_between(from, end_exclusive)
        .await?;
    let mut by_date: std::collections::HashMap<NaiveDate, TrendPoint> = stored
        .into_iter()
        .map(|row| {
            (
                row.summary_date,
                TrendPoint {
                    date: row.summary_date,
                    total_executions: row.total_executions,
                    passed_cases: row.passed_cases,
                    failed_cases: row.failed_cases,
                    skipped_cases: row.skipped_cases,
                    success_rate: row.success_rate,
                },
            )
        })
        .collect();

    let mut points = Vec::with_capacity(days as usize);
    let mut date = from;
    while date < end_exclusive {
        points.push(
            by_date
                .remove(&date)
                .unwrap_or_else(|| TrendPoint::empty(date)),
        );
        date = date
            .checked_add_days(Days::new(1))
            .ok_or_else(|| AppError::Validation("Trend window out of range".to_string()))?;
    }

    Ok(points)
}

/// Today's pass/fail/skip breakdown, recomputed live.
pub async fn get_today_execution(store: &Store) -> AppResult<TodayExecution> {
    day_breakdown(store, Utc::now().date_naive()).await
}

/// Pass/fail/skip breakdown for one date.
pub async fn day_breakdown(store: &Store, date: NaiveDate) -> AppResult<TodayExecution> {
    let totals = store.scan_day_result_totals(date).await?;

    Ok(TodayExecution {
        total: totals.total_cases_run.max(0) as u64,
        passed: totals.passed.max(0) as u64,
        failed: totals.failed.max(0) as u64,
        skipped: totals.skipped.max(0) as u64,
    })
}

/// Dashboard card figures, recomputed live.
pub async fn get_stats(store: &Store) -> AppResult<DashboardStats> {
    let today = Utc::now().date_naive();
    let totals = store.scan_day_result_totals(today).await?;
    let today_runs = store.count_executions_on(today).await?;
    let total_cases = store.count_enabled_cases().await?;
    let running_tasks = store.count_running_executions().await?;

    Ok(DashboardStats {
        total_cases,
        today_runs,
        today_success_rate: success_rate(totals.passed, totals.total_cases_run),
        running_tasks,
    })
}

/// Period-over-period comparison between the last `days` days and the
/// `days` before them. Deltas are `None` when the previous period has
/// no base.
pub async fn get_comparison(store: &Store, days: u32) -> AppResult<ComparisonData> {
    let today = Utc::now().date_naive();
    let tomorrow = today
        .checked_add_days(Days::new(1))
        .ok_or_else(|| AppError::Validation("Comparison window out of range".to_string()))?;
    let period_start = today
        .checked_sub_days(Days::new(days as u64))
        .ok_or_else(|| AppError::Validation("Comparison window out of range".to_string()))?;
    let previous_start = today
        .checked_sub_days(Days::new(days as u64 * 2))
        .ok_or_else(|| AppError::Validation("Comparison window out of range".to_string()))?;

    let current = store.scan_range_totals(period_start, tomorrow).await?;
    let previous = store.scan_range_totals(previous_start, period_start).await?;

    let runs_comparison = if previous.runs > 0 {
        Some(round2(
            (current.runs - previous.runs) as f64 / previous.runs as f64 * 100.0,
        ))
    } else {
        None
    };

    let current_rate = success_rate(current.passed, current.total).unwrap_or(0.0);
    let previous_rate = success_rate(previous.passed, previous.total).unwrap_or(0.0);
    let success_rate_comparison = if previous.total > 0 {
        Some(round2(current_rate - previous_rate))
    } else {
        None
    };

    let failure_comparison = if previous.failed > 0 {
        Some(round2(
            (current.failed - previous.failed) as f64 / previous.failed as f64 * 100.0,
        ))
    } else {
        None
    };

    Ok(ComparisonData {
        runs_comparison,
        success_rate_comparison,
        failure_comparison,
    })
}

/// Recompute summaries for the last `days` T-1 dates.
pub async fn backfill(store: &Store, days: u32) -> AppResult<BackfillReport> {
    let today = Utc::now().date_naive();
    let mut success_count = 0;
    let mut failed_dates = Vec::new();

    for offset in 1..=days {
        let Some(date) = today.checked_sub_days(Days::new(offset as u64)) else {
            break;
        };
        match compute_daily_summary(store, date).await {
            Ok(_) => success_count += 1,
            Err(e) => {
                tracing::warn!("Backfill failed for {}: {}", date, e);
                failed_dates.push(date);
            }
        }
    }

    Ok(BackfillReport {
        total_days: days,
        success_count,
        failed_dates,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2_half_up() {
        assert_eq!(round2(33.333), 33.33);
        assert_eq!(round2(66.666), 66.67);
        assert_eq!(round2(87.5), 87.5);
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn test_success_rate_none_when_empty() {
        assert_eq!(success_rate(0, 0), None);
        assert_eq!(success_rate(6, 10), Some(60.0));
        assert_eq!(success_rate(1, 3), Some(33.33));
        assert_eq!(success_rate(2, 3), Some(66.67));
    }
}
