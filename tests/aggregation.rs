//! Integration tests for the aggregation service against in-memory
//! SQLite stores.

mod common;

use chrono::{Days, Utc};

use autotest_dashboard_lib::models::{DailySummaryData, TodayExecution};
use autotest_dashboard_lib::services::aggregation;

use common::{seed_day, test_store};

#[tokio::test]
async fn today_breakdown_matches_seeded_results() {
    let store = test_store().await;

    // 10 cases today: 6 passed, 3 failed, 1 skipped.
    seed_day(&store, Utc::now(), 6, 3, 1, 0).await;

    let breakdown = aggregation::get_today_execution(&store).await.unwrap();
    assert_eq!(
        breakdown,
        TodayExecution {
            total: 10,
            passed: 6,
            failed: 3,
            skipped: 1,
        }
    );

    let stats = aggregation::get_stats(&store).await.unwrap();
    assert_eq!(stats.today_runs, 1);
    assert_eq!(stats.today_success_rate, Some(60.0));
}

#[tokio::test]
async fn stats_success_rate_is_null_when_nothing_ran() {
    let store = test_store().await;

    let stats = aggregation::get_stats(&store).await.unwrap();
    assert_eq!(stats.today_runs, 0);
    assert_eq!(stats.today_success_rate, None);
    assert_eq!(stats.running_tasks, 0);
}

#[tokio::test]
async fn empty_date_summarizes_to_zero() {
    let store = test_store().await;
    let date = Utc::now().date_naive() - Days::new(3);

    let summary = aggregation::compute_daily_summary(&store, date).await.unwrap();
    assert_eq!(summary.total_executions, 0);
    assert_eq!(summary.total_cases_run, 0);
    assert_eq!(summary.success_rate, 0.0);
    assert_eq!(summary.avg_duration, 0);
}

#[tokio::test]
async fn summary_counts_and_rate_honor_invariants() {
    let store = test_store().await;
    let date = Utc::now().date_naive() - Days::new(1);
    let start = date.and_hms_opt(9, 30, 0).unwrap().and_utc();

    // 1 passed, 1 failed, 0 skipped, 1 error: the error row counts
    // toward total_cases_run but not toward any of the three buckets.
    seed_day(&store, start, 1, 1, 0, 1).await;

    let summary = aggregation::compute_daily_summary(&store, date).await.unwrap();
    assert_eq!(summary.total_executions, 1);
    assert_eq!(summary.total_cases_run, 3);
    assert!(
        summary.passed_cases + summary.failed_cases + summary.skipped_cases
            <= summary.total_cases_run
    );
    // 1/3 of cases passed, rounded half-up to two decimals.
    assert_eq!(summary.success_rate, 33.33);
    // Mean of the two reported durations (120, 340).
    assert_eq!(summary.avg_duration, 230);
}

#[tokio::test]
async fn recompute_is_idempotent() {
    let store = test_store().await;
    let date = Utc::now().date_naive() - Days::new(1);
    let start = date.and_hms_opt(14, 0, 0).unwrap().and_utc();

    seed_day(&store, start, 4, 1, 1, 0).await;

    let first = aggregation::compute_daily_summary(&store, date).await.unwrap();
    let second = aggregation::compute_daily_summary(&store, date).await.unwrap();
    assert_eq!(first, second);

    // Still exactly one row for the date.
    let rows = store
        .get_daily_summaries_between(date, date + Days::new(1))
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].passed_cases, 4);
}

#[tokio::test]
async fn upsert_overwrites_stale_summary() {
    let store = test_store().await;
    let date = Utc::now().date_naive() - Days::new(2);

    let stale = DailySummaryData {
        summary_date: date,
        total_executions: 99,
        total_cases_run: 99,
        passed_cases: 99,
        failed_cases: 0,
        skipped_cases: 0,
        success_rate: 100.0,
        avg_duration: 9000,
        active_cases_count: 0,
    };
    store.upsert_daily_summary(&stale).await.unwrap();

    // Recomputing from the (empty) raw rows must overwrite, not add.
    let recomputed = aggregation::compute_daily_summary(&store, date).await.unwrap();
    assert_eq!(recomputed.total_cases_run, 0);

    let rows = store
        .get_daily_summaries_between(date, date + Days::new(1))
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].total_cases_run, 0);
    assert_eq!(rows[0].success_rate, 0.0);
}

#[tokio::test]
async fn trend_is_continuous_and_zero_filled() {
    let store = test_store().await;
    let today = Utc::now().date_naive();

    // Summaries exist for D-1 and D-4 only.
    for offset in [1u64, 4] {
        let date = today - Days::new(offset);
        let start = date.and_hms_opt(8, 0, 0).unwrap().and_utc();
        seed_day(&store, start, 2, 0, 0, 0).await;
        aggregation::compute_daily_summary(&store, date).await.unwrap();
    }

    let trend = aggregation::trend_window(&store, today, 5).await.unwrap();

    // Exactly N entries, strictly increasing, ending yesterday.
    assert_eq!(trend.len(), 5);
    for pair in trend.windows(2) {
        assert!(pair[0].date < pair[1].date);
    }
    assert_eq!(trend[0].date, today - Days::new(5));
    assert_eq!(trend[4].date, today - Days::new(1));

    // Gap dates are zero-filled, recorded dates carry their data.
    assert_eq!(trend[4].total_executions, 1);
    assert_eq!(trend[4].success_rate, 100.0);
    assert_eq!(trend[1].total_executions, 1);
    assert_eq!(trend[2].total_executions, 0);
    assert_eq!(trend[2].success_rate, 0.0);
}

#[tokio::test]
async fn comparison_is_null_without_previous_period() {
    let store = test_store().await;

    seed_day(&store, Utc::now(), 3, 1, 0, 0).await;

    let comparison = aggregation::get_comparison(&store, 7).await.unwrap();
    assert_eq!(comparison.runs_comparison, None);
    assert_eq!(comparison.success_rate_comparison, None);
    assert_eq!(comparison.failure_comparison, None);
}

#[tokio::test]
async fn comparison_computes_deltas_between_periods() {
    let store = test_store().await;
    let today = Utc::now().date_naive();

    // Previous period (D-8): one run, 2 passed / 2 failed.
    let previous_start = (today - Days::new(8)).and_hms_opt(10, 0, 0).unwrap().and_utc();
    seed_day(&store, previous_start, 2, 2, 0, 0).await;

    // Current period (D-2): two runs, all passed.
    for day in [2u64, 3] {
        let start = (today - Days::new(day)).and_hms_opt(10, 0, 0).unwrap().and_utc();
        seed_day(&store, start, 2, 0, 0, 0).await;
    }

    let comparison = aggregation::get_comparison(&store, 7).await.unwrap();
    // Runs: 2 vs 1 -> +100%.
    assert_eq!(comparison.runs_comparison, Some(100.0));
    // Success rate: 100% vs 50% -> +50 points.
    assert_eq!(comparison.success_rate_comparison, Some(50.0));
    // Failures: 0 vs 2 -> -100%.
    assert_eq!(comparison.failure_comparison, Some(-100.0));
}

#[tokio::test]
async fn summaries_survive_in_a_file_backed_store() {
    use sea_orm::Database;
    use sea_orm_migration::MigratorTrait;

    let dir = tempfile::tempdir().unwrap();
    let url = format!(
        "sqlite://{}?mode=rwc",
        dir.path().join("results.db").display()
    );

    let date = Utc::now().date_naive() - Days::new(1);
    let expected = {
        let conn = Database::connect(&url).await.unwrap();
        autotest_dashboard_lib::migration::Migrator::up(&conn, None)
            .await
            .unwrap();
        let users = Database::connect("sqlite::memory:").await.unwrap();
        let store = autotest_dashboard_lib::db::Store::from_connections(conn, users);

        let start = date.and_hms_opt(6, 0, 0).unwrap().and_utc();
        seed_day(&store, start, 5, 0, 0, 0).await;
        aggregation::compute_daily_summary(&store, date).await.unwrap()
    };

    // Reopen the same file: the summary row must still be there.
    let conn = Database::connect(&url).await.unwrap();
    let users = Database::connect("sqlite::memory:").await.unwrap();
    let store = autotest_dashboard_lib::db::Store::from_connections(conn, users);

    let rows = store
        .get_daily_summaries_between(date, date + Days::new(1))
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].passed_cases, expected.passed_cases);
    assert_eq!(rows[0].success_rate, 100.0);
}

#[tokio::test]
async fn backfill_covers_requested_window() {
    let store = test_store().await;
    let today = Utc::now().date_naive();

    let start = (today - Days::new(2)).and_hms_opt(12, 0, 0).unwrap().and_utc();
    seed_day(&store, start, 1, 0, 0, 0).await;

    let report = aggregation::backfill(&store, 3).await.unwrap();
    assert_eq!(report.total_days, 3);
    assert_eq!(report.success_count, 3);
    assert!(report.failed_dates.is_empty());

    let rows = store
        .get_daily_summaries_between(today - Days::new(3), today)
        .await
        .unwrap();
    assert_eq!(rows.len(), 3);
}
