//! Integration tests for execution writes and the recent-runs query.

mod common;

use chrono::{Duration, Utc};

use autotest_dashboard_lib::db::executions::NewExecution;
use autotest_dashboard_lib::error::AppError;
use autotest_dashboard_lib::models::{
    CaseResultPayload, ExecutionCallbackRequest, ExecutionStatus, ResultStatus,
};
use autotest_dashboard_lib::services::aggregation;

use common::{seed_execution, seed_user, test_store};

fn result_payload(case_id: i32, status: ResultStatus, duration: Option<i32>) -> CaseResultPayload {
    CaseResultPayload {
        case_id,
        case_name: format!("case {}", case_id),
        status,
        duration,
        error_message: None,
        error_stack: None,
        assertions_total: None,
        assertions_passed: None,
        start_time: None,
        end_time: None,
    }
}

#[tokio::test]
async fn callback_rolls_results_up_into_the_execution() {
    let store = test_store().await;

    let execution = store
        .insert_execution(NewExecution {
            task_id: None,
            task_name: Some("smoke".to_string()),
            executed_by: 1,
        })
        .await
        .unwrap();
    store.mark_execution_running(execution.id).await.unwrap();

    let request = ExecutionCallbackRequest {
        execution_id: execution.id,
        status: ExecutionStatus::Failed,
        results: vec![
            result_payload(1, ResultStatus::Passed, Some(100)),
            result_payload(2, ResultStatus::Passed, Some(150)),
            result_payload(3, ResultStatus::Failed, Some(700)),
            result_payload(4, ResultStatus::Skipped, None),
        ],
        duration: 2500,
    };
    store.record_callback(&request).await.unwrap();

    let updated = store
        .get_execution_by_id(execution.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.status, "failed");
    assert_eq!(updated.total_cases, 4);
    assert_eq!(updated.passed_cases, 2);
    assert_eq!(updated.failed_cases, 1);
    assert_eq!(updated.skipped_cases, 1);
    assert_eq!(updated.duration, 2500);
    assert!(updated.end_time.is_some());

    let rows = store
        .get_results_by_execution_id(execution.id)
        .await
        .unwrap();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0].status, "passed");

    // The execution started today, so its rows land in today's breakdown.
    let breakdown = aggregation::get_today_execution(&store).await.unwrap();
    assert_eq!(breakdown.total, 4);
    assert_eq!(breakdown.passed, 2);
}

#[tokio::test]
async fn callback_is_rejected_after_terminal_report() {
    let store = test_store().await;

    let execution = store
        .insert_execution(NewExecution {
            task_id: None,
            task_name: None,
            executed_by: 1,
        })
        .await
        .unwrap();
    store.mark_execution_running(execution.id).await.unwrap();

    let request = ExecutionCallbackRequest {
        execution_id: execution.id,
        status: ExecutionStatus::Success,
        results: vec![result_payload(1, ResultStatus::Passed, Some(50))],
        duration: 100,
    };
    store.record_callback(&request).await.unwrap();

    // Result rows are write-once: a second report must not add rows.
    let err = store.record_callback(&request).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let rows = store
        .get_results_by_execution_id(execution.id)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn callback_for_unknown_execution_is_not_found() {
    let store = test_store().await;

    let request = ExecutionCallbackRequest {
        execution_id: 4242,
        status: ExecutionStatus::Success,
        results: vec![],
        duration: 0,
    };

    let err = store.record_callback(&request).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn mark_running_stamps_start_time() {
    let store = test_store().await;

    let execution = store
        .insert_execution(NewExecution {
            task_id: None,
            task_name: None,
            executed_by: 7,
        })
        .await
        .unwrap();
    assert!(execution.start_time.is_none());

    let running = store.mark_execution_running(execution.id).await.unwrap();
    assert_eq!(running.status, "running");
    assert!(running.start_time.is_some());

    assert_eq!(store.count_running_executions().await.unwrap(), 1);
}

#[tokio::test]
async fn recent_runs_order_and_executor_resolution() {
    let store = test_store().await;
    seed_user(&store, 1, "qa-bot", Some("QA Bot")).await;

    let now = Utc::now();
    let older = seed_execution(&store, "nightly", "success", Some(now - Duration::hours(2))).await;
    let tied_low = seed_execution(&store, "smoke", "failed", Some(now)).await;
    let tied_high = seed_execution(&store, "smoke", "success", Some(now)).await;

    let (runs, total) = store.query_recent_runs(0, 10).await.unwrap();
    assert_eq!(total, 3);

    // Most recent start time first; equal start times fall back to the
    // higher execution id.
    assert_eq!(runs[0].id, tied_high);
    assert_eq!(runs[1].id, tied_low);
    assert_eq!(runs[2].id, older);

    // Display name preferred, username as fallback.
    assert_eq!(runs[0].executed_by.as_deref(), Some("QA Bot"));

    // Pagination slices the same ordering.
    let (page2, _) = store.query_recent_runs(2, 2).await.unwrap();
    assert_eq!(page2.len(), 1);
    assert_eq!(page2[0].id, older);
}

#[tokio::test]
async fn recent_runs_with_unknown_executor_keep_the_id() {
    let store = test_store().await;

    let id = seed_execution(&store, "orphan", "success", Some(Utc::now())).await;

    let (runs, _) = store.query_recent_runs(0, 10).await.unwrap();
    assert_eq!(runs[0].id, id);
    assert_eq!(runs[0].executed_by, None);
    assert_eq!(runs[0].executed_by_id, 1);
}
