//! Daily summary scheduler.
//!
//! Refreshes yesterday's summary shortly after midnight UTC so the
//! trend chart always has a complete T-1 data source, even when nobody
//! triggers a manual refresh.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Days, NaiveTime, Utc};
use tracing::{error, info};

use crate::db::Store;
use crate::services::aggregation;

/// Minutes past midnight at which the daily refresh runs.
const RUN_AT_MINUTES: u32 = 5;

/// Start the summary scheduler background task.
///
/// The task sleeps until the next run time, refreshes the summary for
/// the date that just ended, and reschedules. It lives for the whole
/// process and aborts with it.
pub fn start_summary_scheduler(store: Arc<Store>) {
    tokio::spawn(async move {
        info!(
            "Starting daily summary scheduler (runs at 00:{:02} UTC)",
            RUN_AT_MINUTES
        );

        loop {
            let delay = duration_until_next_run(Utc::now());
            tokio::time::sleep(delay).await;

            let Some(yesterday) = Utc::now().date_naive().checked_sub_days(Days::new(1)) else {
                continue;
            };

            match aggregation::compute_daily_summary(&store, yesterday).await {
                Ok(summary) => info!(
                    "Daily summary refreshed for {}: {} executions, {} cases",
                    yesterday, summary.total_executions, summary.total_cases_run
                ),
                Err(e) => error!("Daily summary refresh failed for {}: {}", yesterday, e),
            }
        }
    });
}

/// Time remaining until the next scheduled run (00:05 UTC tomorrow, or
/// later today when invoked before that).
fn duration_until_next_run(now: DateTime<Utc>) -> Duration {
    let run_time = NaiveTime::from_hms_opt(0, RUN_AT_MINUTES, 0)
        .unwrap_or(NaiveTime::MIN);

    let today_run = now.date_naive().and_time(run_time).and_utc();
    let next_run = if today_run > now {
        today_run
    } else {
        today_run + chrono::Duration::days(1)
    };

    (next_run - now).to_std().unwrap_or(Duration::from_secs(60))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_next_run_later_today() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 0, 1, 0).unwrap();
        let delay = duration_until_next_run(now);
        assert_eq!(delay, Duration::from_secs(4 * 60));
    }

    #[test]
    fn test_next_run_tomorrow() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let delay = duration_until_next_run(now);
        assert_eq!(delay, Duration::from_secs(12 * 3600 + 5 * 60));
    }

    #[test]
    fn test_next_run_exactly_at_run_time_waits_a_day() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 0, 5, 0).unwrap();
        let delay = duration_until_next_run(now);
        assert_eq!(delay, Duration::from_secs(24 * 3600));
    }
}
