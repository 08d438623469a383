//! Execution status types and runner callback payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Lifecycle status of a task execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    Pending,
    Running,
    Success,
    Failed,
    Cancelled,
}

impl ExecutionStatus {
    /// Parse from the stored string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "running" => Some(Self::Running),
            "success" => Some(Self::Success),
            "failed" => Some(Self::Failed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// String form as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Success => "success",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Statuses a runner callback is allowed to report.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Failed | Self::Cancelled)
    }
}

/// Outcome of a single executed case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResultStatus {
    Passed,
    Failed,
    Skipped,
    Error,
}

impl ResultStatus {
    /// Parse from the stored string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "passed" => Some(Self::Passed),
            "failed" => Some(Self::Failed),
            "skipped" => Some(Self::Skipped),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    /// String form as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
            Self::Error => "error",
        }
    }
}

/// One case result reported by the runner callback.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CaseResultPayload {
    pub case_id: i32,
    pub case_name: String,
    pub status: ResultStatus,
    /// Case duration in milliseconds.
    pub duration: Option<i32>,
    pub error_message: Option<String>,
    pub error_stack: Option<String>,
    pub assertions_total: Option<i32>,
    pub assertions_passed: Option<i32>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

/// Runner callback body: the terminal report for one execution.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ExecutionCallbackRequest {
    pub execution_id: i32,
    pub status: ExecutionStatus,
    pub results: Vec<CaseResultPayload>,
    /// Wall-clock duration of the whole run in milliseconds.
    #[serde(default)]
    pub duration: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execution_status_round_trip() {
        for s in ["pending", "running", "success", "failed", "cancelled"] {
            let parsed = ExecutionStatus::parse(s).unwrap();
            assert_eq!(parsed.as_str(), s);
        }
        assert!(ExecutionStatus::parse("done").is_none());
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!ExecutionStatus::Pending.is_terminal());
        assert!(!ExecutionStatus::Running.is_terminal());
        assert!(ExecutionStatus::Success.is_terminal());
        assert!(ExecutionStatus::Failed.is_terminal());
        assert!(ExecutionStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_result_status_round_trip() {
        for s in ["passed", "failed", "skipped", "error"] {
            let parsed = ResultStatus::parse(s).unwrap();
            assert_eq!(parsed.as_str(), s);
        }
        assert!(ResultStatus::parse("flaky").is_none());
    }
}
