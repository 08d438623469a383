//! Task types and request payloads.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Active,
    Paused,
}

impl TaskStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "paused" => Some(Self::Paused),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paused => "paused",
        }
    }
}

/// Create payload for `POST /api/tasks`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateTaskRequest {
    pub name: String,
    pub project_id: Option<i32>,
    #[serde(default)]
    pub case_ids: Vec<i32>,
    pub cron_expr: Option<String>,
}
