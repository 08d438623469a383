//! Test case metadata types and request payloads.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::ToSchema;

/// Case priority bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum CasePriority {
    P0,
    P1,
    P2,
    P3,
}

impl CasePriority {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "P0" => Some(Self::P0),
            "P1" => Some(Self::P1),
            "P2" => Some(Self::P2),
            "P3" => Some(Self::P3),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::P0 => "P0",
            Self::P1 => "P1",
            Self::P2 => "P2",
            Self::P3 => "P3",
        }
    }
}

/// Kind of automation behind a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CaseType {
    Api,
    Ui,
    Performance,
    Security,
}

impl CaseType {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "api" => Some(Self::Api),
            "ui" => Some(Self::Ui),
            "performance" => Some(Self::Performance),
            "security" => Some(Self::Security),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Api => "api",
            Self::Ui => "ui",
            Self::Performance => "performance",
            Self::Security => "security",
        }
    }
}

/// Filterable list query for `GET /api/cases`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CaseQuery {
    pub project_id: Option<i32>,
    pub module: Option<String>,
    pub enabled: Option<bool>,
    pub case_type: Option<CaseType>,
    /// Substring match over name and case key.
    pub search: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// Create payload for `POST /api/cases`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateCaseRequest {
    pub name: String,
    pub case_key: Option<String>,
    pub description: Option<String>,
    pub project_id: Option<i32>,
    pub module: Option<String>,
    pub owner: Option<String>,
    pub source: Option<String>,
    pub priority: Option<CasePriority>,
    pub case_type: Option<CaseType>,
    pub script_path: Option<String>,
    pub tags: Option<JsonValue>,
    pub config: Option<JsonValue>,
    pub enabled: Option<bool>,
}

/// Update payload for `PUT /api/cases/{id}`. Absent fields are left
/// untouched.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateCaseRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub module: Option<String>,
    pub owner: Option<String>,
    pub priority: Option<CasePriority>,
    pub case_type: Option<CaseType>,
    pub script_path: Option<String>,
    pub tags: Option<JsonValue>,
    pub config: Option<JsonValue>,
    pub enabled: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_round_trip() {
        for s in ["P0", "P1", "P2", "P3"] {
            assert_eq!(CasePriority::parse(s).unwrap().as_str(), s);
        }
        assert!(CasePriority::parse("P4").is_none());
    }

    #[test]
    fn test_case_type_round_trip() {
        for s in ["api", "ui", "performance", "security"] {
            assert_eq!(CaseType::parse(s).unwrap().as_str(), s);
        }
        assert!(CaseType::parse("unit").is_none());
    }
}
