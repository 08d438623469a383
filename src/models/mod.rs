//! Domain models shared across the service and API layers.

use utoipa::ToSchema;

pub mod case;
pub mod dashboard;
pub mod execution;
pub mod filter;
pub mod task;

// Re-export commonly used types
pub use case::{CasePriority, CaseQuery, CaseType, CreateCaseRequest, UpdateCaseRequest};
pub use dashboard::{
    BackfillReport, ComparisonData, DailySummaryData, DashboardStats, RecentRun, TodayExecution,
    TrendPoint,
};
pub use execution::{CaseResultPayload, ExecutionCallbackRequest, ExecutionStatus, ResultStatus};
pub use filter::{ChartFilter, FilterStatus};
pub use task::{CreateTaskRequest, TaskStatus};

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    20
}

/// Pagination parameters.
#[derive(Debug, Clone, serde::Deserialize, ToSchema)]
pub struct PaginationParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PaginationParams {
    /// Calculate the offset for database queries.
    pub fn offset(&self) -> u32 {
        let page = self.page.unwrap_or(default_page());
        (page.saturating_sub(1)) * self.clamped_limit()
    }

    /// Clamp limit to maximum allowed value.
    pub fn clamped_limit(&self) -> u32 {
        self.limit.unwrap_or(default_limit()).clamp(1, 100)
    }

    /// Page number, 1-based.
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(default_page()).max(1)
    }
}

/// Pagination metadata for responses.
#[derive(Debug, Clone, serde::Serialize, ToSchema)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl Pagination {
    /// Create pagination metadata.
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        let total_pages = if total == 0 {
            0
        } else {
            ((total as f64) / (limit as f64)).ceil() as u32
        };
        Pagination {
            page,
            limit,
            total,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_offset() {
        let params = PaginationParams {
            page: Some(3),
            limit: Some(10),
        };
        assert_eq!(params.offset(), 20);
        assert_eq!(params.clamped_limit(), 10);
    }

    #[test]
    fn test_pagination_defaults() {
        let params = PaginationParams {
            page: None,
            limit: None,
        };
        assert_eq!(params.offset(), 0);
        assert_eq!(params.clamped_limit(), 20);
    }

    #[test]
    fn test_limit_clamped_to_max() {
        let params = PaginationParams {
            page: Some(1),
            limit: Some(5000),
        };
        assert_eq!(params.clamped_limit(), 100);
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(Pagination::new(1, 10, 0).total_pages, 0);
        assert_eq!(Pagination::new(1, 10, 10).total_pages, 1);
        assert_eq!(Pagination::new(1, 10, 11).total_pages, 2);
    }
}
