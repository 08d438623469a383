//! Chart filter state machine.
//!
//! Governs which chart segments are visually emphasized. Pure state,
//! no server data and no persistence, so any frontend (wasm or native)
//! can embed it.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Status a chart segment can be filtered down to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FilterStatus {
    #[default]
    All,
    Passed,
    Failed,
    Skipped,
}

/// Current filter selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ChartFilter {
    pub selected: FilterStatus,
    pub active: bool,
}

impl ChartFilter {
    /// Select a status; selecting `All` deactivates the filter.
    pub fn set(&mut self, status: FilterStatus) {
        self.selected = status;
        self.active = status != FilterStatus::All;
    }

    /// Re-selecting the active status clears the filter; anything else
    /// selects it.
    pub fn toggle(&mut self, status: FilterStatus) {
        if self.selected == status && self.active {
            self.clear();
        } else {
            self.set(status);
        }
    }

    /// Reset to the initial state.
    pub fn clear(&mut self) {
        *self = ChartFilter::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let filter = ChartFilter::default();
        assert_eq!(filter.selected, FilterStatus::All);
        assert!(!filter.active);
    }

    #[test]
    fn test_set_activates() {
        let mut filter = ChartFilter::default();
        filter.set(FilterStatus::Passed);
        assert_eq!(filter.selected, FilterStatus::Passed);
        assert!(filter.active);
    }

    #[test]
    fn test_set_all_deactivates() {
        let mut filter = ChartFilter::default();
        filter.set(FilterStatus::Failed);
        filter.set(FilterStatus::All);
        assert_eq!(filter.selected, FilterStatus::All);
        assert!(!filter.active);
    }

    #[test]
    fn test_toggle_twice_returns_to_initial() {
        let mut filter = ChartFilter::default();
        filter.toggle(FilterStatus::Failed);
        assert_eq!(filter.selected, FilterStatus::Failed);
        assert!(filter.active);

        filter.toggle(FilterStatus::Failed);
        assert_eq!(filter, ChartFilter::default());
    }

    #[test]
    fn test_toggle_switches_between_statuses() {
        let mut filter = ChartFilter::default();
        filter.toggle(FilterStatus::Failed);
        filter.toggle(FilterStatus::Skipped);
        assert_eq!(filter.selected, FilterStatus::Skipped);
        assert!(filter.active);
    }

    #[test]
    fn test_clear() {
        let mut filter = ChartFilter::default();
        filter.set(FilterStatus::Passed);
        filter.clear();
        assert_eq!(filter, ChartFilter::default());
    }
}
