//! Business logic services.

pub mod aggregation;
pub mod jenkins;
pub mod summary_scheduler;

pub use jenkins::JenkinsTrigger;
pub use summary_scheduler::start_summary_scheduler;
