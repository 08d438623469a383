//! SeaORM entity definitions.
//!
//! All entities except `user` live in the SQLite results store; `user`
//! maps the externally-owned MariaDB table and is read-only here.

pub mod daily_summary;
pub mod task;
pub mod task_execution;
pub mod test_case;
pub mod test_run_result;
pub mod user;
