//! Database queries for tasks.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::entity::task::{self, ActiveModel as TaskActiveModel, Entity as Task};
use crate::entity::task_execution::{self, Entity as TaskExecution};
use crate::error::{AppError, AppResult};
use crate::models::{CreateTaskRequest, TaskStatus};

use super::Store;

impl Store {
    /// List tasks, optionally filtered by status, newest first.
    pub async fn query_tasks(
        &self,
        status: Option<TaskStatus>,
        offset: u64,
        limit: u64,
    ) -> AppResult<(Vec<task::Model>, u64)> {
        let mut select = Task::find();

        if let Some(status) = status {
            select = select.filter(task::Column::Status.eq(status.as_str()));
        }

        let total = select
            .clone()
            .count(self.results())
            .await
            .map_err(|e| AppError::Store(format!("Failed to count tasks: {}", e)))?;

        let tasks = select
            .order_by_desc(task::Column::UpdatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.results())
            .await
            .map_err(|e| AppError::Store(format!("Failed to query tasks: {}", e)))?;

        Ok((tasks, total))
    }

    /// Get a single task by id.
    pub async fn get_task_by_id(&self, id: i32) -> AppResult<Option<task::Model>> {
        let task = Task::find_by_id(id)
            .one(self.results())
            .await
            .map_err(|e| AppError::Store(format!("Failed to get task: {}", e)))?;

        Ok(task)
    }

    /// Recent executions launched from a task.
    pub async fn get_task_executions(
        &self,
        task_id: i32,
        limit: u64,
    ) -> AppResult<Vec<task_execution::Model>> {
        let executions = TaskExecution::find()
            .filter(task_execution::Column::TaskId.eq(task_id))
            .order_by_desc(task_execution::Column::StartTime)
            .order_by_desc(task_execution::Column::Id)
            .limit(limit)
            .all(self.results())
            .await
            .map_err(|e| AppError::Store(format!("Failed to get task executions: {}", e)))?;

        Ok(executions)
    }

    /// Insert a new task.
    pub async fn insert_task(
        &self,
        req: &CreateTaskRequest,
        created_by: Option<i32>,
    ) -> AppResult<task::Model> {
        let now = Utc::now();

        let model = TaskActiveModel {
            name: Set(req.name.clone()),
            project_id: Set(req.project_id),
            case_ids: Set(serde_json::json!(req.case_ids)),
            status: Set(TaskStatus::Active.as_str().to_string()),
            cron_expr: Set(req.cron_expr.clone()),
            created_by: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let task = model
            .insert(self.results())
            .await
            .map_err(|e| AppError::Store(format!("Failed to insert task: {}", e)))?;

        Ok(task)
    }

    /// Delete a task by id. Returns NotFound when nothing was deleted.
    pub async fn delete_task(&self, id: i32) -> AppResult<()> {
        let result = Task::delete_by_id(id)
            .exec(self.results())
            .await
            .map_err(|e| AppError::Store(format!("Failed to delete task: {}", e)))?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Task {}", id)));
        }

        Ok(())
    }
}
