//! Database queries for test case metadata.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use crate::entity::test_case::{self, ActiveModel as TestCaseActiveModel, Entity as TestCase};
use crate::error::{AppError, AppResult};
use crate::models::{CaseQuery, CreateCaseRequest, UpdateCaseRequest};

use super::Store;

impl Store {
    /// Query cases with filters and pagination, returning the matching
    /// page and the unpaginated total.
    pub async fn query_cases(&self, query: &CaseQuery) -> AppResult<(Vec<test_case::Model>, u64)> {
        let mut select = TestCase::find();

        if let Some(project_id) = query.project_id {
            select = select.filter(test_case::Column::ProjectId.eq(project_id));
        }

        if let Some(ref module) = query.module {
            select = select.filter(test_case::Column::Module.eq(module));
        }

        if let Some(enabled) = query.enabled {
            select = select.filter(test_case::Column::Enabled.eq(enabled));
        }

        if let Some(case_type) = query.case_type {
            select = select.filter(test_case::Column::CaseType.eq(case_type.as_str()));
        }

        if let Some(ref search) = query.search {
            let pattern = format!("%{}%", search);
            select = select.filter(
                Condition::any()
                    .add(test_case::Column::Name.like(&pattern))
                    .add(test_case::Column::CaseKey.like(&pattern)),
            );
        }

        // Count total before pagination
        let total = select
            .clone()
            .count(self.results())
            .await
            .map_err(|e| AppError::Store(format!("Failed to count cases: {}", e)))?;

        let limit = query.limit.unwrap_or(50).clamp(1, 100);
        let offset = query.offset.unwrap_or(0);

        let cases = select
            .order_by_desc(test_case::Column::UpdatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.results())
            .await
            .map_err(|e| AppError::Store(format!("Failed to query cases: {}", e)))?;

        Ok((cases, total))
    }

    /// Get a single case by id.
    pub async fn get_case_by_id(&self, id: i32) -> AppResult<Option<test_case::Model>> {
        let case = TestCase::find_by_id(id)
            .one(self.results())
            .await
            .map_err(|e| AppError::Store(format!("Failed to get case: {}", e)))?;

        Ok(case)
    }

    /// Count enabled cases (the "active cases" dashboard figure).
    pub async fn count_enabled_cases(&self) -> AppResult<u64> {
        let count = TestCase::find()
            .filter(test_case::Column::Enabled.eq(true))
            .count(self.results())
            .await
            .map_err(|e| AppError::Store(format!("Failed to count enabled cases: {}", e)))?;

        Ok(count)
    }

    /// Distinct non-null module names, ascending.
    pub async fn list_case_modules(&self) -> AppResult<Vec<String>> {
        let modules: Vec<Option<String>> = TestCase::find()
            .select_only()
            .column(test_case::Column::Module)
            .distinct()
            .filter(test_case::Column::Module.is_not_null())
            .order_by_asc(test_case::Column::Module)
            .into_tuple()
            .all(self.results())
            .await
            .map_err(|e| AppError::Store(format!("Failed to list modules: {}", e)))?;

        Ok(modules.into_iter().flatten().collect())
    }

    /// Insert a new case.
    pub async fn insert_case(
        &self,
        req: &CreateCaseRequest,
        created_by: Option<i32>,
    ) -> AppResult<test_case::Model> {
        let now = Utc::now();

        let model = TestCaseActiveModel {
            case_key: Set(req.case_key.clone()),
            name: Set(req.name.clone()),
            description: Set(req.description.clone()),
            project_id: Set(req.project_id),
            module: Set(req.module.clone()),
            owner: Set(req.owner.clone()),
            source: Set(req.source.clone()),
            priority: Set(req
                .priority
                .unwrap_or(crate::models::CasePriority::P2)
                .as_str()
                .to_string()),
            case_type: Set(req
                .case_type
                .unwrap_or(crate::models::CaseType::Api)
                .as_str()
                .to_string()),
            script_path: Set(req.script_path.clone()),
            tags: Set(req.tags.clone()),
            config: Set(req.config.clone()),
            enabled: Set(req.enabled.unwrap_or(true)),
            created_by: Set(created_by),
            updated_by: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let case = model
            .insert(self.results())
            .await
            .map_err(|e| AppError::Store(format!("Failed to insert case: {}", e)))?;

        Ok(case)
    }

    /// Apply a partial update to a case. Absent fields are untouched.
    pub async fn update_case(
        &self,
        id: i32,
        req: &UpdateCaseRequest,
        updated_by: Option<i32>,
    ) -> AppResult<test_case::Model> {
        let case = self
            .get_case_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Case {}", id)))?;

        let mut active: TestCaseActiveModel = case.into();

        if let Some(ref name) = req.name {
            active.name = Set(name.clone());
        }
        if let Some(ref description) = req.description {
            active.description = Set(Some(description.clone()));
        }
        if let Some(ref module) = req.module {
            active.module = Set(Some(module.clone()));
        }
        if let Some(ref owner) = req.owner {
            active.owner = Set(Some(owner.clone()));
        }
        if let Some(priority) = req.priority {
            active.priority = Set(priority.as_str().to_string());
        }
        if let Some(case_type) = req.case_type {
            active.case_type = Set(case_type.as_str().to_string());
        }
        if let Some(ref script_path) = req.script_path {
            active.script_path = Set(Some(script_path.clone()));
        }
        if let Some(ref tags) = req.tags {
            active.tags = Set(Some(tags.clone()));
        }
        if let Some(ref config) = req.config {
            active.config = Set(Some(config.clone()));
        }
        if let Some(enabled) = req.enabled {
            active.enabled = Set(enabled);
        }
        active.updated_by = Set(updated_by);
        active.updated_at = Set(Utc::now());

        let updated = active
            .update(self.results())
            .await
            .map_err(|e| AppError::Store(format!("Failed to update case: {}", e)))?;

        Ok(updated)
    }

    /// Delete a case by id. Returns NotFound when nothing was deleted.
    pub async fn delete_case(&self, id: i32) -> AppResult<()> {
        let result = TestCase::delete_by_id(id)
            .exec(self.results())
            .await
            .map_err(|e| AppError::Store(format!("Failed to delete case: {}", e)))?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Case {}", id)));
        }

        Ok(())
    }
}
