//! Read-only queries against the externally-owned user tables.

use std::collections::HashMap;

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use crate::entity::user::{self, Entity as User};
use crate::error::{AppError, AppResult};

use super::Store;

impl Store {
    /// Get a single user by id.
    pub async fn get_user_by_id(&self, id: i32) -> AppResult<Option<user::Model>> {
        let found = User::find_by_id(id)
            .one(self.users())
            .await
            .map_err(|e| AppError::Store(format!("Failed to get user: {}", e)))?;

        Ok(found)
    }

    /// Resolve display names for a batch of user ids. Falls back to the
    /// username when no display name is set; unknown ids are omitted.
    pub async fn get_user_display_names(&self, ids: &[i32]) -> AppResult<HashMap<i32, String>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut unique: Vec<i32> = ids.to_vec();
        unique.sort_unstable();
        unique.dedup();

        let found = User::find()
            .filter(user::Column::Id.is_in(unique))
            .all(self.users())
            .await
            .map_err(|e| AppError::Store(format!("Failed to resolve users: {}", e)))?;

        Ok(found
            .into_iter()
            .map(|u| {
                let name = u.display_name.unwrap_or(u.username);
                (u.id, name)
            })
            .collect())
    }
}
