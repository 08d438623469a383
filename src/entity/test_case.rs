//! Test case entity representing a single automated test definition.

use sea_orm::entity::prelude::*;
use serde_json::Value as JsonValue;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "test_cases")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub case_key: Option<String>,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub project_id: Option<i32>,
    pub module: Option<String>,
    pub owner: Option<String>,
    pub source: Option<String>,
    pub priority: String,
    pub case_type: String,
    pub script_path: Option<String>,
    #[sea_orm(column_type = "Json", nullable)]
    pub tags: Option<JsonValue>,
    #[sea_orm(column_type = "Json", nullable)]
    pub config: Option<JsonValue>,
    pub enabled: bool,
    pub created_by: Option<i32>,
    pub updated_by: Option<i32>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
