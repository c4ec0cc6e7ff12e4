use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Predefined multi-stage curriculum for one interest category.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LevelPath {
    pub id: Uuid,
    pub category: String,
    pub title: String,
    pub description: Option<String>,
    pub stage_count: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub id: Uuid,
    pub path_id: Uuid,
    pub stage: i32,
    pub title: String,
    pub description: Option<String>,
}

/// Per-user position in a path. current_stage only moves forward.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PathProgress {
    pub id: Uuid,
    pub user_id: Uuid,
    pub path_id: Uuid,
    pub current_stage: i32,
    pub updated_at: DateTime<Utc>,
}
