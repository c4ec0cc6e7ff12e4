use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Append-only reflection record. Never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Retrospective {
    pub id: Uuid,
    pub user_id: Uuid,
    pub retro_type: String,
    pub insights: String,
    pub skill_updates: Value,
    pub goals_reviewed: Value,
    pub created_at: DateTime<Utc>,
}
