use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One row per (user, category). Enum columns are stored as text; the
/// vocabulary lives in [`crate::types`].
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserInterest {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category: String,
    pub subcategory: Option<String>,
    pub skill_level: String,
    pub intent_level: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
