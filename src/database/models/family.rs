use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Parent-child link. child_consent_given=false is a pending request;
/// declined requests are deleted rather than retained.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FamilyRelationship {
    pub id: Uuid,
    pub parent_user_id: Uuid,
    pub child_user_id: Uuid,
    pub relationship_type: String,
    pub child_consent_given: bool,
    pub created_at: DateTime<Utc>,
}

/// Append-only audit entry tied to a relationship.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FamilyActivityEntry {
    pub id: Uuid,
    pub relationship_id: Uuid,
    pub actor_user_id: Uuid,
    pub action: String,
    pub detail: Option<String>,
    pub created_at: DateTime<Utc>,
}
