use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

/// Materialized aggregate for one (age bucket, category, intent level)
/// triple. Derived from user_interests; eventually consistent.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CohortStatistics {
    pub age_bucket: String,
    pub category: String,
    pub intent_level: String,
    pub member_count: i64,
    pub avg_skill_level: f64,
    /// skill level name -> member count at that level
    pub skill_level_counts: Value,
    pub computed_at: DateTime<Utc>,
}
