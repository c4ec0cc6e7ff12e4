use serde_json::Value;
use uuid::Uuid;

use super::models::Retrospective;
use super::{Database, DbResult};
use crate::types::RetroType;

const RETRO_COLUMNS: &str =
    "id, user_id, retro_type, insights, skill_updates, goals_reviewed, created_at";

impl Database {
    pub async fn create_retrospective(
        &self,
        user_id: Uuid,
        retro_type: RetroType,
        insights: &str,
        skill_updates: &Value,
        goals_reviewed: &Value,
    ) -> DbResult<Retrospective> {
        let sql = format!(
            "INSERT INTO retrospectives (user_id, retro_type, insights, skill_updates, goals_reviewed) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {RETRO_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Retrospective>(&sql)
            .bind(user_id)
            .bind(retro_type.as_str())
            .bind(insights)
            .bind(skill_updates)
            .bind(goals_reviewed)
            .fetch_one(self.pool())
            .await?)
    }

    pub async fn list_retrospectives(&self, user_id: Uuid) -> DbResult<Vec<Retrospective>> {
        let sql = format!(
            "SELECT {RETRO_COLUMNS} FROM retrospectives WHERE user_id = $1 ORDER BY created_at DESC"
        );
        Ok(sqlx::query_as::<_, Retrospective>(&sql)
            .bind(user_id)
            .fetch_all(self.pool())
            .await?)
    }
}
