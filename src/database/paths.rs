use uuid::Uuid;

use super::models::{LevelPath, Milestone, PathProgress};
use super::{Database, DbError, DbResult};

impl Database {
    pub async fn list_paths(&self) -> DbResult<Vec<LevelPath>> {
        Ok(sqlx::query_as::<_, LevelPath>(
            "SELECT id, category, title, description, stage_count FROM paths ORDER BY category, title",
        )
        .fetch_all(self.pool())
        .await?)
    }

    pub async fn find_path(&self, path_id: Uuid) -> DbResult<Option<LevelPath>> {
        Ok(sqlx::query_as::<_, LevelPath>(
            "SELECT id, category, title, description, stage_count FROM paths WHERE id = $1",
        )
        .bind(path_id)
        .fetch_optional(self.pool())
        .await?)
    }

    pub async fn list_milestones(&self, path_id: Uuid) -> DbResult<Vec<Milestone>> {
        Ok(sqlx::query_as::<_, Milestone>(
            "SELECT id, path_id, stage, title, description FROM milestones \
             WHERE path_id = $1 ORDER BY stage",
        )
        .bind(path_id)
        .fetch_all(self.pool())
        .await?)
    }

    pub async fn find_progress(
        &self,
        user_id: Uuid,
        path_id: Uuid,
    ) -> DbResult<Option<PathProgress>> {
        Ok(sqlx::query_as::<_, PathProgress>(
            "SELECT id, user_id, path_id, current_stage, updated_at FROM path_progress \
             WHERE user_id = $1 AND path_id = $2",
        )
        .bind(user_id)
        .bind(path_id)
        .fetch_optional(self.pool())
        .await?)
    }

    /// Record progress on a path. Stage completion is monotonic: an update
    /// below the stored stage keeps the stored value.
    pub async fn advance_progress(
        &self,
        user_id: Uuid,
        path_id: Uuid,
        stage: i32,
    ) -> DbResult<PathProgress> {
        let path = self
            .find_path(path_id)
            .await?
            .ok_or_else(|| DbError::NotFound("Path not found".to_string()))?;
        if stage < 1 || stage > path.stage_count {
            return Err(DbError::Conflict(format!(
                "Stage must be between 1 and {}",
                path.stage_count
            )));
        }

        Ok(sqlx::query_as::<_, PathProgress>(
            "INSERT INTO path_progress (user_id, path_id, current_stage) VALUES ($1, $2, $3) \
             ON CONFLICT (user_id, path_id) DO UPDATE \
               SET current_stage = GREATEST(path_progress.current_stage, EXCLUDED.current_stage), \
                   updated_at = now() \
             RETURNING id, user_id, path_id, current_stage, updated_at",
        )
        .bind(user_id)
        .bind(path_id)
        .bind(stage)
        .fetch_one(self.pool())
        .await?)
    }
}
