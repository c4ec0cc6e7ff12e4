use uuid::Uuid;

use super::models::User;
use super::{Database, DbError, DbResult};
use crate::types::AgeRange;

const USER_COLUMNS: &str = "id, email, password_hash, display_name, age_range_min, age_range_max, \
     family_mode, onboarding_completed, allow_peer_comparisons, share_progress_with_family, \
     show_on_leaderboards, allow_mentor_contact, created_at, updated_at";

impl Database {
    pub async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        age_range: AgeRange,
    ) -> DbResult<User> {
        let sql = format!(
            "INSERT INTO users (email, password_hash, age_range_min, age_range_max) \
             VALUES ($1, $2, $3, $4) RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .bind(password_hash)
            .bind(age_range.min)
            .bind(age_range.max)
            .fetch_one(self.pool())
            .await
            .map_err(|e| {
                if Self::is_unique_violation(&e) {
                    DbError::Conflict("Email is already registered".to_string())
                } else {
                    e.into()
                }
            })
    }

    pub async fn find_user_by_email(&self, email: &str) -> DbResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(self.pool())
            .await?)
    }

    pub async fn find_user(&self, user_id: Uuid) -> DbResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(user_id)
            .fetch_optional(self.pool())
            .await?)
    }

    pub async fn require_user(&self, user_id: Uuid) -> DbResult<User> {
        self.find_user(user_id)
            .await?
            .ok_or_else(|| DbError::NotFound("User not found".to_string()))
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        display_name: Option<&str>,
        age_range: Option<AgeRange>,
    ) -> DbResult<User> {
        let sql = format!(
            "UPDATE users SET \
               display_name = COALESCE($2, display_name), \
               age_range_min = COALESCE($3, age_range_min), \
               age_range_max = COALESCE($4, age_range_max), \
               updated_at = now() \
             WHERE id = $1 RETURNING {USER_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(user_id)
            .bind(display_name)
            .bind(age_range.map(|r| r.min))
            .bind(age_range.map(|r| r.max))
            .fetch_one(self.pool())
            .await?)
    }

    pub async fn update_privacy(
        &self,
        user_id: Uuid,
        allow_peer_comparisons: Option<bool>,
        share_progress_with_family: Option<bool>,
        show_on_leaderboards: Option<bool>,
        allow_mentor_contact: Option<bool>,
    ) -> DbResult<User> {
        let sql = format!(
            "UPDATE users SET \
               allow_peer_comparisons = COALESCE($2, allow_peer_comparisons), \
               share_progress_with_family = COALESCE($3, share_progress_with_family), \
               show_on_leaderboards = COALESCE($4, show_on_leaderboards), \
               allow_mentor_contact = COALESCE($5, allow_mentor_contact), \
               updated_at = now() \
             WHERE id = $1 RETURNING {USER_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(user_id)
            .bind(allow_peer_comparisons)
            .bind(share_progress_with_family)
            .bind(show_on_leaderboards)
            .bind(allow_mentor_contact)
            .fetch_one(self.pool())
            .await?)
    }

    /// Opt-in flag for peer cohort comparisons.
    pub async fn has_opted_into_comparisons(&self, user_id: Uuid) -> DbResult<bool> {
        let opted: Option<bool> =
            sqlx::query_scalar("SELECT allow_peer_comparisons FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_optional(self.pool())
                .await?;
        opted.ok_or_else(|| DbError::NotFound("User not found".to_string()))
    }

    pub async fn update_comparison_preference(
        &self,
        user_id: Uuid,
        allow: bool,
    ) -> DbResult<User> {
        self.update_privacy(user_id, Some(allow), None, None, None)
            .await
    }
}
