use uuid::Uuid;

use super::models::UserInterest;
use super::{Database, DbError, DbResult};
use crate::types::{IntentLevel, SkillLevel};

const INTEREST_COLUMNS: &str =
    "id, user_id, category, subcategory, skill_level, intent_level, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct NewInterest {
    pub category: String,
    pub subcategory: Option<String>,
    pub skill_level: SkillLevel,
    pub intent_level: IntentLevel,
}

impl Database {
    /// Onboarding completion: insert the initial interest set and flip the
    /// onboarding flag in one transaction, so a partial failure leaves the
    /// user un-onboarded rather than half-onboarded.
    pub async fn complete_onboarding(
        &self,
        user_id: Uuid,
        interests: &[NewInterest],
    ) -> DbResult<Vec<UserInterest>> {
        let mut tx = self.pool().begin().await?;

        let mut created = Vec::with_capacity(interests.len());
        let sql = format!(
            "INSERT INTO user_interests (user_id, category, subcategory, skill_level, intent_level) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {INTEREST_COLUMNS}"
        );
        for interest in interests {
            let row = sqlx::query_as::<_, UserInterest>(&sql)
                .bind(user_id)
                .bind(&interest.category)
                .bind(&interest.subcategory)
                .bind(interest.skill_level.as_str())
                .bind(interest.intent_level.as_str())
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| {
                    if Self::is_unique_violation(&e) {
                        DbError::Conflict(format!(
                            "Interest in '{}' already exists",
                            interest.category
                        ))
                    } else {
                        e.into()
                    }
                })?;
            created.push(row);
        }

        sqlx::query("UPDATE users SET onboarding_completed = true, updated_at = now() WHERE id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(created)
    }

    pub async fn list_interests(&self, user_id: Uuid) -> DbResult<Vec<UserInterest>> {
        let sql = format!(
            "SELECT {INTEREST_COLUMNS} FROM user_interests WHERE user_id = $1 ORDER BY category"
        );
        Ok(sqlx::query_as::<_, UserInterest>(&sql)
            .bind(user_id)
            .fetch_all(self.pool())
            .await?)
    }

    pub async fn find_interest(&self, interest_id: Uuid) -> DbResult<Option<UserInterest>> {
        let sql = format!("SELECT {INTEREST_COLUMNS} FROM user_interests WHERE id = $1");
        Ok(sqlx::query_as::<_, UserInterest>(&sql)
            .bind(interest_id)
            .fetch_optional(self.pool())
            .await?)
    }

    pub async fn find_interest_by_category(
        &self,
        user_id: Uuid,
        category: &str,
    ) -> DbResult<Option<UserInterest>> {
        let sql = format!(
            "SELECT {INTEREST_COLUMNS} FROM user_interests WHERE user_id = $1 AND category = $2"
        );
        Ok(sqlx::query_as::<_, UserInterest>(&sql)
            .bind(user_id)
            .bind(category)
            .fetch_optional(self.pool())
            .await?)
    }

    pub async fn update_commitment(
        &self,
        interest_id: Uuid,
        intent_level: IntentLevel,
    ) -> DbResult<UserInterest> {
        let sql = format!(
            "UPDATE user_interests SET intent_level = $2, updated_at = now() \
             WHERE id = $1 RETURNING {INTEREST_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, UserInterest>(&sql)
            .bind(interest_id)
            .bind(intent_level.as_str())
            .fetch_one(self.pool())
            .await?)
    }
}
