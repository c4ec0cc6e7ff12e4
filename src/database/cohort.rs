use serde_json::Value;
use sqlx::Row;

use super::models::CohortStatistics;
use super::{Database, DbResult};

const STAT_COLUMNS: &str = "age_bucket, category, intent_level, member_count, avg_skill_level, \
     skill_level_counts, computed_at";

impl Database {
    /// Skill levels of every opted-in member of one cohort. The age window is
    /// half-open: [min_age, max_age_excl), with no upper bound for the oldest
    /// bucket.
    pub async fn cohort_member_skill_levels(
        &self,
        min_age: i32,
        max_age_excl: Option<i32>,
        category: &str,
        intent_level: &str,
    ) -> DbResult<Vec<String>> {
        let rows = sqlx::query(
            "SELECT ui.skill_level FROM user_interests ui \
             JOIN users u ON u.id = ui.user_id \
             WHERE ui.category = $1 AND ui.intent_level = $2 \
               AND u.allow_peer_comparisons = true \
               AND u.age_range_min >= $3 \
               AND ($4::int IS NULL OR u.age_range_min < $4)",
        )
        .bind(category)
        .bind(intent_level)
        .bind(min_age)
        .bind(max_age_excl)
        .fetch_all(self.pool())
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| r.get::<String, _>("skill_level"))
            .collect())
    }

    pub async fn upsert_cohort_statistics(
        &self,
        age_bucket: &str,
        category: &str,
        intent_level: &str,
        member_count: i64,
        avg_skill_level: f64,
        skill_level_counts: &Value,
    ) -> DbResult<()> {
        sqlx::query(
            "INSERT INTO cohort_statistics \
               (age_bucket, category, intent_level, member_count, avg_skill_level, skill_level_counts, computed_at) \
             VALUES ($1, $2, $3, $4, $5, $6, now()) \
             ON CONFLICT (age_bucket, category, intent_level) DO UPDATE \
               SET member_count = EXCLUDED.member_count, \
                   avg_skill_level = EXCLUDED.avg_skill_level, \
                   skill_level_counts = EXCLUDED.skill_level_counts, \
                   computed_at = now()",
        )
        .bind(age_bucket)
        .bind(category)
        .bind(intent_level)
        .bind(member_count)
        .bind(avg_skill_level)
        .bind(skill_level_counts)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    /// Drop the aggregate row when a cohort has no remaining members.
    pub async fn delete_cohort_statistics(
        &self,
        age_bucket: &str,
        category: &str,
        intent_level: &str,
    ) -> DbResult<()> {
        sqlx::query(
            "DELETE FROM cohort_statistics \
             WHERE age_bucket = $1 AND category = $2 AND intent_level = $3",
        )
        .bind(age_bucket)
        .bind(category)
        .bind(intent_level)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    pub async fn find_cohort_statistics(
        &self,
        age_bucket: &str,
        category: &str,
        intent_level: &str,
    ) -> DbResult<Option<CohortStatistics>> {
        let sql = format!(
            "SELECT {STAT_COLUMNS} FROM cohort_statistics \
             WHERE age_bucket = $1 AND category = $2 AND intent_level = $3"
        );
        Ok(sqlx::query_as::<_, CohortStatistics>(&sql)
            .bind(age_bucket)
            .bind(category)
            .bind(intent_level)
            .fetch_optional(self.pool())
            .await?)
    }

    /// Every distinct (age_range_min, category, intent_level) present in the
    /// interest table. Bucketing happens in the caller; distinct age minima
    /// can collapse into the same bucket.
    pub async fn distinct_interest_triples(&self) -> DbResult<Vec<(i32, String, String)>> {
        let rows = sqlx::query(
            "SELECT DISTINCT u.age_range_min, ui.category, ui.intent_level \
             FROM user_interests ui JOIN users u ON u.id = ui.user_id",
        )
        .fetch_all(self.pool())
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| {
                (
                    r.get::<i32, _>("age_range_min"),
                    r.get::<String, _>("category"),
                    r.get::<String, _>("intent_level"),
                )
            })
            .collect())
    }
}
