use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::models::Goal;
use super::{Database, DbResult};
use crate::types::{GoalStatus, GoalType, SkillLevel, Timeframe};

const GOAL_COLUMNS: &str = "id, user_id, category, goal_type, title, description, target_level, \
     timeframe, target_date, status, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct NewGoal<'a> {
    pub category: &'a str,
    pub goal_type: GoalType,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub target_level: SkillLevel,
    pub timeframe: Timeframe,
    pub target_date: Option<DateTime<Utc>>,
}

impl Database {
    pub async fn create_goal(&self, user_id: Uuid, goal: NewGoal<'_>) -> DbResult<Goal> {
        let sql = format!(
            "INSERT INTO goals (user_id, category, goal_type, title, description, target_level, timeframe, target_date) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {GOAL_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Goal>(&sql)
            .bind(user_id)
            .bind(goal.category)
            .bind(goal.goal_type.as_str())
            .bind(goal.title)
            .bind(goal.description)
            .bind(goal.target_level.as_str())
            .bind(goal.timeframe.as_str())
            .bind(goal.target_date)
            .fetch_one(self.pool())
            .await?)
    }

    pub async fn list_goals(&self, user_id: Uuid) -> DbResult<Vec<Goal>> {
        let sql =
            format!("SELECT {GOAL_COLUMNS} FROM goals WHERE user_id = $1 ORDER BY created_at DESC");
        Ok(sqlx::query_as::<_, Goal>(&sql)
            .bind(user_id)
            .fetch_all(self.pool())
            .await?)
    }

    pub async fn find_goal(&self, goal_id: Uuid) -> DbResult<Option<Goal>> {
        let sql = format!("SELECT {GOAL_COLUMNS} FROM goals WHERE id = $1");
        Ok(sqlx::query_as::<_, Goal>(&sql)
            .bind(goal_id)
            .fetch_optional(self.pool())
            .await?)
    }

    pub async fn update_goal(
        &self,
        goal_id: Uuid,
        status: Option<GoalStatus>,
        title: Option<&str>,
        description: Option<&str>,
        target_level: Option<SkillLevel>,
        target_date: Option<DateTime<Utc>>,
    ) -> DbResult<Goal> {
        let sql = format!(
            "UPDATE goals SET \
               status = COALESCE($2, status), \
               title = COALESCE($3, title), \
               description = COALESCE($4, description), \
               target_level = COALESCE($5, target_level), \
               target_date = COALESCE($6, target_date), \
               updated_at = now() \
             WHERE id = $1 RETURNING {GOAL_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Goal>(&sql)
            .bind(goal_id)
            .bind(status.map(|s| s.as_str()))
            .bind(title)
            .bind(description)
            .bind(target_level.map(|l| l.as_str()))
            .bind(target_date)
            .fetch_one(self.pool())
            .await?)
    }
}
