use super::{Database, DbResult};
use crate::types::INTEREST_CATEGORIES;

/// Schema DDL. Applied by the development-only /api/init-db endpoint;
/// deployments run the same statements via migration tooling.
const SCHEMA_SQL: &[&str] = &[
    "CREATE EXTENSION IF NOT EXISTS \"pgcrypto\"",
    "CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        email TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        display_name TEXT,
        age_range_min INT NOT NULL,
        age_range_max INT NOT NULL,
        family_mode BOOLEAN NOT NULL DEFAULT false,
        onboarding_completed BOOLEAN NOT NULL DEFAULT false,
        allow_peer_comparisons BOOLEAN NOT NULL DEFAULT false,
        share_progress_with_family BOOLEAN NOT NULL DEFAULT false,
        show_on_leaderboards BOOLEAN NOT NULL DEFAULT false,
        allow_mentor_contact BOOLEAN NOT NULL DEFAULT false,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE TABLE IF NOT EXISTS user_interests (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        user_id UUID NOT NULL REFERENCES users(id),
        category TEXT NOT NULL,
        subcategory TEXT,
        skill_level TEXT NOT NULL,
        intent_level TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        UNIQUE (user_id, category)
    )",
    "CREATE TABLE IF NOT EXISTS goals (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        user_id UUID NOT NULL REFERENCES users(id),
        category TEXT NOT NULL,
        goal_type TEXT NOT NULL,
        title TEXT NOT NULL,
        description TEXT,
        target_level TEXT NOT NULL,
        timeframe TEXT NOT NULL,
        target_date TIMESTAMPTZ,
        status TEXT NOT NULL DEFAULT 'active',
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE TABLE IF NOT EXISTS retrospectives (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        user_id UUID NOT NULL REFERENCES users(id),
        retro_type TEXT NOT NULL,
        insights TEXT NOT NULL,
        skill_updates JSONB NOT NULL DEFAULT '{}',
        goals_reviewed JSONB NOT NULL DEFAULT '[]',
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE TABLE IF NOT EXISTS paths (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        category TEXT NOT NULL,
        title TEXT NOT NULL,
        description TEXT,
        stage_count INT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS milestones (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        path_id UUID NOT NULL REFERENCES paths(id),
        stage INT NOT NULL,
        title TEXT NOT NULL,
        description TEXT,
        UNIQUE (path_id, stage)
    )",
    "CREATE TABLE IF NOT EXISTS path_progress (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        user_id UUID NOT NULL REFERENCES users(id),
        path_id UUID NOT NULL REFERENCES paths(id),
        current_stage INT NOT NULL DEFAULT 1,
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        UNIQUE (user_id, path_id)
    )",
    "CREATE TABLE IF NOT EXISTS family_relationships (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        parent_user_id UUID NOT NULL REFERENCES users(id),
        child_user_id UUID NOT NULL REFERENCES users(id),
        relationship_type TEXT NOT NULL,
        child_consent_given BOOLEAN NOT NULL DEFAULT false,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        UNIQUE (parent_user_id, child_user_id)
    )",
    "CREATE TABLE IF NOT EXISTS family_activity_log (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        relationship_id UUID NOT NULL REFERENCES family_relationships(id) ON DELETE CASCADE,
        actor_user_id UUID NOT NULL REFERENCES users(id),
        action TEXT NOT NULL,
        detail TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE TABLE IF NOT EXISTS cohort_statistics (
        age_bucket TEXT NOT NULL,
        category TEXT NOT NULL,
        intent_level TEXT NOT NULL,
        member_count BIGINT NOT NULL,
        avg_skill_level DOUBLE PRECISION NOT NULL,
        skill_level_counts JSONB NOT NULL DEFAULT '{}',
        computed_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        PRIMARY KEY (age_bucket, category, intent_level)
    )",
    "CREATE INDEX IF NOT EXISTS idx_interests_cohort \
        ON user_interests (category, intent_level)",
    "CREATE INDEX IF NOT EXISTS idx_goals_user ON goals (user_id)",
];

impl Database {
    pub async fn init_schema(&self) -> DbResult<()> {
        for stmt in SCHEMA_SQL {
            sqlx::query(stmt).execute(self.pool()).await?;
        }
        Ok(())
    }

    /// Whether the core tables exist (used by the health probe).
    pub async fn schema_present(&self) -> DbResult<bool> {
        let present: Option<bool> =
            sqlx::query_scalar("SELECT to_regclass('public.users') IS NOT NULL")
                .fetch_one(self.pool())
                .await?;
        Ok(present.unwrap_or(false))
    }

    /// Seed predefined paths and milestones. Idempotent: skips categories
    /// that already have a path.
    pub async fn seed_paths(&self) -> DbResult<u64> {
        let mut created = 0u64;
        for category in INTEREST_CATEGORIES {
            let exists: Option<bool> =
                sqlx::query_scalar("SELECT true FROM paths WHERE category = $1 LIMIT 1")
                    .bind(category)
                    .fetch_optional(self.pool())
                    .await?;
            if exists.is_some() {
                continue;
            }

            let path_id: uuid::Uuid = sqlx::query_scalar(
                "INSERT INTO paths (category, title, description, stage_count) \
                 VALUES ($1, $2, $3, $4) RETURNING id",
            )
            .bind(category)
            .bind(format!("{} fundamentals", capitalize(category)))
            .bind(format!("A staged introduction to {}", category))
            .bind(5)
            .fetch_one(self.pool())
            .await?;

            for (stage, title) in [
                "Getting started",
                "Building habits",
                "First milestones",
                "Consistent practice",
                "Sharing your progress",
            ]
            .iter()
            .enumerate()
            {
                sqlx::query(
                    "INSERT INTO milestones (path_id, stage, title) VALUES ($1, $2, $3)",
                )
                .bind(path_id)
                .bind((stage + 1) as i32)
                .bind(title)
                .execute(self.pool())
                .await?;
            }
            created += 1;
        }
        Ok(created)
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
