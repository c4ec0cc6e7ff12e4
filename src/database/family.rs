use uuid::Uuid;

use super::models::{FamilyActivityEntry, FamilyRelationship};
use super::{Database, DbError, DbResult};
use crate::types::RelationshipType;

const REL_COLUMNS: &str =
    "id, parent_user_id, child_user_id, relationship_type, child_consent_given, created_at";

const LOG_COLUMNS: &str = "id, relationship_id, actor_user_id, action, detail, created_at";

impl Database {
    /// Any existing row between the pair, in either direction.
    pub async fn find_relationship_between(
        &self,
        a: Uuid,
        b: Uuid,
    ) -> DbResult<Option<FamilyRelationship>> {
        let sql = format!(
            "SELECT {REL_COLUMNS} FROM family_relationships \
             WHERE (parent_user_id = $1 AND child_user_id = $2) \
                OR (parent_user_id = $2 AND child_user_id = $1)"
        );
        Ok(sqlx::query_as::<_, FamilyRelationship>(&sql)
            .bind(a)
            .bind(b)
            .fetch_optional(self.pool())
            .await?)
    }

    pub async fn create_relationship(
        &self,
        parent_user_id: Uuid,
        child_user_id: Uuid,
        relationship_type: RelationshipType,
    ) -> DbResult<FamilyRelationship> {
        let sql = format!(
            "INSERT INTO family_relationships (parent_user_id, child_user_id, relationship_type) \
             VALUES ($1, $2, $3) RETURNING {REL_COLUMNS}"
        );
        sqlx::query_as::<_, FamilyRelationship>(&sql)
            .bind(parent_user_id)
            .bind(child_user_id)
            .bind(relationship_type.as_str())
            .fetch_one(self.pool())
            .await
            .map_err(|e| {
                if Self::is_unique_violation(&e) {
                    DbError::Conflict("A relationship between these users already exists".into())
                } else {
                    e.into()
                }
            })
    }

    pub async fn find_relationship(
        &self,
        relationship_id: Uuid,
    ) -> DbResult<Option<FamilyRelationship>> {
        let sql = format!("SELECT {REL_COLUMNS} FROM family_relationships WHERE id = $1");
        Ok(sqlx::query_as::<_, FamilyRelationship>(&sql)
            .bind(relationship_id)
            .fetch_optional(self.pool())
            .await?)
    }

    /// Consent grant: flips the consent flag, enables family mode on both
    /// user rows, and appends the audit entry inside one transaction, so a
    /// crash cannot leave consent set without the flags or the log (or the
    /// reverse).
    pub async fn grant_consent(
        &self,
        relationship_id: Uuid,
        actor_user_id: Uuid,
    ) -> DbResult<FamilyRelationship> {
        let mut tx = self.pool().begin().await?;

        let sql = format!(
            "UPDATE family_relationships SET child_consent_given = true \
             WHERE id = $1 RETURNING {REL_COLUMNS}"
        );
        let relationship = sqlx::query_as::<_, FamilyRelationship>(&sql)
            .bind(relationship_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DbError::NotFound("Relationship not found".to_string()))?;

        sqlx::query("UPDATE users SET family_mode = true, updated_at = now() WHERE id = ANY($1)")
            .bind(vec![
                relationship.parent_user_id,
                relationship.child_user_id,
            ])
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO family_activity_log (relationship_id, actor_user_id, action) \
             VALUES ($1, $2, 'consent_granted')",
        )
        .bind(relationship_id)
        .bind(actor_user_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(relationship)
    }

    /// Consent deny: the row is removed entirely; re-linking requires a fresh
    /// request.
    pub async fn delete_relationship(&self, relationship_id: Uuid) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM family_relationships WHERE id = $1")
            .bind(relationship_id)
            .execute(self.pool())
            .await?;
        if result.rows_affected() == 0 {
            return Err(DbError::NotFound("Relationship not found".to_string()));
        }
        Ok(())
    }

    /// Both directions: rows where the user is the parent and where they are
    /// the child.
    pub async fn list_relationships_for(&self, user_id: Uuid) -> DbResult<Vec<FamilyRelationship>> {
        let sql = format!(
            "SELECT {REL_COLUMNS} FROM family_relationships \
             WHERE parent_user_id = $1 OR child_user_id = $1 ORDER BY created_at"
        );
        Ok(sqlx::query_as::<_, FamilyRelationship>(&sql)
            .bind(user_id)
            .fetch_all(self.pool())
            .await?)
    }

    pub async fn log_family_activity(
        &self,
        relationship_id: Uuid,
        actor_user_id: Uuid,
        action: &str,
        detail: Option<&str>,
    ) -> DbResult<FamilyActivityEntry> {
        let sql = format!(
            "INSERT INTO family_activity_log (relationship_id, actor_user_id, action, detail) \
             VALUES ($1, $2, $3, $4) RETURNING {LOG_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, FamilyActivityEntry>(&sql)
            .bind(relationship_id)
            .bind(actor_user_id)
            .bind(action)
            .bind(detail)
            .fetch_one(self.pool())
            .await?)
    }

    pub async fn list_family_activity(
        &self,
        relationship_id: Uuid,
    ) -> DbResult<Vec<FamilyActivityEntry>> {
        let sql = format!(
            "SELECT {LOG_COLUMNS} FROM family_activity_log \
             WHERE relationship_id = $1 ORDER BY created_at DESC"
        );
        Ok(sqlx::query_as::<_, FamilyActivityEntry>(&sql)
            .bind(relationship_id)
            .fetch_all(self.pool())
            .await?)
    }
}
