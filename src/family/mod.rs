//! Family linking: the parent-child consent state machine.
//!
//! A relationship starts as a request (consent flag false), becomes active
//! when the child grants consent, or disappears entirely when the child
//! declines. Activity-log visibility requires an active relationship.

use thiserror::Error;
use uuid::Uuid;

use crate::database::models::{FamilyActivityEntry, FamilyRelationship};
use crate::database::{Database, DbError};
use crate::error::ApiError;
use crate::types::{AgeRange, RelationshipType};

#[derive(Debug, Error)]
pub enum FamilyError {
    #[error("Only adults can request a family link")]
    RequesterNotAdult,

    #[error("Family links can only target accounts for users under 18")]
    TargetNotMinor,

    #[error("No account found for that email")]
    TargetNotFound,

    #[error("Cannot create a family link with yourself")]
    SelfLink,

    #[error("A relationship between these users already exists")]
    AlreadyLinked,

    #[error("Relationship not found")]
    NotFound,

    #[error("Only the child can respond to a link request")]
    NotChildParty,

    #[error("You are not a party to this relationship")]
    NotAParty,

    #[error("Activity log requires an active, consented relationship")]
    NotActive,

    #[error(transparent)]
    Db(#[from] DbError),
}

impl From<FamilyError> for ApiError {
    fn from(err: FamilyError) -> Self {
        match err {
            FamilyError::RequesterNotAdult
            | FamilyError::NotChildParty
            | FamilyError::NotAParty
            | FamilyError::NotActive => ApiError::forbidden(err.to_string()),
            FamilyError::TargetNotMinor | FamilyError::SelfLink | FamilyError::AlreadyLinked => {
                ApiError::bad_request(err.to_string())
            }
            FamilyError::TargetNotFound | FamilyError::NotFound => {
                ApiError::not_found(err.to_string())
            }
            FamilyError::Db(db) => db.into(),
        }
    }
}

/// Age-based eligibility for creating a link. Pure so the rules are testable
/// without a store: requester must be an adult, target must be a minor.
fn check_link_eligibility(
    requester: AgeRange,
    target: AgeRange,
    is_self: bool,
    already_linked: bool,
) -> Result<(), FamilyError> {
    if requester.min < 18 {
        return Err(FamilyError::RequesterNotAdult);
    }
    if is_self {
        return Err(FamilyError::SelfLink);
    }
    if !target.is_minor() {
        return Err(FamilyError::TargetNotMinor);
    }
    if already_linked {
        return Err(FamilyError::AlreadyLinked);
    }
    Ok(())
}

/// Create a pending link request from an adult to a minor's account.
pub async fn create_link_request(
    db: &Database,
    requester_id: Uuid,
    child_email: &str,
    relationship_type: RelationshipType,
) -> Result<FamilyRelationship, FamilyError> {
    let requester = db
        .find_user(requester_id)
        .await?
        .ok_or(FamilyError::NotFound)?;
    let child = db
        .find_user_by_email(child_email)
        .await?
        .ok_or(FamilyError::TargetNotFound)?;

    let existing = db
        .find_relationship_between(requester.id, child.id)
        .await?
        .is_some();
    check_link_eligibility(
        requester.age_range(),
        child.age_range(),
        requester.id == child.id,
        existing,
    )?;

    let relationship = db
        .create_relationship(requester.id, child.id, relationship_type)
        .await?;
    db.log_family_activity(relationship.id, requester.id, "link_requested", None)
        .await?;
    Ok(relationship)
}

/// Consent response from the child party. Granting activates the link and
/// enables family mode for both users (one transaction); granting an already
/// active link is a no-op success. Declining deletes the row: the next lookup
/// of its id is a 404.
pub async fn respond_to_consent(
    db: &Database,
    caller_id: Uuid,
    relationship_id: Uuid,
    consent_given: bool,
) -> Result<Option<FamilyRelationship>, FamilyError> {
    let relationship = db
        .find_relationship(relationship_id)
        .await?
        .ok_or(FamilyError::NotFound)?;
    if relationship.child_user_id != caller_id {
        return Err(FamilyError::NotChildParty);
    }

    if consent_given {
        if relationship.child_consent_given {
            // Idempotent: a second grant changes nothing
            return Ok(Some(relationship));
        }
        // The grant writes its own audit entry in the same transaction
        let activated = db.grant_consent(relationship_id, caller_id).await?;
        Ok(Some(activated))
    } else {
        db.delete_relationship(relationship_id).await?;
        Ok(None)
    }
}

/// Activity log entries for a relationship the caller is a party to. Pending
/// (unconsented) relationships grant no visibility.
pub async fn get_activity_log(
    db: &Database,
    caller_id: Uuid,
    relationship_id: Uuid,
) -> Result<Vec<FamilyActivityEntry>, FamilyError> {
    let relationship = db
        .find_relationship(relationship_id)
        .await?
        .ok_or(FamilyError::NotFound)?;
    if relationship.parent_user_id != caller_id && relationship.child_user_id != caller_id {
        return Err(FamilyError::NotAParty);
    }
    if !relationship.child_consent_given {
        return Err(FamilyError::NotActive);
    }
    Ok(db.list_family_activity(relationship_id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adult() -> AgeRange {
        AgeRange::new(25, 34)
    }

    fn minor() -> AgeRange {
        AgeRange::new(13, 15)
    }

    #[test]
    fn adult_can_link_minor() {
        assert!(check_link_eligibility(adult(), minor(), false, false).is_ok());
    }

    #[test]
    fn requester_must_be_adult() {
        let result = check_link_eligibility(AgeRange::new(15, 17), minor(), false, false);
        assert!(matches!(result, Err(FamilyError::RequesterNotAdult)));
        // Boundary: 18 is an adult
        assert!(check_link_eligibility(AgeRange::new(18, 24), minor(), false, false).is_ok());
    }

    #[test]
    fn target_must_be_minor() {
        let result = check_link_eligibility(adult(), AgeRange::new(18, 24), false, false);
        assert!(matches!(result, Err(FamilyError::TargetNotMinor)));
    }

    #[test]
    fn rejects_self_and_duplicate_links() {
        assert!(matches!(
            check_link_eligibility(adult(), minor(), true, false),
            Err(FamilyError::SelfLink)
        ));
        assert!(matches!(
            check_link_eligibility(adult(), minor(), false, true),
            Err(FamilyError::AlreadyLinked)
        ));
    }

    #[test]
    fn errors_map_to_expected_statuses() {
        use axum::http::StatusCode;

        let forbidden: ApiError = FamilyError::RequesterNotAdult.into();
        assert_eq!(forbidden.status_code(), StatusCode::FORBIDDEN);

        let bad_request: ApiError = FamilyError::TargetNotMinor.into();
        assert_eq!(bad_request.status_code(), StatusCode::BAD_REQUEST);

        let dup: ApiError = FamilyError::AlreadyLinked.into();
        assert_eq!(dup.status_code(), StatusCode::BAD_REQUEST);

        let not_found: ApiError = FamilyError::NotFound.into();
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);

        let not_active: ApiError = FamilyError::NotActive.into();
        assert_eq!(not_active.status_code(), StatusCode::FORBIDDEN);
    }
}
