use axum::extract::{Extension, Json, Query, State};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::{FamilyActivityEntry, FamilyRelationship};
use crate::error::ApiError;
use crate::family;
use crate::middleware::{ApiResponse, AuthUser};
use crate::state::AppState;
use crate::types::RelationshipType;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkRequest {
    pub child_email: String,
    #[serde(default)]
    pub relationship_type: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentRequest {
    pub relationship_id: Uuid,
    pub consent_given: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLogQuery {
    pub relationship_id: Option<Uuid>,
}

/// POST /api/family/link - adult requests a link to a minor's account
pub async fn create_link(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<LinkRequest>,
) -> Result<ApiResponse<FamilyRelationship>, ApiError> {
    let relationship_type = match payload.relationship_type.as_deref() {
        None => RelationshipType::Parent,
        Some(s) => RelationshipType::parse(s)
            .ok_or_else(|| ApiError::bad_request("Relationship type must be parent or guardian"))?,
    };
    if payload.child_email.trim().is_empty() {
        return Err(ApiError::bad_request("Child email is required"));
    }

    let relationship = family::create_link_request(
        &state.db,
        auth.user_id,
        payload.child_email.trim(),
        relationship_type,
    )
    .await?;
    Ok(ApiResponse::success(relationship).with_message("Link request created, awaiting consent"))
}

/// POST /api/family/consent - child grants or declines. A decline removes
/// the relationship entirely.
pub async fn respond_consent(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<ConsentRequest>,
) -> Result<ApiResponse<Option<FamilyRelationship>>, ApiError> {
    let outcome = family::respond_to_consent(
        &state.db,
        auth.user_id,
        payload.relationship_id,
        payload.consent_given,
    )
    .await?;

    let message = match &outcome {
        Some(_) => "Consent granted, family mode enabled",
        None => "Request declined and removed",
    };
    Ok(ApiResponse::success(outcome).with_message(message))
}

/// GET /api/family/relationships - both directions for the caller
pub async fn list_relationships(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<ApiResponse<Vec<FamilyRelationship>>, ApiError> {
    let relationships = state.db.list_relationships_for(auth.user_id).await?;
    Ok(ApiResponse::success(relationships))
}

/// GET /api/family/activity-log?relationshipId= - audit entries, visible only
/// to parties of an active (consented) relationship
pub async fn activity_log(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<ActivityLogQuery>,
) -> Result<ApiResponse<Vec<FamilyActivityEntry>>, ApiError> {
    let relationship_id = query
        .relationship_id
        .ok_or_else(|| ApiError::bad_request("relationshipId query parameter is required"))?;

    let entries = family::get_activity_log(&state.db, auth.user_id, relationship_id).await?;
    Ok(ApiResponse::success(entries))
}
