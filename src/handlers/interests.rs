use axum::extract::{Extension, Json, Path, State};
use serde::Deserialize;
use uuid::Uuid;

use crate::cohort::{schedule_commitment_change, AgeBucket};
use crate::config;
use crate::database::models::UserInterest;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, AuthUser};
use crate::state::AppState;
use crate::types::IntentLevel;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitmentRequest {
    pub intent_level: String,
}

/// GET /api/interests - the caller's interests
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<ApiResponse<Vec<UserInterest>>, ApiError> {
    let interests = state.db.list_interests(auth.user_id).await?;
    Ok(ApiResponse::success(interests))
}

/// PUT /api/interests/:interest_id/commitment - change commitment depth.
/// Membership in both the old and new cohort changed, so both aggregates are
/// queued for refresh; an unchanged level queues nothing.
pub async fn update_commitment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(interest_id): Path<Uuid>,
    Json(payload): Json<CommitmentRequest>,
) -> Result<ApiResponse<UserInterest>, ApiError> {
    let new_level = IntentLevel::parse(&payload.intent_level)
        .ok_or_else(|| ApiError::bad_request("Unknown intent level"))?;

    let interest = state
        .db
        .find_interest(interest_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Interest not found"))?;
    if interest.user_id != auth.user_id {
        return Err(ApiError::not_found("Interest not found"));
    }

    let old_level = IntentLevel::parse(&interest.intent_level)
        .ok_or_else(|| ApiError::internal("Stored intent level is invalid"))?;

    if old_level == new_level {
        // Nothing moved between cohorts; skip the write and the recompute
        return Ok(ApiResponse::success(interest));
    }

    let updated = state.db.update_commitment(interest_id, new_level).await?;

    let user = state.db.require_user(auth.user_id).await?;
    let cfg = &config::config().cohort;
    let bucket = AgeBucket::for_age(user.age_range_min, &cfg.bucket_lower_bounds);
    schedule_commitment_change(
        &state.recompute,
        &bucket,
        &updated.category,
        old_level,
        new_level,
    );

    Ok(ApiResponse::success(updated))
}
