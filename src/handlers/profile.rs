use axum::extract::{Extension, Json, State};
use serde::Deserialize;

use crate::cohort;
use crate::config;
use crate::database::models::user::PrivacyPreferences;
use crate::database::models::User;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, AuthUser};
use crate::state::AppState;
use crate::types::AgeRange;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdateRequest {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub age_range: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivacyUpdateRequest {
    #[serde(default)]
    pub allow_peer_comparisons: Option<bool>,
    #[serde(default)]
    pub share_progress_with_family: Option<bool>,
    #[serde(default)]
    pub show_on_leaderboards: Option<bool>,
    #[serde(default)]
    pub allow_mentor_contact: Option<bool>,
}

/// GET /api/user/profile
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<ApiResponse<User>, ApiError> {
    let user = state.db.require_user(auth.user_id).await?;
    Ok(ApiResponse::success(user))
}

/// PUT /api/user/profile - display name and age range
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<ProfileUpdateRequest>,
) -> Result<ApiResponse<User>, ApiError> {
    let age_range = match payload.age_range.as_deref() {
        None => None,
        Some(s) => Some(
            AgeRange::parse(s)
                .ok_or_else(|| ApiError::bad_request("Age range must be of the form MIN-MAX"))?,
        ),
    };

    let user = state
        .db
        .update_profile(auth.user_id, payload.display_name.as_deref(), age_range)
        .await?;
    Ok(ApiResponse::success(user))
}

/// GET /api/user/privacy - the privacy toggle set
pub async fn get_privacy(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<ApiResponse<PrivacyPreferences>, ApiError> {
    let user = state.db.require_user(auth.user_id).await?;
    Ok(ApiResponse::success(PrivacyPreferences::from(&user)))
}

/// PUT /api/user/privacy - update any subset of the toggles. Flipping the
/// peer-comparison toggle routes through the same backfill as the
/// comparisons preference endpoint.
pub async fn update_privacy(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<PrivacyUpdateRequest>,
) -> Result<ApiResponse<PrivacyPreferences>, ApiError> {
    let before = state.db.require_user(auth.user_id).await?;

    let user = state
        .db
        .update_privacy(
            auth.user_id,
            payload.allow_peer_comparisons,
            payload.share_progress_with_family,
            payload.show_on_leaderboards,
            payload.allow_mentor_contact,
        )
        .await?;

    if user.allow_peer_comparisons != before.allow_peer_comparisons {
        let cfg = &config::config().cohort;
        if let Err(e) =
            cohort::schedule_user_recompute(&state.db, cfg, &state.recompute, user.id).await
        {
            tracing::error!("failed to schedule comparison backfill: {}", e);
        }
    }

    Ok(ApiResponse::success(PrivacyPreferences::from(&user)))
}
