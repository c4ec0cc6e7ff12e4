use axum::extract::{Extension, Json, Path, State};
use serde::{Deserialize, Serialize};

use crate::cohort::{self, Comparison};
use crate::config;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, AuthUser};
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonPreference {
    pub allow_peer_comparisons: bool,
}

async fn require_opt_in(state: &AppState, auth: &AuthUser) -> Result<(), ApiError> {
    if state.db.has_opted_into_comparisons(auth.user_id).await? {
        Ok(())
    } else {
        Err(ApiError::forbidden(
            "Peer comparisons are disabled for this account",
        ))
    }
}

/// GET /api/comparisons - the caller's standing in every cohort they belong
/// to. Categories without computed aggregates are absent, not errors.
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<ApiResponse<Vec<Comparison>>, ApiError> {
    require_opt_in(&state, &auth).await?;
    let cfg = &config::config().cohort;
    let comparisons = cohort::get_all_user_comparisons(&state.db, cfg, auth.user_id).await?;
    Ok(ApiResponse::success(comparisons))
}

/// GET /api/comparisons/:category - one category. `data` is null when no
/// aggregate exists yet for the caller's bucket.
pub async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(category): Path<String>,
) -> Result<ApiResponse<Option<Comparison>>, ApiError> {
    require_opt_in(&state, &auth).await?;
    let cfg = &config::config().cohort;
    let comparison = cohort::get_user_comparison(&state.db, cfg, auth.user_id, &category).await?;
    Ok(ApiResponse::success(comparison))
}

/// GET /api/comparisons/preferences - the opt-in flag
pub async fn get_preferences(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<ApiResponse<ComparisonPreference>, ApiError> {
    let opted_in = state.db.has_opted_into_comparisons(auth.user_id).await?;
    Ok(ApiResponse::success(ComparisonPreference {
        allow_peer_comparisons: opted_in,
    }))
}

/// PUT /api/comparisons/preferences - flip the opt-in flag. Opting in queues
/// a backfill so the user's cohorts start including them; the change is
/// observable only as eventual aggregate movement, not in this response.
pub async fn update_preferences(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<ComparisonPreference>,
) -> Result<ApiResponse<ComparisonPreference>, ApiError> {
    let was_opted_in = state.db.has_opted_into_comparisons(auth.user_id).await?;
    let user = state
        .db
        .update_comparison_preference(auth.user_id, payload.allow_peer_comparisons)
        .await?;

    if payload.allow_peer_comparisons != was_opted_in {
        let cfg = &config::config().cohort;
        // Membership changed either way; refresh the affected aggregates
        if let Err(e) =
            cohort::schedule_user_recompute(&state.db, cfg, &state.recompute, user.id).await
        {
            tracing::error!("failed to schedule comparison backfill: {}", e);
        }
    }

    Ok(ApiResponse::success(ComparisonPreference {
        allow_peer_comparisons: user.allow_peer_comparisons,
    }))
}
