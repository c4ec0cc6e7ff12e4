use axum::extract::{Extension, Json, State};
use serde_json::json;

use crate::database::models::Retrospective;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, AuthUser};
use crate::state::AppState;
use crate::types::RetroType;
use crate::validation::{validate_retrospective, RetrospectiveRequest};

/// GET /api/retrospectives - the caller's reflections, newest first
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<ApiResponse<Vec<Retrospective>>, ApiError> {
    let retros = state.db.list_retrospectives(auth.user_id).await?;
    Ok(ApiResponse::success(retros))
}

/// POST /api/retrospectives - append a reflection record
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<RetrospectiveRequest>,
) -> Result<ApiResponse<Retrospective>, ApiError> {
    let result = validate_retrospective(&payload);
    if !result.is_valid() {
        return Err(ApiError::validation("Validation failed", result.errors));
    }

    let retro_type = RetroType::parse(&payload.retro_type)
        .ok_or_else(|| ApiError::bad_request("Unknown retrospective type"))?;
    let skill_updates = payload.skill_updates.unwrap_or_else(|| json!({}));
    let goals_reviewed = payload.goals_reviewed.unwrap_or_else(|| json!([]));

    let created = state
        .db
        .create_retrospective(
            auth.user_id,
            retro_type,
            payload.insights.trim(),
            &skill_updates,
            &goals_reviewed,
        )
        .await?;
    Ok(ApiResponse::success(created))
}
