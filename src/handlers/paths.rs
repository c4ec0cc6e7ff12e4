use axum::extract::{Extension, Json, Path, State};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::models::{LevelPath, Milestone, PathProgress};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, AuthUser};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathDetail {
    #[serde(flatten)]
    pub path: LevelPath,
    pub milestones: Vec<Milestone>,
    pub progress: Option<PathProgress>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRequest {
    pub stage: i32,
}

/// GET /api/paths - all predefined paths
pub async fn list(State(state): State<AppState>) -> Result<ApiResponse<Vec<LevelPath>>, ApiError> {
    let paths = state.db.list_paths().await?;
    Ok(ApiResponse::success(paths))
}

/// GET /api/paths/:path_id - one path with its milestones and the caller's
/// progress
pub async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(path_id): Path<Uuid>,
) -> Result<ApiResponse<PathDetail>, ApiError> {
    let path = state
        .db
        .find_path(path_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Path not found"))?;
    let milestones = state.db.list_milestones(path_id).await?;
    let progress = state.db.find_progress(auth.user_id, path_id).await?;

    Ok(ApiResponse::success(PathDetail {
        path,
        milestones,
        progress,
    }))
}

/// POST /api/paths/:path_id/progress - record stage completion. Progress is
/// monotonic: reporting an earlier stage never regresses the stored one.
pub async fn advance(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(path_id): Path<Uuid>,
    Json(payload): Json<ProgressRequest>,
) -> Result<ApiResponse<PathProgress>, ApiError> {
    let progress = state
        .db
        .advance_progress(auth.user_id, path_id, payload.stage)
        .await?;
    Ok(ApiResponse::success(progress))
}
