use axum::extract::{Extension, Json, Path, State};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::database::models::Goal;
use crate::database::NewGoal;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, AuthUser};
use crate::state::AppState;
use crate::types::{GoalStatus, GoalType, SkillLevel, Timeframe};
use crate::validation::{validate_goal, validate_goal_update, GoalCreateRequest, GoalUpdateRequest};

/// GET /api/goals - the caller's goals, newest first
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<ApiResponse<Vec<Goal>>, ApiError> {
    let goals = state.db.list_goals(auth.user_id).await?;
    Ok(ApiResponse::success(goals))
}

/// POST /api/goals - create a goal
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<GoalCreateRequest>,
) -> Result<ApiResponse<Goal>, ApiError> {
    let result = validate_goal(&payload, Utc::now());
    if !result.is_valid() {
        return Err(ApiError::validation("Validation failed", result.errors));
    }

    let target_date = payload
        .target_date
        .as_deref()
        .and_then(|d| DateTime::parse_from_rfc3339(d).ok())
        .map(|d| d.with_timezone(&Utc));

    // Enum parses vetted by the validator
    let goal = NewGoal {
        category: &payload.category,
        goal_type: GoalType::parse(&payload.goal_type)
            .ok_or_else(|| ApiError::bad_request("Unknown goal type"))?,
        title: payload.title.trim(),
        description: payload.description.as_deref(),
        target_level: SkillLevel::parse(&payload.target_level)
            .ok_or_else(|| ApiError::bad_request("Unknown target level"))?,
        timeframe: Timeframe::parse(&payload.timeframe)
            .ok_or_else(|| ApiError::bad_request("Unknown timeframe"))?,
        target_date,
    };

    let created = state.db.create_goal(auth.user_id, goal).await?;
    Ok(ApiResponse::success(created))
}

/// PATCH /api/goals/:goal_id - partial update; status is a direct write
/// constrained only to the four known values
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(goal_id): Path<Uuid>,
    Json(payload): Json<GoalUpdateRequest>,
) -> Result<ApiResponse<Goal>, ApiError> {
    let result = validate_goal_update(&payload, Utc::now());
    if !result.is_valid() {
        return Err(ApiError::validation("Validation failed", result.errors));
    }

    let existing = state
        .db
        .find_goal(goal_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Goal not found"))?;
    // Foreign goals look identical to missing ones
    if existing.user_id != auth.user_id {
        return Err(ApiError::not_found("Goal not found"));
    }

    let target_date = payload
        .target_date
        .as_deref()
        .and_then(|d| DateTime::parse_from_rfc3339(d).ok())
        .map(|d| d.with_timezone(&Utc));

    let updated = state
        .db
        .update_goal(
            goal_id,
            payload.status.as_deref().and_then(GoalStatus::parse),
            payload.title.as_deref(),
            payload.description.as_deref(),
            payload.target_level.as_deref().and_then(SkillLevel::parse),
            target_date,
        )
        .await?;
    Ok(ApiResponse::success(updated))
}
