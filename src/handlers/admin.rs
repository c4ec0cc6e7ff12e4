//! Development-only operational endpoints. All of them refuse to run in
//! production.

use axum::extract::State;
use serde_json::{json, Value};

use crate::cohort;
use crate::config;
use crate::error::ApiError;
use crate::middleware::ApiResponse;
use crate::state::AppState;

fn ensure_not_production() -> Result<(), ApiError> {
    if config::config().is_production() {
        return Err(ApiError::forbidden(
            "Operational endpoints are disabled in production",
        ));
    }
    Ok(())
}

/// POST /api/cohort-stats - recompute every aggregate triple present
/// in the interest table. Runs inline; this is a maintenance call, not a
/// request-path write.
pub async fn recompute_cohort_stats(
    State(state): State<AppState>,
) -> Result<ApiResponse<Value>, ApiError> {
    ensure_not_production()?;
    let cfg = &config::config().cohort;
    let recomputed = cohort::update_all_cohort_statistics(&state.db, cfg).await?;
    Ok(ApiResponse::success(json!({ "recomputed": recomputed })))
}

/// POST /api/init-db - apply schema DDL
pub async fn init_db(State(state): State<AppState>) -> Result<ApiResponse<Value>, ApiError> {
    ensure_not_production()?;
    state.db.init_schema().await?;
    Ok(ApiResponse::success(json!({ "initialized": true })))
}

/// POST /api/seed-db - seed predefined paths and milestones
pub async fn seed_db(State(state): State<AppState>) -> Result<ApiResponse<Value>, ApiError> {
    ensure_not_production()?;
    let created = state.db.seed_paths().await?;
    Ok(ApiResponse::success(json!({ "pathsCreated": created })))
}

/// POST /api/test-db - connectivity and schema probe
pub async fn test_db(State(state): State<AppState>) -> Result<ApiResponse<Value>, ApiError> {
    ensure_not_production()?;
    state.db.health_check().await?;
    let schema_present = state.db.schema_present().await?;
    Ok(ApiResponse::success(json!({
        "connected": true,
        "schemaPresent": schema_present
    })))
}
