use axum::{
    extract::{Extension, Json, State},
    http::header::SET_COOKIE,
    response::{AppendHeaders, IntoResponse},
};
use serde_json::json;

use crate::cohort::{AgeBucket, RecomputeJob};
use crate::config;
use crate::database::NewInterest;
use crate::error::ApiError;
use crate::handlers::auth::issue_session;
use crate::middleware::AuthUser;
use crate::state::AppState;
use crate::types::{IntentLevel, SkillLevel};
use crate::validation::{validate_onboarding, OnboardingRequest};

/// POST /api/onboarding/complete - store the initial interest set and mark
/// onboarding done. Enqueues a cohort refresh for each new membership.
///
/// The session token carries the onboarding flag the page gate keys on, so a
/// fresh token and cookie are issued here; the old token would keep sending
/// the user back to the onboarding page.
pub async fn complete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<OnboardingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let result = validate_onboarding(&payload);
    if !result.is_valid() {
        return Err(ApiError::validation("Validation failed", result.errors));
    }

    let user = state.db.require_user(auth.user_id).await?;
    if user.onboarding_completed {
        return Err(ApiError::bad_request("Onboarding has already been completed"));
    }

    // Validator guarantees enum membership
    let interests: Vec<NewInterest> = payload
        .interests
        .iter()
        .filter_map(|i| {
            Some(NewInterest {
                category: i.category.clone(),
                subcategory: i.subcategory.clone(),
                skill_level: SkillLevel::parse(&i.skill_level)?,
                intent_level: IntentLevel::parse(&i.intent_level)?,
            })
        })
        .collect();

    let created = state.db.complete_onboarding(user.id, &interests).await?;

    // Fire-and-forget: the response does not wait for aggregate freshness
    let cfg = &config::config().cohort;
    let bucket = AgeBucket::for_age(user.age_range_min, &cfg.bucket_lower_bounds);
    for interest in &interests {
        state.recompute.enqueue(RecomputeJob {
            bucket: bucket.clone(),
            category: interest.category.clone(),
            intent_level: interest.intent_level,
        });
    }

    let completed_user = state.db.require_user(user.id).await?;
    let (token, cookie) = issue_session(&completed_user)?;

    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(json!({
            "success": true,
            "data": { "interests": created, "token": token },
            "message": "Onboarding completed"
        })),
    ))
}
