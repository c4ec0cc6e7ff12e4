use axum::{
    extract::{Extension, State},
    http::header::SET_COOKIE,
    response::{AppendHeaders, IntoResponse, Json},
};
use serde::Deserialize;
use serde_json::json;

use crate::auth::{generate_token, password, Claims};
use crate::database::models::User;
use crate::error::ApiError;
use crate::middleware::auth::{clear_session_cookie_header, session_cookie_header};
use crate::middleware::{ApiResponse, AuthUser};
use crate::state::AppState;
use crate::types::AgeRange;
use crate::validation::{validate_registration, RegisterRequest};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Token and Set-Cookie pair for the user's current state. Re-issued whenever
/// a claim the gate depends on changes (e.g. onboarding completion).
pub(crate) fn issue_session(user: &User) -> Result<(String, String), ApiError> {
    let claims = Claims::new(user.id, user.email.clone(), user.onboarding_completed);
    let token = generate_token(&claims).map_err(|e| {
        tracing::error!("token generation failed: {}", e);
        ApiError::internal("Could not create session")
    })?;
    let cookie = session_cookie_header(&token);
    Ok((token, cookie))
}

/// POST /api/auth/register - create an account and start a session
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let result = validate_registration(&payload);
    if !result.is_valid() {
        return Err(ApiError::validation("Validation failed", result.errors));
    }

    // Parse already vetted by the validator
    let age_range = AgeRange::parse(&payload.age_range)
        .ok_or_else(|| ApiError::bad_request("Invalid age range"))?;

    let hash = password::hash_password(&payload.password).map_err(|e| {
        tracing::error!("password hashing failed: {}", e);
        ApiError::internal("Could not create account")
    })?;

    let user = state.db.create_user(&payload.email, &hash, age_range).await?;
    let (token, cookie) = issue_session(&user)?;

    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(json!({
            "success": true,
            "data": { "user": user, "token": token }
        })),
    ))
}

/// POST /api/auth/login - verify credentials and start a session
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .db
        .find_user_by_email(&payload.email)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    let verified = password::verify_password(&payload.password, &user.password_hash)
        .map_err(|e| {
            tracing::error!("password verification failed: {}", e);
            ApiError::internal("Could not verify credentials")
        })?;
    if !verified {
        return Err(ApiError::InvalidCredentials);
    }

    let (token, cookie) = issue_session(&user)?;
    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(json!({
            "success": true,
            "data": { "user": user, "token": token }
        })),
    ))
}

/// POST /api/auth/logout - clear the session cookie
pub async fn logout() -> impl IntoResponse {
    (
        AppendHeaders([(SET_COOKIE, clear_session_cookie_header())]),
        Json(json!({ "success": true, "message": "Logged out" })),
    )
}

/// GET /api/auth/me - current user from the session
pub async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<ApiResponse<User>, ApiError> {
    let user = state.db.require_user(auth.user_id).await?;
    Ok(ApiResponse::success(user))
}
