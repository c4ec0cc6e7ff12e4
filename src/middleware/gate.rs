//! Request gate: classifies every inbound path and blocks or redirects
//! before handlers run. API prefixes get JSON 401s; page paths get login or
//! onboarding redirects.

use axum::{
    extract::Request,
    http::{header::LOCATION, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};

use crate::error::ApiError;
use crate::middleware::auth::resolve_auth;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// API endpoints reachable without a session (register, login, health,
    /// and the environment-guarded maintenance endpoints).
    PublicApi,
    /// API endpoints requiring a session; unauthenticated calls get 401 JSON.
    ProtectedApi,
    /// Pages anyone can load.
    PublicPage,
    /// Pages requiring a session; unauthenticated loads redirect to login.
    ProtectedPage,
}

const PUBLIC_API_PATHS: &[&str] = &[
    "/api/auth/register",
    "/api/auth/login",
    "/api/health",
    // Maintenance endpoints; the handlers refuse to run in production
    "/api/cohort-stats",
    "/api/init-db",
    "/api/seed-db",
    "/api/test-db",
];

const PUBLIC_PAGES: &[&str] = &["/", "/login", "/register", "/about"];

pub fn classify(path: &str) -> RouteClass {
    if path.starts_with("/api/") {
        if PUBLIC_API_PATHS.contains(&path) {
            RouteClass::PublicApi
        } else {
            RouteClass::ProtectedApi
        }
    } else if PUBLIC_PAGES.contains(&path) {
        RouteClass::PublicPage
    } else {
        RouteClass::ProtectedPage
    }
}

pub async fn request_gate(mut request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let auth = resolve_auth(request.headers());

    // Make the caller available to handlers whenever a valid session exists,
    // including on public routes.
    if let Some(user) = auth.clone() {
        request.extensions_mut().insert(user);
    }

    match classify(&path) {
        RouteClass::PublicApi | RouteClass::PublicPage => next.run(request).await,

        RouteClass::ProtectedApi => match auth {
            Some(_) => next.run(request).await,
            None => {
                let err = ApiError::NoSession;
                (StatusCode::UNAUTHORIZED, Json(err.to_json())).into_response()
            }
        },

        RouteClass::ProtectedPage => match auth {
            None => found(&format!("/login?returnUrl={}", path)),
            Some(user) if !user.onboarding_completed && path != "/onboarding" => {
                found("/onboarding")
            }
            Some(_) => next.run(request).await,
        },
    }
}

/// 302 Found page redirect
fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(LOCATION, location.to_string())]).into_response()
}
