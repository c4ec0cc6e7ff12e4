use axum::{
    routing::{get, patch, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod auth;
pub mod cohort;
pub mod config;
pub mod database;
pub mod error;
pub mod family;
pub mod handlers;
pub mod middleware;
pub mod state;
pub mod types;
pub mod validation;

use state::AppState;

/// Assemble the full application router. Every route sits behind the request
/// gate, which classifies paths and rejects or redirects unauthenticated
/// callers before handlers run.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(auth_routes())
        .merge(user_routes())
        .merge(growth_routes())
        .merge(comparison_routes())
        .merge(family_routes())
        .merge(admin_routes())
        .route("/api/health", get(handlers::health::health))
        // Global middleware
        .layer(axum::middleware::from_fn(middleware::gate::request_gate))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_routes() -> Router<AppState> {
    use handlers::auth;

    Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
}

fn user_routes() -> Router<AppState> {
    use handlers::profile;

    Router::new()
        .route(
            "/api/user/profile",
            get(profile::get_profile).put(profile::update_profile),
        )
        .route(
            "/api/user/privacy",
            get(profile::get_privacy).put(profile::update_privacy),
        )
}

fn growth_routes() -> Router<AppState> {
    use handlers::{goals, interests, onboarding, paths, retrospectives};

    Router::new()
        .route("/api/onboarding/complete", post(onboarding::complete))
        .route("/api/goals", get(goals::list).post(goals::create))
        .route("/api/goals/:goal_id", patch(goals::update))
        .route(
            "/api/retrospectives",
            get(retrospectives::list).post(retrospectives::create),
        )
        .route("/api/interests", get(interests::list))
        .route(
            "/api/interests/:interest_id/commitment",
            put(interests::update_commitment),
        )
        .route("/api/paths", get(paths::list))
        .route("/api/paths/:path_id", get(paths::get))
        .route("/api/paths/:path_id/progress", post(paths::advance))
}

fn comparison_routes() -> Router<AppState> {
    use handlers::comparisons;

    Router::new()
        .route(
            "/api/comparisons/preferences",
            get(comparisons::get_preferences).put(comparisons::update_preferences),
        )
        .route("/api/comparisons", get(comparisons::list))
        .route("/api/comparisons/:category", get(comparisons::get))
}

fn family_routes() -> Router<AppState> {
    use handlers::family;

    Router::new()
        .route("/api/family/link", post(family::create_link))
        .route("/api/family/consent", post(family::respond_consent))
        .route("/api/family/relationships", get(family::list_relationships))
        .route("/api/family/activity-log", get(family::activity_log))
}

fn admin_routes() -> Router<AppState> {
    use handlers::admin;

    Router::new()
        .route("/api/cohort-stats", post(admin::recompute_cohort_stats))
        .route("/api/init-db", post(admin::init_db))
        .route("/api/seed-db", post(admin::seed_db))
        .route("/api/test-db", post(admin::test_db))
}
