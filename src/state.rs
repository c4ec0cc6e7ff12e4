use crate::cohort::RecomputeQueue;
use crate::database::Database;

/// Shared application state, constructed once at startup and injected into
/// every handler through axum state.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub recompute: RecomputeQueue,
}
