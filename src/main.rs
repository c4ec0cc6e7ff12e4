use life_leveling_api::cohort::RecomputeQueue;
use life_leveling_api::database::Database;
use life_leveling_api::state::AppState;
use life_leveling_api::{app, config};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("Starting Life Leveling API in {:?} mode", config.environment);

    let db = Database::connect(&config.database).unwrap_or_else(|e| {
        panic!("failed to configure database pool: {}", e);
    });

    // Background worker draining cohort recompute jobs; write paths enqueue
    // and never wait for it.
    let recompute = RecomputeQueue::start(db.clone(), config.cohort.recompute_queue_depth);

    let state = AppState { db, recompute };
    let app = app(state);

    // Allow tests or deployments to override port via env
    let port = std::env::var("LIFE_LEVELING_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("Life Leveling API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}
