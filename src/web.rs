//! Liveness and status endpoints.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use tracing::info;

use crate::scanner::SharedStats;

pub fn routes(stats: SharedStats) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/status", get(status))
        .with_state(stats)
}

/// GET / - service description.
async fn root() -> Json<Value> {
    Json(json!({
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
    }))
}

/// GET /health
async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// GET /status - scanner counters.
async fn status(State(stats): State<SharedStats>) -> Json<Value> {
    let snapshot = stats.read().clone();
    Json(json!({ "status": "running", "scanner": snapshot }))
}

pub async fn serve(port: u16, stats: SharedStats) -> anyhow::Result<()> {
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    info!(port, "web server starting");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, routes(stats)).await?;
    Ok(())
}
