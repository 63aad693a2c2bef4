pub mod ip;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::types::{HealthResponse, InfoResponse};
use ip::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health))
        .route("/api/info", get(info))
        // Allocation
        .route("/api/ip/groups/:name/unused", post(ip::unused_group_address))
        .route("/api/ip/networks/unused", post(ip::unused_network_address))
        .route(
            "/api/ip/networks/:name/unused",
            post(ip::unused_configured_network_address),
        )
        // Classification and cooldown
        .route("/api/ip/classify/:address", get(ip::classify_address))
        .route("/api/ip/release", post(ip::release_address))
        .route("/api/ip/cooldown/:address", get(ip::cooldown_status))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Health check endpoint
async fn health() -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
        }),
    )
}

/// GET /api/info - Version and loaded pools
async fn info(State(state): State<Arc<AppState>>) -> Json<InfoResponse> {
    let options = state.ip_service.options();

    Json(InfoResponse {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        cooldown_minutes: options.cooldown_minutes,
        groups: options.groups.iter().map(|g| g.name.clone()).collect(),
        networks: options.networks.iter().map(|n| n.name.clone()).collect(),
    })
}
