//! Root and health endpoints

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::http::server::AppState;

/// Root informational response
#[derive(Serialize)]
pub struct RootResponse {
    pub message: String,
    pub version: String,
    pub environment: String,
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: String,
    pub version: String,
}

/// GET /
async fn root(State(state): State<Arc<AppState>>) -> Json<RootResponse> {
    let settings = &state.settings;
    Json(RootResponse {
        message: format!("Welcome to {}", settings.app_name),
        version: settings.app_version.clone(),
        environment: settings.app_env.clone(),
    })
}

/// GET /health
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: state.settings.app_name.clone(),
        version: state.settings.app_version.clone(),
    })
}

/// Health routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
}
