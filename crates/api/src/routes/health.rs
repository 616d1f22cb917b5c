use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;

use crate::ApiState;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    timezone: String,
    first_slot: String,
    last_slot: String,
}

#[derive(Serialize)]
struct VersionResponse {
    version: &'static str,
}

/// Liveness plus the shop settings the process is running with.
async fn health_check(State(state): State<Arc<ApiState>>) -> Json<HealthResponse> {
    let settings = state.booking.settings();
    let labels = settings.grid.labels();
    Json(HealthResponse {
        status: "ok",
        timezone: settings.timezone.name().to_string(),
        first_slot: labels.first().map(ToString::to_string).unwrap_or_default(),
        last_slot: labels.last().map(ToString::to_string).unwrap_or_default(),
    })
}

async fn version() -> Json<VersionResponse> {
    Json(VersionResponse {
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/health", get(health_check))
        .route("/version", get(version))
}
