//! Health check endpoint.

use axum::Json;
use axum::extract::State;
use tracing::warn;

use crate::AppState;
use crate::models::HealthResponse;

/// `GET /healthz` — liveness plus a store connectivity probe.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let store_connected = state.auth.store().ping().await;
    if !store_connected {
        warn!("account store unreachable");
    }
    Json(HealthResponse {
        status: "ok".into(),
        store_connected,
    })
}
