use axum::{extract::State, Json};
use chrono::Utc;
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health - Gateway status and registry size.
#[axum::debug_handler]
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let services = state.registry.snapshot(false).await;
    let instances: usize = services.values().map(Vec::len).sum();
    Json(json!({
        "status": "healthy",
        "service": "api-gateway",
        "services": services.len(),
        "instances": instances,
        "livenessWindowSeconds": state.config.liveness_window_seconds,
        "timestamp": Utc::now().to_rfc3339(),
    }))
}
