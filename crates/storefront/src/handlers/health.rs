//! Health check endpoints.
//!
//! - `/livez` - liveness probe (immediate 200, no checks)
//! - `/health` - reports which service this process runs

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /livez - Basic liveness probe.
#[axum::debug_handler]
pub async fn livez() -> StatusCode {
    StatusCode::OK
}

/// GET /health - Service identity and current time.
#[axum::debug_handler]
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": state.service.service_name(),
        "timestamp": Utc::now().to_rfc3339(),
    }))
}
