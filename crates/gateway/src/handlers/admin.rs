//! Registry endpoints called by service processes and operators.

use std::collections::BTreeMap;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use storefront_core::registry::{
    HeartbeatResponse, RegisterResponse, ServiceDescriptor, UnregisterResponse,
};
use uuid::Uuid;

use crate::{handlers::AppError, registry::InstanceView, state::AppState};

/// POST /register - Adds an instance and returns its service ID.
#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    descriptor: Result<Json<ServiceDescriptor>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let Json(descriptor) = descriptor.map_err(AppError::invalid_body)?;
    let instance = state.registry.register(descriptor).await?;
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            success: true,
            service_id: instance.service_id,
        }),
    ))
}

/// POST /heartbeat/{id} - `success: false` tells the caller to register again.
#[axum::debug_handler]
pub async fn heartbeat(
    State(state): State<AppState>,
    service_id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<HeartbeatResponse>, AppError> {
    let Path(service_id) = service_id.map_err(AppError::invalid_service_id)?;
    let success = state.registry.heartbeat(service_id).await;
    Ok(Json(HeartbeatResponse { success }))
}

/// POST or DELETE /unregister/{id}
#[axum::debug_handler]
pub async fn unregister(
    State(state): State<AppState>,
    service_id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<UnregisterResponse>, AppError> {
    let Path(service_id) = service_id.map_err(AppError::invalid_service_id)?;
    let success = state.registry.unregister(service_id).await;
    Ok(Json(UnregisterResponse { success }))
}

/// GET /services - Routable instances grouped by service name.
#[axum::debug_handler]
pub async fn list_services(
    State(state): State<AppState>,
) -> Json<BTreeMap<String, Vec<InstanceView>>> {
    Json(state.registry.snapshot(false).await)
}

/// GET /debug/services - Every tracked instance, expired ones included.
#[axum::debug_handler]
pub async fn debug_services(
    State(state): State<AppState>,
) -> Json<BTreeMap<String, Vec<InstanceView>>> {
    Json(state.registry.snapshot(true).await)
}
