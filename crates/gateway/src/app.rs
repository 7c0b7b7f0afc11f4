use axum::{
    http::{header, Method},
    routing::{any, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    handlers::{admin, health, proxy},
    state::AppState,
};

/// Create the gateway router.
pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        // Registry
        .route("/register", post(admin::register))
        .route(
            "/unregister/{id}",
            post(admin::unregister).delete(admin::unregister),
        )
        .route(
            "/heartbeat/{id}",
            post(admin::heartbeat).put(admin::heartbeat),
        )
        .route("/services", get(admin::list_services))
        .route("/debug/services", get(admin::debug_services))
        .route("/health", get(health::health))
        // Proxy
        .route("/api/{*path}", any(proxy::proxy))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
