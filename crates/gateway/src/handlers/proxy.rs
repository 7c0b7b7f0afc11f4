use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::header,
    response::Response,
};
use storefront_core::dispatch::{AuthContext, DispatchError};

use crate::{
    dispatch::{strip_hop_by_hop, ForwardRequest},
    handlers::AppError,
    state::AppState,
};

/// Largest request body the gateway will buffer.
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// ANY /api/{*path} - Forwards to the service owning the path prefix.
pub async fn proxy(State(state): State<AppState>, request: Request) -> Result<Response, AppError> {
    let (parts, body) = request.into_parts();

    let auth = AuthContext::from_header(
        parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok()),
    );
    let path_and_query = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| parts.uri.path().to_string());
    let body = to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|e| DispatchError::InvalidRequest(format!("unreadable body: {e}")))?;

    let mut headers = parts.headers;
    headers.remove(header::AUTHORIZATION);
    strip_hop_by_hop(&mut headers);

    let forwarded = ForwardRequest {
        method: parts.method,
        path_and_query,
        headers,
        body,
    };
    let downstream = state.dispatcher.route_path(forwarded, &auth).await?;

    let mut response = Response::new(Body::from(downstream.body));
    *response.status_mut() = downstream.status;
    *response.headers_mut() = downstream.headers;
    Ok(response)
}

