use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use storefront_core::commerce::ApiResponse;
use storefront_core::dispatch::{dispatch_error_to_status_code, DispatchError};
use storefront_core::registry::RegistryError;

/// Gateway handler error.
///
/// Registry failures render as `{"success": false, "message": ...}` like the
/// other admin replies; everything else renders as an `ERR` envelope.
pub struct AppError(pub anyhow::Error);

#[derive(Serialize)]
struct RegistryFailure {
    success: bool,
    message: String,
}

impl AppError {
    /// A `/register` body that failed to deserialize.
    pub fn invalid_body(rejection: JsonRejection) -> Self {
        Self::from(RegistryError::InvalidField {
            field: "body",
            reason: rejection.body_text(),
        })
    }

    /// A path segment that is not a service ID.
    pub fn invalid_service_id(rejection: PathRejection) -> Self {
        Self::from(RegistryError::InvalidField {
            field: "service_id",
            reason: rejection.body_text(),
        })
    }

    fn status_code(&self) -> StatusCode {
        let code = if let Some(dispatch_error) = self.0.downcast_ref::<DispatchError>() {
            dispatch_error_to_status_code(dispatch_error)
        } else if self.0.downcast_ref::<RegistryError>().is_some() {
            400
        } else {
            500
        };
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        if status_code.is_server_error() {
            tracing::warn!(status = %status_code, error = %self.0, "Gateway request failed");
        } else {
            tracing::debug!(status = %status_code, error = %self.0, "Gateway request rejected");
        }

        if self.0.downcast_ref::<RegistryError>().is_some() {
            let body = RegistryFailure {
                success: false,
                message: self.0.to_string(),
            };
            return (status_code, Json(body)).into_response();
        }

        let body: ApiResponse<()> = ApiResponse::err(self.0.to_string());
        (status_code, Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
