use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use storefront_core::commerce::{ApiResponse, CommerceError};
use storefront_core::storage::{store_error_to_status_code, StoreError};

/// Handler error rendered as an `ERR` envelope.
pub struct AppError(pub anyhow::Error);

impl AppError {
    fn status_code(&self) -> StatusCode {
        let code = if let Some(store_error) = self.0.downcast_ref::<StoreError>() {
            store_error_to_status_code(store_error)
        } else if let Some(commerce_error) = self.0.downcast_ref::<CommerceError>() {
            commerce_error.status_code()
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
            tracing::error!(status = %status_code, error = %self.0, "Request failed");
        } else {
            tracing::debug!(status = %status_code, error = %self.0, "Request rejected");
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

/// The error returned when a looked-up entity does not exist.
pub fn not_found(entity_type: &'static str, id: impl ToString) -> StoreError {
    StoreError::NotFound {
        entity_type,
        id: id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_status_from_domain_errors() {
        assert_eq!(
            AppError::from(not_found("User", 42)).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(CommerceError::DuplicateProduct(Uuid::nil())).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::from(StoreError::Timeout(5000)).status_code(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            AppError(anyhow::anyhow!("boom")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
