use thiserror::Error;

use super::TransportFailure;

/// Errors the gateway dispatcher surfaces to its caller.
///
/// A well-formed error response from a downstream service is NOT a
/// dispatch error: it is returned to the caller verbatim.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("No live instance of {0}")]
    ServiceUnavailable(String),
    #[error("No service is mapped to {0}")]
    UnknownRoute(String),
    #[error("Upstream {service} unreachable after {attempts} attempt(s): {failure}")]
    Transport {
        service: String,
        attempts: usize,
        failure: TransportFailure,
    },
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Result type for dispatch operations.
pub type Result<T> = std::result::Result<T, DispatchError>;

/// Maps a [`DispatchError`] to an HTTP status code.
///
/// - `ServiceUnavailable` -> 503
/// - `UnknownRoute` -> 404
/// - `Transport` -> 504 on timeout, 502 otherwise
/// - `InvalidRequest` -> 400
pub fn dispatch_error_to_status_code(error: &DispatchError) -> u16 {
    match error {
        DispatchError::ServiceUnavailable(_) => 503,
        DispatchError::UnknownRoute(_) => 404,
        DispatchError::Transport {
            failure: TransportFailure::Timeout(_),
            ..
        } => 504,
        DispatchError::Transport { .. } => 502,
        DispatchError::InvalidRequest(_) => 400,
    }
}
