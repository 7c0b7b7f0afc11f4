use thiserror::Error;

/// Errors raised by the service registry.
///
/// Only malformed input is an error. Lookups of absent instances are
/// reported as `false`/empty results, never through this type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
    #[error("Unknown selection policy: {0}")]
    UnknownPolicy(String),
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
