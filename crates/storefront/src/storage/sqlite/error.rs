//! Mapping of `tokio_rusqlite` and `rusqlite` errors onto `StoreError`.

use rusqlite::{ffi, ErrorCode};
use storefront_core::storage::StoreError;

use super::repository::BUSY_TIMEOUT;

fn map_rusqlite_error(err: &rusqlite::Error, entity_type: &'static str, id: &str) -> StoreError {
    match err {
        rusqlite::Error::SqliteFailure(sqlite_err, _)
            if sqlite_err.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                || sqlite_err.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            StoreError::AlreadyExists {
                entity_type,
                id: id.to_string(),
            }
        }

        rusqlite::Error::SqliteFailure(sqlite_err, _)
            if matches!(
                sqlite_err.code,
                ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked
            ) =>
        {
            StoreError::Timeout(BUSY_TIMEOUT.as_millis() as u64)
        }

        rusqlite::Error::SqliteFailure(sqlite_err, _) if sqlite_err.code == ErrorCode::CannotOpen => {
            StoreError::ConnectionFailed(format!("Cannot open database: {err}"))
        }

        // Row-count checks on UPDATE/DELETE report a missing row this way.
        rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound {
            entity_type,
            id: id.to_string(),
        },

        rusqlite::Error::FromSqlConversionFailure(..) | rusqlite::Error::ToSqlConversionFailure(_) => {
            StoreError::InvalidData(err.to_string())
        }

        _ => StoreError::QueryFailed(err.to_string()),
    }
}

/// Maps a `tokio_rusqlite` error for an operation on one entity.
pub fn map_tokio_rusqlite_error(
    err: tokio_rusqlite::Error,
    entity_type: &'static str,
    id: impl Into<String>,
) -> StoreError {
    match &err {
        tokio_rusqlite::Error::Rusqlite(rusqlite_err) => {
            map_rusqlite_error(rusqlite_err, entity_type, &id.into())
        }
        tokio_rusqlite::Error::ConnectionClosed | tokio_rusqlite::Error::Close(_) => {
            StoreError::ConnectionFailed("Connection closed unexpectedly".to_string())
        }
        _ => StoreError::QueryFailed(err.to_string()),
    }
}
