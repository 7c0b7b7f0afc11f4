//! Conversions between SQLite values and domain documents.
//!
//! Pure functions; testable without a database.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{types::Type, Row};
use serde::{de::DeserializeOwned, Serialize};

use storefront_core::storage::{Result, StoreError};

/// Formats a timestamp as fixed-width RFC 3339 so text order matches time order.
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// SQLite integers are signed; prices above `i64::MAX` cannot be stored.
pub fn price_to_sql(price: u64) -> Result<i64> {
    i64::try_from(price)
        .map_err(|_| StoreError::InvalidData(format!("Price out of range: {price}")))
}

/// Converts an optional price bound, saturating at the largest storable price.
pub fn bound_to_sql(bound: Option<u64>) -> Option<i64> {
    bound.map(|b| i64::try_from(b).unwrap_or(i64::MAX))
}

pub fn to_document<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| StoreError::InvalidData(e.to_string()))
}

/// Serializes a document inside a connection closure.
pub fn encode_document<T: Serialize>(value: &T) -> rusqlite::Result<String> {
    serde_json::to_string(value).map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

/// Parses a stored JSON document.
pub fn decode_document<T: DeserializeOwned>(raw: &str, column: usize) -> rusqlite::Result<T> {
    serde_json::from_str(raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}

/// Reads the document in the first column of a row.
pub fn row_to_document<T: DeserializeOwned>(row: &Row) -> rusqlite::Result<T> {
    let raw: String = row.get(0)?;
    decode_document(&raw, 0)
}
