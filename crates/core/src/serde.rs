//! Serde helpers for loosely typed JSON payloads.
//!
//! Services written against the gateway do not always agree on number
//! encodings (a port read from the environment often arrives as a string),
//! and clients send blank strings for fields they did not fill in.

use serde::{Deserialize, Deserializer};

/// Deserialize an optional string, treating blank strings as None.
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.filter(|s| !s.trim().is_empty()))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PortRepr {
    Number(u64),
    Text(String),
}

/// Deserialize an optional port given either as a JSON number or a numeric string.
///
/// Blank strings become None. Values outside the `u16` range are rejected.
pub fn deserialize_optional_port<'de, D>(deserializer: D) -> Result<Option<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<PortRepr> = Option::deserialize(deserializer)?;
    let value = match raw {
        None => return Ok(None),
        Some(PortRepr::Number(n)) => n,
        Some(PortRepr::Text(s)) if s.trim().is_empty() => return Ok(None),
        Some(PortRepr::Text(s)) => s.trim().parse::<u64>().map_err(serde::de::Error::custom)?,
    };
    u16::try_from(value)
        .map(Some)
        .map_err(|_| serde::de::Error::custom(format!("port out of range: {value}")))
}
