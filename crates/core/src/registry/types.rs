//! Wire and table types of the service registry.
//!
//! Registry payloads use camelCase (`serviceId`, `lastHeartbeatAt`) because
//! they are exchanged with every service process, not only with this
//! workspace's binaries.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::serde::{deserialize_optional_port, deserialize_optional_string};

use super::{RegistryError, Result};

/// Registration request sent by a service instance.
///
/// Every field is optional at the serde level so that a payload missing
/// `host` is reported as a validation error rather than a parse failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDescriptor {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub host: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_port")]
    pub port: Option<u16>,
    #[serde(default)]
    pub endpoints: Vec<String>,
}

impl ServiceDescriptor {
    pub fn new(name: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self {
            name: Some(name.into()),
            host: Some(host.into()),
            port: Some(port),
            endpoints: Vec::new(),
        }
    }

    pub fn with_endpoints<I, S>(mut self, endpoints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.endpoints = endpoints.into_iter().map(Into::into).collect();
        self
    }

    /// Checks that name, host and port are present and well formed.
    pub fn validate(&self) -> Result<()> {
        let name = self
            .name
            .as_deref()
            .ok_or(RegistryError::MissingField("name"))?;
        if name.chars().any(char::is_whitespace) {
            return Err(RegistryError::InvalidField {
                field: "name",
                reason: "must not contain whitespace".to_string(),
            });
        }
        let host = self
            .host
            .as_deref()
            .ok_or(RegistryError::MissingField("host"))?;
        if host.contains('/') || host.chars().any(char::is_whitespace) {
            return Err(RegistryError::InvalidField {
                field: "host",
                reason: format!("not a host name: {host}"),
            });
        }
        match self.port {
            None => return Err(RegistryError::MissingField("port")),
            Some(0) => {
                return Err(RegistryError::InvalidField {
                    field: "port",
                    reason: "must be non-zero".to_string(),
                })
            }
            Some(_) => {}
        }
        if let Some(endpoint) = self.endpoints.iter().find(|e| !e.starts_with('/')) {
            return Err(RegistryError::InvalidField {
                field: "endpoints",
                reason: format!("path pattern must start with '/': {endpoint}"),
            });
        }
        Ok(())
    }
}

/// One live backend process as tracked by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInstance {
    pub service_id: Uuid,
    pub name: String,
    pub host: String,
    pub port: u16,
    pub endpoints: BTreeSet<String>,
    pub last_heartbeat_at: DateTime<Utc>,
    pub registered_at: DateTime<Utc>,
}

impl ServiceInstance {
    /// Validates a descriptor and builds the instance it describes.
    pub fn from_descriptor(
        descriptor: ServiceDescriptor,
        service_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        descriptor.validate()?;
        let ServiceDescriptor {
            name,
            host,
            port,
            endpoints,
        } = descriptor;
        Ok(Self {
            service_id,
            name: name.ok_or(RegistryError::MissingField("name"))?,
            host: host.ok_or(RegistryError::MissingField("host"))?,
            port: port.ok_or(RegistryError::MissingField("port"))?,
            endpoints: endpoints.into_iter().collect(),
            last_heartbeat_at: now,
            registered_at: now,
        })
    }

    /// Base URL requests to this instance are sent to.
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// Body of a successful registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub success: bool,
    pub service_id: Uuid,
}

/// Body of a heartbeat reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeartbeatResponse {
    pub success: bool,
}

/// Body of an unregister reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnregisterResponse {
    pub success: bool,
}
