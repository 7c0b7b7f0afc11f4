//! Mapping from public gateway paths to logical service names.

use std::fmt;

use super::DispatchError;

/// Caller credentials as received by the gateway.
///
/// The gateway never inspects it; it is forwarded to the downstream service,
/// which owns authentication.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AuthContext(Option<String>);

impl AuthContext {
    /// Wraps a raw `Authorization` header value.
    pub fn from_header(value: Option<&str>) -> Self {
        Self(value.map(str::to_string).filter(|v| !v.trim().is_empty()))
    }

    pub fn anonymous() -> Self {
        Self(None)
    }

    /// The header value to forward, if any.
    pub fn header_value(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(_) => f.write_str("AuthContext(<redacted>)"),
            None => f.write_str("AuthContext(anonymous)"),
        }
    }
}

/// Routes `/api/{prefix}/...` to a service name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    routes: Vec<(String, String)>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::from_pairs([
            ("user", "user_service"),
            ("product", "product_service"),
            ("cart", "cart_service"),
            ("order", "order_service"),
        ])
    }
}

impl RouteTable {
    pub fn from_pairs<I, P, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (P, S)>,
        P: Into<String>,
        S: Into<String>,
    {
        Self {
            routes: pairs
                .into_iter()
                .map(|(p, s)| (p.into(), s.into()))
                .collect(),
        }
    }

    /// Parses `prefix=service` pairs separated by commas,
    /// e.g. `"user=user_service,order=order_service"`.
    pub fn parse(spec: &str) -> Result<Self, DispatchError> {
        let mut routes = Vec::new();
        for pair in spec.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (prefix, service) = pair
                .split_once('=')
                .map(|(p, s)| (p.trim(), s.trim()))
                .filter(|(p, s)| !p.is_empty() && !s.is_empty())
                .ok_or_else(|| DispatchError::InvalidRequest(format!("bad route: {pair}")))?;
            routes.push((prefix.to_string(), service.to_string()));
        }
        Ok(Self { routes })
    }

    /// Service name for a public prefix (`"order"` -> `"order_service"`).
    pub fn service_for_prefix(&self, prefix: &str) -> Option<&str> {
        self.routes
            .iter()
            .find(|(p, _)| p == prefix)
            .map(|(_, s)| s.as_str())
    }

    /// Service name for a full request path such as `/api/order/get-detail-order/1`.
    pub fn service_for_path(&self, path: &str) -> Option<&str> {
        let rest = path.strip_prefix("/api/")?;
        let prefix = rest.split('/').next()?;
        self.service_for_prefix(prefix)
    }

    /// Path patterns the gateway serves, one per route (`/api/user/*`, ...).
    pub fn endpoint_patterns(&self) -> Vec<String> {
        self.routes
            .iter()
            .map(|(prefix, _)| format!("/api/{prefix}/*"))
            .collect()
    }
}
