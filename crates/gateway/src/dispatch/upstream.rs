//! Forwarding one request to one backend instance.

use std::time::Duration;

use async_trait::async_trait;
use axum::body::Bytes;
use axum::http::{header, HeaderMap, Method, StatusCode};
use reqwest::Client;
use storefront_core::dispatch::TransportFailure;
use storefront_core::registry::ServiceInstance;

/// Removes headers that describe a single connection.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    for name in [
        header::CONNECTION,
        header::HOST,
        header::CONTENT_LENGTH,
        header::TRANSFER_ENCODING,
        header::UPGRADE,
        header::TE,
    ] {
        headers.remove(name);
    }
}

/// A request as the gateway forwards it.
#[derive(Debug, Clone)]
pub struct ForwardRequest {
    pub method: Method,
    /// Path plus query string, e.g. `/api/product/?type=pc`.
    pub path_and_query: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl ForwardRequest {
    pub fn path(&self) -> &str {
        self.path_and_query
            .split_once('?')
            .map_or(self.path_and_query.as_str(), |(path, _)| path)
    }
}

/// A downstream response, passed back to the caller unchanged.
#[derive(Debug, Clone)]
pub struct ForwardResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Sends requests to backend instances.
///
/// `Err` means no HTTP response was obtained. Any response, whatever its
/// status, is `Ok`.
#[async_trait]
pub trait Upstream: Send + Sync {
    async fn forward(
        &self,
        instance: &ServiceInstance,
        request: ForwardRequest,
    ) -> Result<ForwardResponse, TransportFailure>;
}

/// `Upstream` over a pooled reqwest client.
#[derive(Clone)]
pub struct HttpUpstream {
    client: Client,
}

impl HttpUpstream {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

fn classify(error: &reqwest::Error, target: &str) -> TransportFailure {
    if error.is_timeout() {
        TransportFailure::Timeout(target.to_string())
    } else if error.is_connect() {
        TransportFailure::ConnectionRefused(target.to_string())
    } else {
        TransportFailure::Connection(format!("{target}: {error}"))
    }
}

#[async_trait]
impl Upstream for HttpUpstream {
    async fn forward(
        &self,
        instance: &ServiceInstance,
        request: ForwardRequest,
    ) -> Result<ForwardResponse, TransportFailure> {
        let target = format!("{}:{}", instance.host, instance.port);
        let url = format!("{}{}", instance.base_url(), request.path_and_query);

        let mut headers = request.headers;
        strip_hop_by_hop(&mut headers);

        let mut builder = self.client.request(request.method, &url).headers(headers);
        if !request.body.is_empty() {
            builder = builder.body(request.body);
        }

        let response = builder.send().await.map_err(|e| classify(&e, &target))?;
        let status = response.status();
        let mut headers = response.headers().clone();
        strip_hop_by_hop(&mut headers);
        let body = response.bytes().await.map_err(|e| classify(&e, &target))?;

        Ok(ForwardResponse {
            status,
            headers,
            body,
        })
    }
}
