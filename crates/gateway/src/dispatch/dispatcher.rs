use std::sync::Arc;

use axum::http::{header, HeaderValue};
use storefront_core::dispatch::{AuthContext, DispatchError, Result, RetryPolicy, RouteTable};
use storefront_core::registry::ServiceInstance;
use uuid::Uuid;

use super::{ForwardRequest, ForwardResponse, Upstream};
use crate::registry::ServiceRegistry;

/// Routes gateway requests to live backend instances.
///
/// Holds no per-call state: every call resolves against the registry anew.
pub struct Dispatcher {
    registry: Arc<ServiceRegistry>,
    upstream: Arc<dyn Upstream>,
    routes: RouteTable,
    retry: RetryPolicy,
}

impl Dispatcher {
    pub fn new(
        registry: Arc<ServiceRegistry>,
        upstream: Arc<dyn Upstream>,
        routes: RouteTable,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            registry,
            upstream,
            routes,
            retry,
        }
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Routes by the request path (`/api/{prefix}/...`).
    pub async fn route_path(
        &self,
        request: ForwardRequest,
        auth: &AuthContext,
    ) -> Result<ForwardResponse> {
        let service = self
            .routes
            .service_for_path(request.path())
            .ok_or_else(|| DispatchError::UnknownRoute(request.path().to_string()))?
            .to_string();
        self.route(&service, request, auth).await
    }

    /// Forwards `request` to a live instance of `service`.
    ///
    /// Any downstream response is returned as is. Only transport failures
    /// are retried, each time against an instance not yet tried.
    pub async fn route(
        &self,
        service: &str,
        mut request: ForwardRequest,
        auth: &AuthContext,
    ) -> Result<ForwardResponse> {
        request.headers.remove(header::AUTHORIZATION);
        if let Some(value) = auth.header_value() {
            let value = HeaderValue::from_str(value).map_err(|_| {
                DispatchError::InvalidRequest("malformed Authorization header".to_string())
            })?;
            request.headers.insert(header::AUTHORIZATION, value);
        }

        let mut instance = self
            .registry
            .resolve(service)
            .await
            .ok_or_else(|| DispatchError::ServiceUnavailable(service.to_string()))?;
        let mut tried: Vec<Uuid> = Vec::new();

        loop {
            tried.push(instance.service_id);
            tracing::debug!(
                service,
                service_id = %instance.service_id,
                method = %request.method,
                path = %request.path(),
                "Forwarding request"
            );

            let failure = match self.upstream.forward(&instance, request.clone()).await {
                Ok(response) => return Ok(response),
                Err(failure) => failure,
            };
            tracing::warn!(
                service,
                service_id = %instance.service_id,
                error = %failure,
                "Upstream transport failure"
            );

            let alternates = self.untried(service, &tried).await;
            if !self.retry.should_retry(tried.len(), alternates.len()) {
                return Err(DispatchError::Transport {
                    service: service.to_string(),
                    attempts: tried.len(),
                    failure,
                });
            }
            // Alternates are live and ordered oldest first.
            let Some(next) = alternates.into_iter().next() else {
                return Err(DispatchError::Transport {
                    service: service.to_string(),
                    attempts: tried.len(),
                    failure,
                });
            };
            instance = next;
        }
    }

    async fn untried(&self, service: &str, tried: &[Uuid]) -> Vec<ServiceInstance> {
        self.registry
            .resolve_all(service)
            .await
            .into_iter()
            .filter(|instance| !tried.contains(&instance.service_id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::body::Bytes;
    use axum::http::{HeaderMap, Method, StatusCode};
    use chrono::Utc;
    use storefront_core::dispatch::TransportFailure;
    use storefront_core::registry::{SelectionPolicy, ServiceDescriptor};

    use crate::registry::ManualClock;

    /// Upstream whose behavior is scripted per port.
    #[derive(Default)]
    struct ScriptedUpstream {
        failing_ports: Vec<u16>,
        calls: AtomicUsize,
        ports_called: Mutex<Vec<u16>>,
        auth_seen: Mutex<HashMap<u16, Option<String>>>,
    }

    impl ScriptedUpstream {
        fn failing(ports: &[u16]) -> Self {
            Self {
                failing_ports: ports.to_vec(),
                ..Default::default()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Upstream for ScriptedUpstream {
        async fn forward(
            &self,
            instance: &ServiceInstance,
            request: ForwardRequest,
        ) -> std::result::Result<ForwardResponse, TransportFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.ports_called.lock().unwrap().push(instance.port);
            self.auth_seen.lock().unwrap().insert(
                instance.port,
                request
                    .headers
                    .get(header::AUTHORIZATION)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string),
            );

            if self.failing_ports.contains(&instance.port) {
                return Err(TransportFailure::ConnectionRefused(format!(
                    "{}:{}",
                    instance.host, instance.port
                )));
            }
            // Port 4404 plays a backend that answers with an application error.
            let status = if instance.port == 4404 {
                StatusCode::NOT_FOUND
            } else {
                StatusCode::OK
            };
            Ok(ForwardResponse {
                status,
                headers: HeaderMap::new(),
                body: Bytes::from(format!("served by {}", instance.port)),
            })
        }
    }

    fn request(path: &str) -> ForwardRequest {
        ForwardRequest {
            method: Method::GET,
            path_and_query: path.to_string(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    fn setup(upstream: Arc<ScriptedUpstream>) -> (Dispatcher, Arc<ServiceRegistry>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let registry = Arc::new(ServiceRegistry::with_clock(
            Duration::from_secs(90),
            SelectionPolicy::FirstMatch,
            clock.clone(),
        ));
        let dispatcher = Dispatcher::new(
            registry.clone(),
            upstream,
            RouteTable::default(),
            RetryPolicy::default(),
        );
        (dispatcher, registry, clock)
    }

    async fn register(registry: &ServiceRegistry, clock: &ManualClock, name: &str, port: u16) {
        registry
            .register(ServiceDescriptor::new(name, "10.0.0.5", port))
            .await
            .unwrap();
        clock.advance(Duration::from_millis(1));
    }

    #[tokio::test]
    async fn test_no_live_instance_is_service_unavailable() {
        let upstream = Arc::new(ScriptedUpstream::default());
        let (dispatcher, _, _) = setup(upstream.clone());

        let result = dispatcher
            .route("order_service", request("/api/order/1"), &AuthContext::anonymous())
            .await;

        assert_eq!(
            result.unwrap_err(),
            DispatchError::ServiceUnavailable("order_service".to_string())
        );
        assert_eq!(upstream.calls(), 0);
    }

    #[tokio::test]
    async fn test_expired_order_service_becomes_unavailable() {
        let upstream = Arc::new(ScriptedUpstream::default());
        let (dispatcher, registry, clock) = setup(upstream.clone());
        register(&registry, &clock, "order_service", 4000).await;

        let response = dispatcher
            .route_path(
                request("/api/order/get-detail-order/1"),
                &AuthContext::anonymous(),
            )
            .await
            .unwrap();
        assert_eq!(response.status, StatusCode::OK);

        // No heartbeats for longer than the window.
        clock.advance(Duration::from_secs(91));

        let result = dispatcher
            .route_path(
                request("/api/order/get-detail-order/1"),
                &AuthContext::anonymous(),
            )
            .await;
        assert_eq!(
            result.unwrap_err(),
            DispatchError::ServiceUnavailable("order_service".to_string())
        );
        assert_eq!(upstream.calls(), 1);
    }

    #[tokio::test]
    async fn test_application_errors_are_returned_verbatim() {
        let upstream = Arc::new(ScriptedUpstream::default());
        let (dispatcher, registry, clock) = setup(upstream.clone());
        register(&registry, &clock, "product_service", 4404).await;
        register(&registry, &clock, "product_service", 4001).await;

        let response = dispatcher
            .route("product_service", request("/api/product/9"), &AuthContext::anonymous())
            .await
            .unwrap();

        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(&response.body[..], b"served by 4404");
        assert_eq!(upstream.calls(), 1);
    }

    #[tokio::test]
    async fn test_transport_failure_retries_other_instance() {
        let upstream = Arc::new(ScriptedUpstream::failing(&[4000]));
        let (dispatcher, registry, clock) = setup(upstream.clone());
        register(&registry, &clock, "cart_service", 4000).await;
        register(&registry, &clock, "cart_service", 4001).await;

        let response = dispatcher
            .route("cart_service", request("/api/cart/items"), &AuthContext::anonymous())
            .await
            .unwrap();

        assert_eq!(&response.body[..], b"served by 4001");
        assert_eq!(*upstream.ports_called.lock().unwrap(), vec![4000, 4001]);
    }

    #[tokio::test]
    async fn test_retry_is_bounded_to_one_alternate() {
        let upstream = Arc::new(ScriptedUpstream::failing(&[4000, 4001, 4002]));
        let (dispatcher, registry, clock) = setup(upstream.clone());
        for port in [4000, 4001, 4002] {
            register(&registry, &clock, "cart_service", port).await;
        }

        let result = dispatcher
            .route("cart_service", request("/api/cart/items"), &AuthContext::anonymous())
            .await;

        assert!(matches!(
            result,
            Err(DispatchError::Transport { attempts: 2, .. })
        ));
        assert_eq!(upstream.calls(), 2);
    }

    #[tokio::test]
    async fn test_single_instance_failure_is_not_retried() {
        let upstream = Arc::new(ScriptedUpstream::failing(&[4000]));
        let (dispatcher, registry, clock) = setup(upstream.clone());
        register(&registry, &clock, "user_service", 4000).await;

        let result = dispatcher
            .route("user_service", request("/api/user/1"), &AuthContext::anonymous())
            .await;

        assert!(matches!(
            result,
            Err(DispatchError::Transport { attempts: 1, .. })
        ));
        assert_eq!(upstream.calls(), 1);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let upstream = Arc::new(ScriptedUpstream::default());
        let (dispatcher, _, _) = setup(upstream);

        let result = dispatcher
            .route_path(request("/api/payment/charge"), &AuthContext::anonymous())
            .await;

        assert_eq!(
            result.unwrap_err(),
            DispatchError::UnknownRoute("/api/payment/charge".to_string())
        );
    }

    #[tokio::test]
    async fn test_auth_context_is_forwarded() {
        let upstream = Arc::new(ScriptedUpstream::default());
        let (dispatcher, registry, clock) = setup(upstream.clone());
        register(&registry, &clock, "user_service", 4000).await;

        let mut spoofed = request("/api/user/1");
        spoofed
            .headers
            .insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer old"));
        dispatcher
            .route(
                "user_service",
                spoofed,
                &AuthContext::from_header(Some("Bearer fresh")),
            )
            .await
            .unwrap();

        assert_eq!(
            upstream.auth_seen.lock().unwrap()[&4000].as_deref(),
            Some("Bearer fresh")
        );
    }
}
