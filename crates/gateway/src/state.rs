use std::sync::Arc;

use crate::{config::GatewayConfig, dispatch::Dispatcher, registry::ServiceRegistry};

/// Shared gateway state.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ServiceRegistry>,
    pub dispatcher: Arc<Dispatcher>,
    pub config: Arc<GatewayConfig>,
}

impl AppState {
    pub fn new(
        registry: Arc<ServiceRegistry>,
        dispatcher: Dispatcher,
        config: GatewayConfig,
    ) -> Self {
        Self {
            registry,
            dispatcher: Arc::new(dispatcher),
            config: Arc::new(config),
        }
    }
}
