//! Application state for dependency injection.

use std::sync::Arc;

use jobboard_service_lib::service::ServiceContainer;

use crate::config::GatewayConfig;
use crate::middleware::Cache;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<dyn ServiceContainer>,
    /// `None` when Redis is not configured
    pub cache: Option<Arc<Cache>>,
    pub config: GatewayConfig,
}

impl AppState {
    /// Create new app state.
    pub fn new(
        services: Arc<dyn ServiceContainer>,
        cache: Option<Arc<Cache>>,
        config: GatewayConfig,
    ) -> Self {
        Self {
            services,
            cache,
            config,
        }
    }
}
