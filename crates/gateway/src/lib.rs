//! API Gateway Library
//!
//! The public HTTP surface of the job board. Requests are authenticated,
//! rate limited and handed to the embedded job board services.

pub mod config;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, warn};

use crate::config::GatewayConfig;
use crate::middleware::Cache;
use crate::routes::create_router;
use crate::state::AppState;

/// Run the gateway as a standalone binary.
pub async fn run(host: &str, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    run_server_with_config(host, port, GatewayConfig::from_env()).await
}

/// Run the gateway as an embedded component (for combined binary).
pub async fn run_embedded(
    host: &str,
    port: u16,
    auth_port: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = GatewayConfig::from_env();
    config.jobboard.auth_provider.endpoint = format!("http://{}:{}", host, auth_port);

    run_server_with_config(host, port, config).await
}

/// Run the HTTP server with the given configuration.
async fn run_server_with_config(
    host: &str,
    port: u16,
    config: GatewayConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let services = Arc::new(jobboard_service_lib::build_services(&config.jobboard).await?);

    // Redis is optional; without it rate limiting and the job cache are off
    let cache = match &config.cache {
        Some(cache_config) => match Cache::connect(cache_config).await {
            Ok(cache) => Some(Arc::new(cache)),
            Err(e) => {
                warn!("Redis unavailable, running without cache: {}", e);
                None
            }
        },
        None => None,
    };

    let state = AppState::new(services, cache, config);
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Gateway listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
