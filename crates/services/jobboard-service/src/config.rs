//! Job board service configuration.

use std::time::Duration;

use common::{env_or, DatabaseConfig, GrpcClientConfig, DEFAULT_OPERATION_TIMEOUT};

/// Job board service configuration.
#[derive(Debug, Clone)]
pub struct JobBoardConfig {
    /// Platform database (users, profiles, jobs, applications)
    pub database: DatabaseConfig,
    /// Authentication provider endpoint
    pub auth_provider: GrpcClientConfig,
    /// Upper bound for a single service operation
    pub operation_timeout: Duration,
}

impl JobBoardConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let grpc_defaults = GrpcClientConfig::default();
        Self {
            database: DatabaseConfig::from_env(&["JOBBOARD_DATABASE_URL", "DATABASE_URL"]),
            auth_provider: GrpcClientConfig {
                endpoint: env_or(
                    &["AUTH_PROVIDER_URL", "AUTH_SERVICE_URL"],
                    grpc_defaults.endpoint,
                ),
                connect_timeout_ms: env_or(
                    &["AUTH_PROVIDER_CONNECT_TIMEOUT_MS"],
                    grpc_defaults.connect_timeout_ms,
                ),
                request_timeout_ms: env_or(
                    &["AUTH_PROVIDER_REQUEST_TIMEOUT_MS"],
                    grpc_defaults.request_timeout_ms,
                ),
            },
            operation_timeout: Duration::from_millis(env_or(
                &["OPERATION_TIMEOUT_MS"],
                DEFAULT_OPERATION_TIMEOUT.as_millis() as u64,
            )),
        }
    }
}

impl Default for JobBoardConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            auth_provider: GrpcClientConfig::default(),
            operation_timeout: DEFAULT_OPERATION_TIMEOUT,
        }
    }
}
