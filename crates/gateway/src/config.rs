//! Gateway configuration.

use common::{env_first, env_or, CacheConfig, RateLimitConfig};
use jobboard_service_lib::config::JobBoardConfig;

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Redis for rate limiting and the job cache; both are off when unset
    pub cache: Option<CacheConfig>,
    /// General rate limit
    pub rate_limit: RateLimitConfig,
    /// Stricter rate limit for the auth endpoints
    pub auth_rate_limit: RateLimitConfig,
    /// Embedded job board services
    pub jobboard: JobBoardConfig,
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env_first(&["GATEWAY_HOST"]).unwrap_or(defaults.host),
            port: env_or(&["GATEWAY_PORT"], defaults.port),
            cache: env_first(&["GATEWAY_REDIS_URL", "REDIS_URL"]).map(|url| CacheConfig {
                url,
                default_ttl_seconds: env_or(
                    &["JOB_CACHE_TTL_SECONDS"],
                    CacheConfig::default().default_ttl_seconds,
                ),
            }),
            rate_limit: RateLimitConfig {
                max_requests: env_or(&["RATE_LIMIT_REQUESTS"], defaults.rate_limit.max_requests),
                window_seconds: env_or(
                    &["RATE_LIMIT_WINDOW_SECONDS"],
                    defaults.rate_limit.window_seconds,
                ),
            },
            auth_rate_limit: RateLimitConfig {
                max_requests: env_or(
                    &["RATE_LIMIT_AUTH_REQUESTS"],
                    defaults.auth_rate_limit.max_requests,
                ),
                window_seconds: env_or(
                    &["RATE_LIMIT_AUTH_WINDOW_SECONDS"],
                    defaults.auth_rate_limit.window_seconds,
                ),
            },
            jobboard: JobBoardConfig::from_env(),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            cache: None,
            rate_limit: RateLimitConfig::default(),
            auth_rate_limit: RateLimitConfig {
                max_requests: 10,
                window_seconds: 60,
            },
            jobboard: JobBoardConfig::default(),
        }
    }
}
