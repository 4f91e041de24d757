//! Redis cache for job details and rate limiting.

use redis::{aio::ConnectionManager, AsyncCommands, RedisError, Script};
use tracing::{debug, warn};
use uuid::Uuid;

use common::{AppError, AppResult, CacheConfig};
use domain::Job;

/// Cache key prefix for job details
const CACHE_PREFIX_JOB: &str = "job:";

/// Cache key prefix for rate limiting
const CACHE_PREFIX_RATE_LIMIT: &str = "rate_limit:";

/// Job entries are hashes of `version` and `body`. A write only lands when
/// its version is newer than the stored one, so a reader filling the cache
/// from a row it loaded before a close cannot bring the open job back.
const STORE_IF_NEWER: &str = r#"
local stored = redis.call('HGET', KEYS[1], 'version')
if stored and tonumber(stored) >= tonumber(ARGV[1]) then
  return 0
end
redis.call('HSET', KEYS[1], 'version', ARGV[1], 'body', ARGV[2])
redis.call('EXPIRE', KEYS[1], ARGV[3])
return 1
"#;

/// Redis cache wrapper.
pub struct Cache {
    conn: ConnectionManager,
    ttl_seconds: u64,
}

impl Cache {
    /// Connect to Redis.
    pub async fn connect(config: &CacheConfig) -> Result<Self, RedisError> {
        debug!("Connecting to Redis");
        let client = redis::Client::open(config.url.as_str())?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self {
            conn,
            ttl_seconds: config.default_ttl_seconds,
        })
    }

    pub async fn ping(&self) -> AppResult<()> {
        let mut conn = self.conn.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    /// Cached job detail. Undecodable entries count as a miss.
    pub async fn get_job(&self, id: &Uuid) -> AppResult<Option<Job>> {
        let key = job_key(id);
        let mut conn = self.conn.clone();
        let body: Option<String> = conn.hget(&key, "body").await?;

        Ok(body.and_then(|json| match serde_json::from_str(&json) {
            Ok(job) => Some(job),
            Err(e) => {
                warn!("Failed to deserialize cached job for key {}: {}", key, e);
                None
            }
        }))
    }

    /// Store a job unless the cache already holds this or a later version.
    /// Returns whether the entry was written.
    pub async fn store_job(&self, job: &Job) -> AppResult<bool> {
        let body = serde_json::to_string(job)
            .map_err(|e| AppError::internal(format!("Serialization error: {}", e)))?;
        let mut conn = self.conn.clone();

        let written: i32 = Script::new(STORE_IF_NEWER)
            .key(job_key(&job.id))
            .arg(job_version(job))
            .arg(body)
            .arg(self.ttl_seconds)
            .invoke_async(&mut conn)
            .await?;
        Ok(written == 1)
    }

    /// Check rate limit and increment counter.
    /// Returns (current_count, allowed).
    pub async fn check_rate_limit(
        &self,
        identifier: &str,
        max_requests: u64,
        window_seconds: u64,
    ) -> AppResult<(u64, bool)> {
        let key = format!("{}{}", CACHE_PREFIX_RATE_LIMIT, identifier);
        let mut conn = self.conn.clone();

        let count: u64 = conn.incr(&key, 1).await?;

        // Start the window on the first request
        if count == 1 {
            let _: () = conn.expire(&key, window_seconds as i64).await?;
        }

        Ok((count, count <= max_requests))
    }
}

fn job_key(id: &Uuid) -> String {
    format!("{}{}", CACHE_PREFIX_JOB, id)
}

/// Every job write moves `updated_at` forward, which makes it the version.
fn job_version(job: &Job) -> i64 {
    job.updated_at.timestamp_micros()
}
