//! Bounded execution of service operations.

use std::future::Future;
use std::time::Duration;

use crate::error::{AppError, AppResult};

/// Default bound for one service operation
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(10);

/// Run `operation` to completion or fail with [`AppError::Timeout`] once
/// `limit` elapses. The future is dropped on timeout.
pub async fn bounded<T, F>(limit: Duration, operation: &'static str, fut: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(operation, timeout_ms = limit.as_millis() as u64, "Operation timed out");
            Err(AppError::Timeout(operation.to_string()))
        }
    }
}
