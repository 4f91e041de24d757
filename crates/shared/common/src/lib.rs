//! Common utilities shared across all services.
//!
//! This crate provides:
//! - Unified error handling for HTTP and gRPC
//! - Configuration structures
//! - Bounded execution of service operations

pub mod config;
pub mod error;
pub mod timeout;

pub use config::*;
pub use error::{AppError, AppResult, OptionExt};
pub use timeout::{bounded, DEFAULT_OPERATION_TIMEOUT};
