//! SeaORM entities.
//!
//! Enum-valued columns are stored as their lowercase wire strings and parsed
//! back through the domain `FromStr` impls.

pub mod application;
pub mod job;
pub mod profile;
pub mod user;

use common::AppError;
use domain::DomainError;

/// A stored enum value that no longer parses is a data error, not client input.
pub(crate) fn corrupt_column(err: DomainError) -> AppError {
    AppError::internal(format!("Corrupt stored value: {}", err))
}
