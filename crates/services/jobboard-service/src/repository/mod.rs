//! Repository layer for data access.

pub mod entities;
mod application_repository;
mod job_repository;
mod profile_repository;
mod user_repository;

pub use application_repository::{ApplicationRepository, ApplicationStore};
pub use job_repository::{JobRepository, JobStore};
pub use profile_repository::{ProfileRepository, ProfileStore};
pub use user_repository::{UserRepository, UserStore};

#[cfg(any(test, feature = "test-utils"))]
pub use application_repository::MockApplicationRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use job_repository::MockJobRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use profile_repository::MockProfileRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;

use common::AppError;
use sea_orm::{DbErr, SqlErr};

/// Map a unique index violation to `Conflict(message)`; other errors pass through.
pub(crate) fn conflict_on_unique(err: DbErr, message: &str) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::conflict(message),
        _ => AppError::from(err),
    }
}
