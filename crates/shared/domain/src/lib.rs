//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! Services, the gateway and the auth provider all speak these types.

#[macro_use]
mod macros;

pub mod application;
pub mod constants;
pub mod error;
pub mod identity;
pub mod job;
pub mod patch;
pub mod profile;
pub mod token;

use chrono::{DateTime, SubsecRound, Utc};

pub use application::{Application, ApplicationStatus, Decision, DecisionRequest, NewApplication};
pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use identity::{CallerIdentity, Email, User, UserResponse, UserRole};
pub use job::{Job, JobCursor, JobFilter, JobPage, JobStatus, JobUpdate, NewJob, PageRequest, RemoteType, Seniority};
pub use patch::Patch;
pub use profile::{Profile, ProfileUpdate};
pub use token::TokenResponse;

/// Current time at microsecond precision, the resolution every store keeps.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Stamp for a row last written at `previous`. Always strictly later, so
/// writers comparing `updated_at` see every change.
pub fn next_stamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    now().max(previous + chrono::Duration::microseconds(1))
}
