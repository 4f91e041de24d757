//! Service layer - business logic behind the HTTP boundary.
//!
//! Every operation receives the already authenticated [`domain::CallerIdentity`]
//! and runs under a bounded timeout.

mod application_service;
mod container;
mod identity_service;
mod job_service;
mod profile_service;

pub use application_service::{ApplicationManager, ApplicationService};
pub use container::{ServiceContainer, Services};
pub use identity_service::{IdentityManager, IdentityService};
pub use job_service::{stream_open_jobs, JobManager, JobService};
pub use profile_service::{ProfileManager, ProfileService};

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
