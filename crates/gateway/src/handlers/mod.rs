//! HTTP request handlers.

pub mod application_handler;
pub mod auth_handler;
pub mod health_handler;
pub mod job_handler;
pub mod profile_handler;

pub use application_handler::application_routes;
pub use auth_handler::auth_routes;
pub use health_handler::{health_routes, root};
pub use job_handler::{job_routes, public_job_routes};
pub use profile_handler::profile_routes;
