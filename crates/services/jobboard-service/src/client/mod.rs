//! Clients for external collaborators.

mod auth_client;

pub use auth_client::{AuthClient, AuthProvider};

#[cfg(any(test, feature = "test-utils"))]
pub use auth_client::MockAuthProvider;
