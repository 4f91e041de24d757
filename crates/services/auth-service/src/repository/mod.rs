//! Repository layer for credential storage.

pub mod entities;
mod credential_repository;

pub use credential_repository::{Credential, CredentialRepository, CredentialStore};

#[cfg(any(test, feature = "test-utils"))]
pub use credential_repository::MockCredentialRepository;
