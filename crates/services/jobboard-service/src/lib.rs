//! Job Board Service Library
//!
//! The platform core: identity, candidate profiles, job postings and
//! applications. Credentials are delegated to the auth provider over gRPC.
//! The gateway embeds this crate directly.

pub mod client;
pub mod config;
pub mod infra;
pub mod repository;
pub mod service;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

use std::sync::Arc;

use tracing::info;

use crate::client::AuthClient;
use crate::config::JobBoardConfig;
use crate::infra::Database;
use crate::service::Services;

/// Connect to the database (applying pending migrations) and the auth
/// provider, and wire every service.
pub async fn build_services(
    config: &JobBoardConfig,
) -> Result<Services, Box<dyn std::error::Error>> {
    let db = Database::connect(&config.database).await?;
    let auth = AuthClient::connect_lazy(&config.auth_provider)?;
    info!(
        auth_provider = %config.auth_provider.endpoint,
        "Job board services ready"
    );
    Ok(Services::new(db, Arc::new(auth), config.operation_timeout))
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(action: MigrateAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = JobBoardConfig::from_env();
    let db = Database::connect_without_migrations(&config.database).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Job board migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last job board migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Job board database reset and migrations applied");
        }
    }

    Ok(())
}

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}
