//! Combined binary for development - runs the auth provider and the gateway
//! in one process.

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use jobboard_service_lib::config::JobBoardConfig;
use jobboard_service_lib::service::ServiceContainer;

#[derive(Parser)]
#[command(name = "job-platform")]
#[command(about = "Job platform: auth provider and HTTP gateway in one binary")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all services in a single process (development mode)
    Serve {
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
        #[arg(long, default_value = "3000")]
        gateway_port: u16,
        #[arg(long, default_value = "50051")]
        auth_port: u16,
    },
    /// Run database migrations for all services
    Migrate {
        #[command(subcommand)]
        action: MigrateAction,
    },
    /// Administrative accounts
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand, Clone, Copy)]
enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset database and run all migrations
    Fresh,
}

#[derive(Subcommand)]
enum AdminAction {
    /// Provision an admin account (the auth provider must be reachable)
    Create {
        #[arg(long, env = "ADMIN_EMAIL")]
        email: String,
        #[arg(long, env = "ADMIN_PASSWORD")]
        password: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            host,
            gateway_port,
            auth_port,
        } => {
            info!("Starting combined services in development mode");
            info!("  Gateway:       http://{}:{}", host, gateway_port);
            info!("  Auth provider: http://{}:{}", host, auth_port);

            // Spawn the auth provider first (it owns the credential database)
            let auth_host = host.clone();
            let auth_handle = tokio::spawn(async move {
                if let Err(e) = auth_service_lib::run_embedded(&auth_host, auth_port).await {
                    error!("Auth service failed: {}", e);
                }
            });

            // Wait a moment for the auth provider to start
            tokio::time::sleep(std::time::Duration::from_millis(500)).await;

            // Spawn the gateway with the embedded job board services
            let gateway_host = host.clone();
            let gateway_handle = tokio::spawn(async move {
                if let Err(e) =
                    gateway_lib::run_embedded(&gateway_host, gateway_port, auth_port).await
                {
                    error!("Gateway failed: {}", e);
                }
            });

            // Wait for any service to exit (which would indicate an error)
            tokio::select! {
                _ = auth_handle => {
                    error!("Auth service exited unexpectedly");
                }
                _ = gateway_handle => {
                    error!("Gateway exited unexpectedly");
                }
            }
        }
        Commands::Migrate { action } => {
            let (auth_action, jobboard_action) = match action {
                MigrateAction::Up => (
                    auth_service_lib::MigrateAction::Up,
                    jobboard_service_lib::MigrateAction::Up,
                ),
                MigrateAction::Down => (
                    auth_service_lib::MigrateAction::Down,
                    jobboard_service_lib::MigrateAction::Down,
                ),
                MigrateAction::Status => (
                    auth_service_lib::MigrateAction::Status,
                    jobboard_service_lib::MigrateAction::Status,
                ),
                MigrateAction::Fresh => (
                    auth_service_lib::MigrateAction::Fresh,
                    jobboard_service_lib::MigrateAction::Fresh,
                ),
            };

            auth_service_lib::run_migrations(auth_action).await?;
            jobboard_service_lib::run_migrations(jobboard_action).await?;
        }
        Commands::Admin {
            action: AdminAction::Create { email, password },
        } => {
            let services = jobboard_service_lib::build_services(&JobBoardConfig::from_env()).await?;
            let admin = services.identity().provision_admin(email, password).await?;
            info!(user_id = %admin.id, email = %admin.email, "Admin provisioned");
        }
    }

    Ok(())
}
