//! User Service Library
//!
//! Users, their addresses and the transactional rules that tie them
//! together. Usable as a library by an outer surface, or driven through the
//! `user-service` operator binary.

pub mod config;
pub mod infra;
pub mod repository;
pub mod service;

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use auth_service_lib::{AuthServiceConfig, Authenticator, CredentialService};
use common::{AppResult, DatabaseConfig};
use domain::CreateUser;

use crate::config::UserServiceConfig;
use crate::infra::{Database, Persistence};
use crate::service::{UserManager, UserService};

/// Connect, apply pending migrations and wrap the pool in a unit of work.
pub async fn connect(config: &DatabaseConfig) -> AppResult<Persistence> {
    let db = Database::connect(config).await?;
    Ok(Persistence::new(db.get_connection()))
}

/// Wire a user service from explicit collaborators.
pub fn build_user_service(
    persistence: Persistence,
    credentials: Arc<dyn CredentialService>,
) -> UserManager<Persistence> {
    UserManager::new(Arc::new(persistence), credentials)
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(action: MigrateAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = UserServiceConfig::from_env();
    let db = Database::connect_without_migrations(&config.database).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
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
            info!("Database reset and migrations applied");
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

/// Bulk-create the users listed in a JSON file. Nothing is written unless
/// every record succeeds.
pub async fn import_users(path: &Path) -> Result<usize, Box<dyn std::error::Error>> {
    let raw = tokio::fs::read_to_string(path).await?;
    let inputs: Vec<CreateUser> = serde_json::from_str(&raw)?;
    info!(count = inputs.len(), file = %path.display(), "Importing users");

    let config = UserServiceConfig::from_env();
    let persistence = connect(&config.database).await?;
    let credentials = Arc::new(Authenticator::new(AuthServiceConfig::from_env()?));

    let service = build_user_service(persistence, credentials);
    let created = service.create_many_users(inputs).await?;

    info!(count = created.len(), "Import committed");
    Ok(created.len())
}
