//! `migrate` - schema management from the command line.

use crate::cli::args::{MigrateAction, MigrateArgs};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::Database;

pub async fn execute(args: MigrateArgs, config: Config) -> AppResult<()> {
    let db = Database::connect_without_migrations(&config)
        .await
        .map_err(AppError::from)?;

    match args.action {
        MigrateAction::Up => {
            db.run_migrations().await.map_err(AppError::from)?;
            tracing::info!("Pending migrations applied");
        }
        MigrateAction::Down => {
            db.rollback_migration().await.map_err(AppError::from)?;
            tracing::info!("Last migration rolled back");
        }
        MigrateAction::Status => {
            for (name, applied) in db.migration_status().await.map_err(AppError::from)? {
                println!("{}: {}", name, if applied { "applied" } else { "pending" });
            }
        }
        MigrateAction::Fresh => {
            tracing::warn!("Dropping schema and replaying all migrations");
            db.fresh_migrations().await.map_err(AppError::from)?;
            tracing::info!("Schema rebuilt");
        }
    }

    Ok(())
}
