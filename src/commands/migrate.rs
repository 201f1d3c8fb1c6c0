//! Migrate command - schema management outside of `serve`.

use crate::cli::args::{MigrateAction, MigrateArgs};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::Database;

pub async fn execute(args: MigrateArgs, config: Config) -> AppResult<()> {
    let db = Database::open(&config).await?;

    match args.action {
        MigrateAction::Up => {
            db.migrate_up().await?;
            tracing::info!("Pending migrations applied");
        }
        MigrateAction::Down => {
            db.migrate_down().await?;
            tracing::info!("Last migration rolled back");
        }
        MigrateAction::Status => {
            let status = db.migration_states().await?;
            let pending = status.iter().filter(|m| !m.applied).count();
            for m in &status {
                println!("{:<8} {}", if m.applied { "applied" } else { "pending" }, m.name);
            }
            tracing::info!(total = status.len(), pending, "Migration status");
        }
        MigrateAction::Fresh => {
            tracing::warn!("Dropping every table and re-running all migrations");
            db.migrate_fresh().await?;
            tracing::info!("Schema rebuilt");
        }
    }

    Ok(())
}
