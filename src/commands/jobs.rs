//! Jobs command - the email queue.
//!
//! `work` runs the apalis worker that delivers queued [`EmailJob`]s; `list`
//! and `clear` inspect the `apalis.jobs` table directly.
//!
//! [`EmailJob`]: crate::jobs::EmailJob

use apalis::prelude::*;
use apalis_sql::postgres::PostgresStorage;
use apalis_sql::sqlx::postgres::PgPoolOptions;
use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, Statement};

use crate::cli::args::{JobsAction, JobsArgs};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::jobs::{email_job_handler, EmailJob};

pub async fn execute(args: JobsArgs, config: Config) -> AppResult<()> {
    match args.action {
        JobsAction::Work => run_worker(&config).await,
        JobsAction::List => list_jobs(&config).await,
        JobsAction::Clear => clear_failed_jobs(&config).await,
    }
}

async fn run_worker(config: &Config) -> AppResult<()> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .map_err(|e| AppError::internal(format!("Failed to connect job storage: {}", e)))?;
    PostgresStorage::setup(&pool)
        .await
        .map_err(|e| AppError::internal(format!("Failed to setup job storage: {}", e)))?;

    let storage: PostgresStorage<EmailJob> = PostgresStorage::new(pool);
    let worker = WorkerBuilder::new("leasedesk-email")
        .backend(storage)
        .build_fn(email_job_handler);

    tracing::info!("Email worker started");
    tokio::select! {
        result = Monitor::new().register(worker).run() => {
            result.map_err(|e| AppError::internal(format!("Worker failed: {}", e)))?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }
    tracing::info!("Email worker stopped");
    Ok(())
}

/// Connection to the queue database, or `None` if no worker has created the
/// apalis schema yet.
async fn queue_connection(config: &Config) -> AppResult<Option<DatabaseConnection>> {
    let db = sea_orm::Database::connect(&config.database_url).await?;
    let exists = db
        .query_one(Statement::from_string(
            DatabaseBackend::Postgres,
            "SELECT EXISTS(SELECT 1 FROM information_schema.schemata WHERE schema_name = 'apalis') AS exists",
        ))
        .await?
        .and_then(|row| row.try_get::<bool>("", "exists").ok())
        .unwrap_or(false);
    Ok(exists.then_some(db))
}

async fn list_jobs(config: &Config) -> AppResult<()> {
    let Some(db) = queue_connection(config).await? else {
        println!("Email queue not initialized; run `jobs work` once to create it.");
        return Ok(());
    };

    let rows = db
        .query_all(Statement::from_string(
            DatabaseBackend::Postgres,
            "SELECT status::text AS status, COUNT(*)::bigint AS count FROM apalis.jobs GROUP BY status ORDER BY status",
        ))
        .await?;

    if rows.is_empty() {
        println!("Email queue is empty.");
    }
    for row in rows {
        let status: String = row.try_get("", "status")?;
        let count: i64 = row.try_get("", "count")?;
        println!("{:<10} {}", status, count);
    }
    Ok(())
}

async fn clear_failed_jobs(config: &Config) -> AppResult<()> {
    let Some(db) = queue_connection(config).await? else {
        println!("Email queue not initialized; nothing to clear.");
        return Ok(());
    };

    let result = db
        .execute(Statement::from_string(
            DatabaseBackend::Postgres,
            "DELETE FROM apalis.jobs WHERE status = 'Failed'",
        ))
        .await?;
    tracing::info!(removed = result.rows_affected(), "Cleared failed email jobs");
    Ok(())
}
