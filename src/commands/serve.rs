//! Serve command - Starts the HTTP server.

use std::sync::Arc;

use apalis_sql::postgres::PostgresStorage;
use apalis_sql::sqlx::postgres::PgPoolOptions;

use crate::api::{create_router, AppState};
use crate::cli::args::ServeArgs;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::{Database, LogChatSender, SandboxGateway};
use crate::jobs::{LogMailer, Mailer, QueuedMailer};

/// Execute the serve command
pub async fn execute(args: ServeArgs, mut config: Config) -> AppResult<()> {
    if let Some(host) = args.host {
        config.server_host = host;
    }
    if let Some(port) = args.port {
        config.server_port = port;
    }
    tracing::info!("Starting server...");

    let db = Arc::new(Database::connect(&config).await?);

    let mailer = build_mailer(&config).await?;
    let gateway = Arc::new(SandboxGateway::new());
    let chat = Arc::new(LogChatSender);

    let addr = config.server_addr();
    let app_state = AppState::from_config(db, config, mailer, gateway, chat);
    let app = create_router(app_state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", addr, e)))?;

    tracing::info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Queue emails for the `jobs work` process, or handle them inline when the
/// queue is disabled.
async fn build_mailer(config: &Config) -> AppResult<Arc<dyn Mailer>> {
    if !config.job_queue_enabled {
        tracing::info!("Job queue disabled, emails are handled inline");
        return Ok(Arc::new(LogMailer));
    }

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .map_err(|e| AppError::internal(format!("Failed to connect job storage: {}", e)))?;
    PostgresStorage::setup(&pool)
        .await
        .map_err(|e| AppError::internal(format!("Failed to setup job storage: {}", e)))?;

    tracing::info!("Email job queue ready");
    Ok(Arc::new(QueuedMailer::new(PostgresStorage::new(pool))))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutdown signal received");
}
