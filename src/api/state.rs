//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{ChatSender, Database, PaymentGateway};
use crate::jobs::Mailer;
use crate::services::{ServiceContainer, Services};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<dyn ServiceContainer>,
    /// Absent when the router is driven without a database (tests)
    pub database: Option<Arc<Database>>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Wire the production service container over the database.
    pub fn from_config(
        database: Arc<Database>,
        config: Config,
        mailer: Arc<dyn Mailer>,
        gateway: Arc<dyn PaymentGateway>,
        chat: Arc<dyn ChatSender>,
    ) -> Self {
        let services = Arc::new(Services::from_connection(
            database.connection(),
            config.clone(),
            mailer,
            gateway,
            chat,
        ));

        Self {
            services,
            database: Some(database),
            config: Arc::new(config),
        }
    }

    /// State over an arbitrary container, without a database.
    pub fn new(services: Arc<dyn ServiceContainer>, config: Config) -> Self {
        Self {
            services,
            database: None,
            config: Arc::new(config),
        }
    }
}
