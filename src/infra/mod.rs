//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connections, migrations and repositories
//! - Unit of Work for transaction management
//! - Payment gateway and chat adapters

pub mod chat;
pub mod db;
pub mod gateway;
pub mod repositories;
pub mod unit_of_work;

pub use chat::{ChatSender, LogChatSender};
pub use db::{Database, Migrator};
pub use gateway::{ChargeIntent, PaymentGateway, SandboxGateway};
pub use repositories::{
    LeaseRepository, MaintenanceRepository, NotificationRepository, PaymentRepository,
    PropertyRepository, UnitRepository, UserRepository,
};
pub use unit_of_work::{Persistence, TransactionContext, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use chat::MockChatSender;
#[cfg(any(test, feature = "test-utils"))]
pub use gateway::MockPaymentGateway;
