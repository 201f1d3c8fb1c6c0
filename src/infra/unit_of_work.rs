//! Unit of Work pattern implementation.
//!
//! Centralizes access to all repositories and runs multi-step workflows
//! (tenant onboarding) inside a single database transaction.

use async_trait::async_trait;
use sea_orm::{
    AccessMode, ActiveModelTrait, DatabaseConnection, DatabaseTransaction, IsolationLevel,
    TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

use super::repositories::entities::{audit_log, lease, user};
use super::repositories::{
    write_unit_status, LeaseRepository, LeaseStore, MaintenanceRepository, MaintenanceStore,
    NotificationRepository, NotificationStore, PaymentRepository, PaymentStore,
    PropertyRepository, PropertyStore, UnitRepository, UnitStore, UserRepository, UserStore,
};
use crate::domain::{AuditEntry, Lease, UnitStatus, User};
use crate::errors::{AppError, AppResult};

/// Unit of Work trait for dependency injection.
///
/// Provides centralized access to all repositories and transaction management.
/// Note: This trait is not mockable directly due to generic methods.
/// For testing, implement it over mock repositories.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn users(&self) -> Arc<dyn UserRepository>;

    fn properties(&self) -> Arc<dyn PropertyRepository>;

    fn units(&self) -> Arc<dyn UnitRepository>;

    fn leases(&self) -> Arc<dyn LeaseRepository>;

    fn payments(&self) -> Arc<dyn PaymentRepository>;

    fn maintenance(&self) -> Arc<dyn MaintenanceRepository>;

    fn notifications(&self) -> Arc<dyn NotificationRepository>;

    /// Execute a closure within a transaction.
    ///
    /// The transaction is committed on success or rolled back on error.
    /// Uses ReadCommitted isolation.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send;
}

/// Transaction context providing write access within a transaction.
///
/// All operations performed through this context are part of the same
/// database transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Write every field of a user.
    pub async fn save_user(&self, user: &User) -> AppResult<User> {
        let model = user::ActiveModel::from(user).update(self.txn).await?;
        User::try_from(model)
    }

    pub async fn insert_lease(&self, lease: &Lease) -> AppResult<Lease> {
        let model = lease::ActiveModel::from(lease).insert(self.txn).await?;
        Lease::try_from(model)
    }

    /// Move a unit from VACANT to RESERVED. Fails with a conflict when the
    /// unit is no longer vacant at write time.
    pub async fn reserve_unit(&self, unit_id: Uuid) -> AppResult<()> {
        let changed = write_unit_status(
            self.txn,
            unit_id,
            UnitStatus::Reserved,
            Some(UnitStatus::Vacant),
        )
        .await?;
        if changed == 0 {
            return Err(AppError::conflict("Unit is no longer available"));
        }
        Ok(())
    }

    pub async fn record_audit(&self, entry: &AuditEntry) -> AppResult<()> {
        audit_log::ActiveModel::from(entry).insert(self.txn).await?;
        Ok(())
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    user_repo: Arc<UserStore>,
    property_repo: Arc<PropertyStore>,
    unit_repo: Arc<UnitStore>,
    lease_repo: Arc<LeaseStore>,
    payment_repo: Arc<PaymentStore>,
    maintenance_repo: Arc<MaintenanceStore>,
    notification_repo: Arc<NotificationStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            user_repo: Arc::new(UserStore::new(db.clone())),
            property_repo: Arc::new(PropertyStore::new(db.clone())),
            unit_repo: Arc::new(UnitStore::new(db.clone())),
            lease_repo: Arc::new(LeaseStore::new(db.clone())),
            payment_repo: Arc::new(PaymentStore::new(db.clone())),
            maintenance_repo: Arc::new(MaintenanceStore::new(db.clone())),
            notification_repo: Arc::new(NotificationStore::new(db.clone())),
            db,
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn properties(&self) -> Arc<dyn PropertyRepository> {
        self.property_repo.clone()
    }

    fn units(&self) -> Arc<dyn UnitRepository> {
        self.unit_repo.clone()
    }

    fn leases(&self) -> Arc<dyn LeaseRepository> {
        self.lease_repo.clone()
    }

    fn payments(&self) -> Arc<dyn PaymentRepository> {
        self.payment_repo.clone()
    }

    fn maintenance(&self) -> Arc<dyn MaintenanceRepository> {
        self.maintenance_repo.clone()
    }

    fn notifications(&self) -> Arc<dyn NotificationRepository> {
        self.notification_repo.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(
                Some(IsolationLevel::ReadCommitted),
                Some(AccessMode::ReadWrite),
            )
            .await?;

        let ctx = TransactionContext::new(&txn);

        match f(ctx).await {
            Ok(result) => {
                txn.commit().await?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

/// Simpler API for executing transactional operations.
#[macro_export]
macro_rules! with_transaction {
    ($uow:expr, |$ctx:ident| $body:expr) => {
        $uow.transaction(|$ctx| Box::pin(async move { $body })).await
    };
}
