//! Unit of work over mock repositories for service tests.

use async_trait::async_trait;
use std::sync::Arc;

use crate::errors::{AppError, AppResult};
use crate::infra::repositories::{
    LeaseRepository, MaintenanceRepository, MockLeaseRepository, MockMaintenanceRepository,
    MockNotificationRepository, MockPaymentRepository, MockPropertyRepository,
    MockUnitRepository, MockUserRepository, NotificationRepository, PaymentRepository,
    PropertyRepository, UnitRepository, UserRepository,
};
use crate::infra::{TransactionContext, UnitOfWork};

/// Repositories not given explicitly are mocks with no expectations, so
/// any unexpected call fails the test.
#[derive(Default)]
pub(crate) struct TestUnitOfWork {
    users: Arc<MockUserRepository>,
    properties: Arc<MockPropertyRepository>,
    units: Arc<MockUnitRepository>,
    leases: Arc<MockLeaseRepository>,
    payments: Arc<MockPaymentRepository>,
    maintenance: Arc<MockMaintenanceRepository>,
    notifications: Arc<MockNotificationRepository>,
}

impl TestUnitOfWork {
    pub(crate) fn with_users(mut self, repo: MockUserRepository) -> Self {
        self.users = Arc::new(repo);
        self
    }

    pub(crate) fn with_properties(mut self, repo: MockPropertyRepository) -> Self {
        self.properties = Arc::new(repo);
        self
    }

    pub(crate) fn with_units(mut self, repo: MockUnitRepository) -> Self {
        self.units = Arc::new(repo);
        self
    }

    pub(crate) fn with_leases(mut self, repo: MockLeaseRepository) -> Self {
        self.leases = Arc::new(repo);
        self
    }

    pub(crate) fn with_payments(mut self, repo: MockPaymentRepository) -> Self {
        self.payments = Arc::new(repo);
        self
    }

    pub(crate) fn with_maintenance(mut self, repo: MockMaintenanceRepository) -> Self {
        self.maintenance = Arc::new(repo);
        self
    }

    pub(crate) fn with_notifications(mut self, repo: MockNotificationRepository) -> Self {
        self.notifications = Arc::new(repo);
        self
    }
}

#[async_trait]
impl UnitOfWork for TestUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn properties(&self) -> Arc<dyn PropertyRepository> {
        self.properties.clone()
    }

    fn units(&self) -> Arc<dyn UnitRepository> {
        self.units.clone()
    }

    fn leases(&self) -> Arc<dyn LeaseRepository> {
        self.leases.clone()
    }

    fn payments(&self) -> Arc<dyn PaymentRepository> {
        self.payments.clone()
    }

    fn maintenance(&self) -> Arc<dyn MaintenanceRepository> {
        self.maintenance.clone()
    }

    fn notifications(&self) -> Arc<dyn NotificationRepository> {
        self.notifications.clone()
    }

    async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        Err(AppError::internal("Transactions not supported in test mock"))
    }
}
