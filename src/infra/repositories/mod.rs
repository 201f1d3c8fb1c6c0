//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.

mod base;
pub(crate) mod entities;
mod lease_repository;
mod maintenance_repository;
mod notification_repository;
mod payment_repository;
mod property_repository;
mod unit_repository;
mod user_repository;

pub(crate) use unit_repository::write_unit_status;

pub use lease_repository::{LeaseRepository, LeaseStore};
pub use maintenance_repository::{MaintenanceRepository, MaintenanceStore};
pub use notification_repository::{NotificationRepository, NotificationStore};
pub use payment_repository::{PaymentRepository, PaymentStore};
pub use property_repository::{PropertyRepository, PropertyStore};
pub use unit_repository::{UnitRepository, UnitStore};
pub use user_repository::{UserRepository, UserStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use lease_repository::MockLeaseRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use maintenance_repository::MockMaintenanceRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use notification_repository::MockNotificationRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use payment_repository::MockPaymentRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use property_repository::MockPropertyRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use unit_repository::MockUnitRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
