//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. Each is a trait plus a manager generic over
//! the `UnitOfWork`, so tests can swap in mock repositories.

mod auth_service;
pub mod container;
mod lease_service;
mod maintenance_service;
mod notification_service;
mod notifier;
mod onboarding_service;
mod payment_service;
mod property_service;
mod scope;
mod user_service;

#[cfg(test)]
pub(crate) mod testing;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use auth_service::{AuthService, Authenticator, Claims, TokenResponse};
pub use lease_service::{LeaseManager, LeaseService};
pub use maintenance_service::{MaintenanceManager, MaintenanceService};
pub use notification_service::{NotificationManager, NotificationService};
pub use notifier::{Notice, NotificationDispatcher, Notifier};
pub use onboarding_service::{OnboardingManager, OnboardingService};
pub use payment_service::{PaymentManager, PaymentService};
pub use property_service::{PropertyManager, PropertyService};
pub use user_service::{UserManager, UserService};

#[cfg(any(test, feature = "test-utils"))]
pub use auth_service::MockAuthService;
#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
#[cfg(any(test, feature = "test-utils"))]
pub use lease_service::MockLeaseService;
#[cfg(any(test, feature = "test-utils"))]
pub use maintenance_service::MockMaintenanceService;
#[cfg(any(test, feature = "test-utils"))]
pub use notification_service::MockNotificationService;
#[cfg(any(test, feature = "test-utils"))]
pub use notifier::MockNotifier;
#[cfg(any(test, feature = "test-utils"))]
pub use onboarding_service::MockOnboardingService;
#[cfg(any(test, feature = "test-utils"))]
pub use payment_service::MockPaymentService;
#[cfg(any(test, feature = "test-utils"))]
pub use property_service::MockPropertyService;
#[cfg(any(test, feature = "test-utils"))]
pub use user_service::MockUserService;
