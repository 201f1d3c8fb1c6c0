//! Service container - centralized service access.
//!
//! Handlers depend on the `ServiceContainer` trait, never on concrete
//! managers, so the HTTP layer can be driven with mocks.

use std::sync::Arc;

use super::{
    AuthService, LeaseService, MaintenanceService, NotificationService, OnboardingService,
    PaymentService, PropertyService, UserService,
};
use crate::config::Config;
use crate::infra::{ChatSender, PaymentGateway, Persistence};
use crate::jobs::Mailer;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn users(&self) -> Arc<dyn UserService>;

    fn properties(&self) -> Arc<dyn PropertyService>;

    fn leases(&self) -> Arc<dyn LeaseService>;

    fn payments(&self) -> Arc<dyn PaymentService>;

    fn maintenance(&self) -> Arc<dyn MaintenanceService>;

    fn onboarding(&self) -> Arc<dyn OnboardingService>;

    fn notifications(&self) -> Arc<dyn NotificationService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    property_service: Arc<dyn PropertyService>,
    lease_service: Arc<dyn LeaseService>,
    payment_service: Arc<dyn PaymentService>,
    maintenance_service: Arc<dyn MaintenanceService>,
    onboarding_service: Arc<dyn OnboardingService>,
    notification_service: Arc<dyn NotificationService>,
}

impl Services {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        user_service: Arc<dyn UserService>,
        property_service: Arc<dyn PropertyService>,
        lease_service: Arc<dyn LeaseService>,
        payment_service: Arc<dyn PaymentService>,
        maintenance_service: Arc<dyn MaintenanceService>,
        onboarding_service: Arc<dyn OnboardingService>,
        notification_service: Arc<dyn NotificationService>,
    ) -> Self {
        Self {
            auth_service,
            user_service,
            property_service,
            lease_service,
            payment_service,
            maintenance_service,
            onboarding_service,
            notification_service,
        }
    }

    /// Wire every service over one database connection and the outbound
    /// adapters.
    pub fn from_connection(
        db: sea_orm::DatabaseConnection,
        config: Config,
        mailer: Arc<dyn Mailer>,
        gateway: Arc<dyn PaymentGateway>,
        chat: Arc<dyn ChatSender>,
    ) -> Self {
        use super::{
            Authenticator, LeaseManager, MaintenanceManager, NotificationDispatcher,
            NotificationManager, OnboardingManager, PaymentManager, PropertyManager, UserManager,
        };

        let uow = Arc::new(Persistence::new(db));
        let notifier = Arc::new(NotificationDispatcher::new(
            uow.clone(),
            mailer,
            chat,
            config.chat_channel.clone(),
            config.app_base_url.clone(),
        ));
        let currency = config.payment_currency.clone();

        Self {
            auth_service: Arc::new(Authenticator::new(uow.clone(), config)),
            user_service: Arc::new(UserManager::new(uow.clone())),
            property_service: Arc::new(PropertyManager::new(uow.clone())),
            lease_service: Arc::new(LeaseManager::new(uow.clone(), notifier.clone())),
            payment_service: Arc::new(PaymentManager::new(
                uow.clone(),
                gateway,
                notifier.clone(),
                currency,
            )),
            maintenance_service: Arc::new(MaintenanceManager::new(uow.clone(), notifier.clone())),
            onboarding_service: Arc::new(OnboardingManager::new(uow.clone(), notifier)),
            notification_service: Arc::new(NotificationManager::new(uow)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn properties(&self) -> Arc<dyn PropertyService> {
        self.property_service.clone()
    }

    fn leases(&self) -> Arc<dyn LeaseService> {
        self.lease_service.clone()
    }

    fn payments(&self) -> Arc<dyn PaymentService> {
        self.payment_service.clone()
    }

    fn maintenance(&self) -> Arc<dyn MaintenanceService> {
        self.maintenance_service.clone()
    }

    fn onboarding(&self) -> Arc<dyn OnboardingService> {
        self.onboarding_service.clone()
    }

    fn notifications(&self) -> Arc<dyn NotificationService> {
        self.notification_service.clone()
    }
}
