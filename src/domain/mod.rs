//! Domain layer - Core business entities and rules
//!
//! Entities, value objects and the rules that govern them (status
//! lifecycles, ownership checks, request payload validation). Nothing in
//! here talks to the database or the network.

/// Declares a string-backed enum stored and serialized as
/// SCREAMING_SNAKE_CASE text.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($variant:ident => $value:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash,
            serde::Serialize, serde::Deserialize, utoipa::ToSchema,
        )]
        pub enum $name {
            $(
                #[serde(rename = $value)]
                $variant,
            )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Stored/serialized representation.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::errors::AppError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok($name::$variant),)+
                    other => Err($crate::errors::AppError::validation(format!(
                        "Invalid {} value: {}",
                        stringify!($name),
                        other
                    ))),
                }
            }
        }
    };
}

pub mod access;
pub mod audit;
pub mod lease;
pub mod maintenance;
pub mod notification;
pub mod onboarding;
pub mod password;
pub mod payment;
pub mod property;
pub mod sensitive;
pub mod unit;
pub mod user;
pub mod validation;

pub use access::Actor;
pub use audit::AuditEntry;
pub use lease::{Lease, LeaseChanges, LeaseFilter, LeaseStatus, NewLease, SignLease};
pub use maintenance::{
    CancelMaintenance, MaintenanceCategory, MaintenanceChanges, MaintenanceComment, MaintenanceDetail,
    MaintenanceFilter, MaintenancePriority, MaintenanceRequest, MaintenanceStatus,
    MaintenanceUpdate, NewMaintenanceRequest, StatusChange,
};
pub use notification::{MarkedRead, Notification, NotificationKind, NotificationQuery};
pub use onboarding::{
    AvailableUnit, EmergencyContact, Employment, OnboardingReceipt, OnboardingSubmission,
    PersonalDetails, UnitSelection,
};
pub use password::Password;
pub use payment::{
    GatewayEvent, GatewayOutcome, NewManualPayment, NewPayment, Payment, PaymentCheckout,
    PaymentFilter, PaymentMethod, PaymentStatus, PaymentType,
};
pub use property::{
    NewProperty, PortfolioSummary, Property, PropertyChanges, PropertyDetail, PropertyStatus,
    PropertyType,
};
pub use sensitive::SensitiveValue;
pub use unit::{NewUnit, Unit, UnitChanges, UnitStatus};
pub use user::{CreateUser, User, UserProfile, UserResponse, UserRole, UserStatus};
