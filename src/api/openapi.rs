//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    auth_handler, lease_handler, maintenance_handler, notification_handler, onboarding_handler,
    payment_handler, property_handler, user_handler,
};
use crate::domain::{
    AvailableUnit, CancelMaintenance, EmergencyContact, Employment, GatewayEvent, GatewayOutcome,
    Lease, LeaseChanges, LeaseStatus, MaintenanceCategory, MaintenanceChanges, MaintenanceComment,
    MaintenanceDetail, MaintenancePriority, MaintenanceRequest, MaintenanceStatus,
    MaintenanceUpdate, MarkedRead, NewLease, NewMaintenanceRequest, NewManualPayment, NewPayment,
    NewProperty, NewUnit, Notification, NotificationKind, OnboardingReceipt, OnboardingSubmission,
    Payment, PaymentCheckout, PaymentMethod, PaymentStatus, PaymentType, PersonalDetails,
    PortfolioSummary, Property, PropertyChanges, PropertyDetail, PropertyStatus, PropertyType,
    SignLease, Unit, UnitChanges, UnitSelection, UnitStatus, UserProfile, UserResponse, UserRole,
    UserStatus,
};
use crate::services::TokenResponse;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "leasedesk",
        version = "0.1.0",
        description = "Property management API for landlords and tenants",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        auth_handler::register,
        auth_handler::login,
        user_handler::get_current_user,
        user_handler::list_users,
        property_handler::list_properties,
        property_handler::create_property,
        property_handler::get_property,
        property_handler::update_property,
        property_handler::delete_property,
        property_handler::list_units,
        property_handler::create_unit,
        property_handler::get_unit,
        property_handler::update_unit,
        property_handler::delete_unit,
        property_handler::dashboard,
        lease_handler::landlord_list,
        lease_handler::create_lease,
        lease_handler::landlord_get,
        lease_handler::update_lease,
        lease_handler::tenant_list,
        lease_handler::tenant_get,
        lease_handler::sign_lease,
        payment_handler::landlord_list,
        payment_handler::record_manual,
        payment_handler::refund,
        payment_handler::tenant_list,
        payment_handler::initiate,
        payment_handler::tenant_get,
        payment_handler::gateway_webhook,
        maintenance_handler::landlord_list,
        maintenance_handler::landlord_get,
        maintenance_handler::landlord_update,
        maintenance_handler::landlord_comment,
        maintenance_handler::tenant_list,
        maintenance_handler::submit,
        maintenance_handler::tenant_get,
        maintenance_handler::cancel,
        maintenance_handler::tenant_comment,
        onboarding_handler::available_units,
        onboarding_handler::submit,
        notification_handler::list_notifications,
        notification_handler::mark_read,
        notification_handler::mark_all_read,
    ),
    components(
        schemas(
            UserRole,
            UserStatus,
            UserProfile,
            UserResponse,
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            TokenResponse,
            PropertyType,
            PropertyStatus,
            Property,
            PropertyDetail,
            NewProperty,
            PropertyChanges,
            PortfolioSummary,
            UnitStatus,
            Unit,
            NewUnit,
            UnitChanges,
            LeaseStatus,
            Lease,
            NewLease,
            LeaseChanges,
            SignLease,
            PaymentType,
            PaymentMethod,
            PaymentStatus,
            Payment,
            NewPayment,
            NewManualPayment,
            PaymentCheckout,
            GatewayEvent,
            GatewayOutcome,
            MaintenanceCategory,
            MaintenancePriority,
            MaintenanceStatus,
            MaintenanceRequest,
            MaintenanceUpdate,
            MaintenanceDetail,
            NewMaintenanceRequest,
            MaintenanceChanges,
            MaintenanceComment,
            CancelMaintenance,
            PersonalDetails,
            EmergencyContact,
            Employment,
            UnitSelection,
            OnboardingSubmission,
            OnboardingReceipt,
            AvailableUnit,
            NotificationKind,
            Notification,
            MarkedRead,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration and login"),
        (name = "Users", description = "Account lookup"),
        (name = "Properties", description = "Landlord portfolio"),
        (name = "Units", description = "Rentable units"),
        (name = "Leases", description = "Lease lifecycle and signing"),
        (name = "Payments", description = "Rent, deposits and refunds"),
        (name = "Maintenance", description = "Repair requests and their log"),
        (name = "Onboarding", description = "Tenant application"),
        (name = "Notifications", description = "In-app notifications")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /api/auth/login"))
                        .build(),
                ),
            );
        }
    }
}
