//! HTTP request handlers, grouped by resource.

pub mod auth_handler;
pub mod lease_handler;
pub mod maintenance_handler;
pub mod notification_handler;
pub mod onboarding_handler;
pub mod payment_handler;
pub mod property_handler;
pub mod user_handler;

pub use auth_handler::auth_routes;
pub use lease_handler::{landlord_lease_routes, tenant_lease_routes};
pub use maintenance_handler::{landlord_maintenance_routes, tenant_maintenance_routes};
pub use notification_handler::notification_routes;
pub use onboarding_handler::onboarding_routes;
pub use payment_handler::{landlord_payment_routes, tenant_payment_routes, webhook_routes};
pub use property_handler::property_routes;
pub use user_handler::user_routes;
