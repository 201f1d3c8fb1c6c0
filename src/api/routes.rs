//! Application route configuration.

use axum::{extract::State, http::StatusCode, middleware, response::Json, routing::get, Router};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    auth_routes, landlord_lease_routes, landlord_maintenance_routes, landlord_payment_routes,
    notification_routes, onboarding_routes, property_routes, tenant_lease_routes,
    tenant_maintenance_routes, tenant_payment_routes, user_routes, webhook_routes,
};
use super::middleware::{auth_middleware, require_landlord, require_tenant};
use super::openapi::ApiDoc;
use super::AppState;

/// Create the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    let users = user_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let notifications = notification_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let landlord = property_routes()
        .merge(landlord_lease_routes())
        .merge(landlord_payment_routes())
        .merge(landlord_maintenance_routes())
        .route_layer(middleware::from_fn(require_landlord))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let tenant = tenant_lease_routes()
        .merge(tenant_payment_routes())
        .merge(tenant_maintenance_routes())
        .route_layer(middleware::from_fn(require_tenant))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let onboarding = onboarding_routes()
        .route_layer(middleware::from_fn(require_tenant))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Public
        .nest("/api/auth", auth_routes())
        .nest("/api/webhooks", webhook_routes())
        // Any authenticated user
        .nest("/api/users", users)
        .nest("/api/notifications", notifications)
        // Role-scoped
        .nest("/api/landlord", landlord)
        .nest("/api/tenant", tenant)
        .nest("/api/onboarding", onboarding)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> &'static str {
    "leasedesk API"
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    database: ServiceStatus,
}

#[derive(Serialize)]
struct ServiceStatus {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Health check with database connectivity
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database = match &state.database {
        Some(db) => match db.ping().await {
            Ok(_) => ServiceStatus {
                status: "healthy",
                error: None,
            },
            Err(e) => ServiceStatus {
                status: "unhealthy",
                error: Some(e.to_string()),
            },
        },
        None => ServiceStatus {
            status: "not_configured",
            error: None,
        },
    };

    let healthy = database.status != "unhealthy";
    let status_code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(HealthResponse {
            status: if healthy { "healthy" } else { "degraded" },
            database,
        }),
    )
}
