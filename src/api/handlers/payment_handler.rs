//! Payment handlers and the gateway webhook.

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::config::WEBHOOK_SECRET_HEADER;
use crate::domain::{
    GatewayEvent, NewManualPayment, NewPayment, Payment, PaymentCheckout, PaymentFilter,
};
use crate::errors::{AppError, AppResult};
use crate::types::{ApiResponse, Created};

pub fn landlord_payment_routes() -> Router<AppState> {
    Router::new()
        .route("/payments", get(landlord_list).post(record_manual))
        .route("/payments/:id/refund", post(refund))
}

pub fn tenant_payment_routes() -> Router<AppState> {
    Router::new()
        .route("/payments", get(tenant_list).post(initiate))
        .route("/payments/:id", get(tenant_get))
}

pub fn webhook_routes() -> Router<AppState> {
    Router::new().route("/payments", post(gateway_webhook))
}

#[utoipa::path(
    get,
    path = "/api/landlord/payments",
    tag = "Payments",
    params(PaymentFilter),
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Payments on the landlord's leases", body = [Payment]))
)]
pub async fn landlord_list(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(filter): Query<PaymentFilter>,
) -> AppResult<ApiResponse<Vec<Payment>>> {
    let payments = state
        .services
        .payments()
        .list_for_landlord(user.actor(), filter)
        .await?;
    Ok(ApiResponse::success(payments))
}

/// Record a cash, check or bank transfer payment
#[utoipa::path(
    post,
    path = "/api/landlord/payments",
    tag = "Payments",
    request_body = NewManualPayment,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Payment recorded", body = Payment),
        (status = 400, description = "Validation error")
    )
)]
pub async fn record_manual(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(payload): ValidatedJson<NewManualPayment>,
) -> AppResult<impl IntoResponse> {
    let payment = state
        .services
        .payments()
        .record_manual(user.actor(), payload)
        .await?;
    Ok(Created(payment))
}

#[utoipa::path(
    post,
    path = "/api/landlord/payments/{id}/refund",
    tag = "Payments",
    params(("id" = Uuid, Path, description = "Payment ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Payment refunded", body = Payment),
        (status = 400, description = "Only completed payments can be refunded")
    )
)]
pub async fn refund(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<Payment>> {
    let payment = state.services.payments().refund(user.actor(), id).await?;
    Ok(ApiResponse::with_message(payment, "Payment refunded"))
}

#[utoipa::path(
    get,
    path = "/api/tenant/payments",
    tag = "Payments",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "The tenant's payments", body = [Payment]))
)]
pub async fn tenant_list(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<ApiResponse<Vec<Payment>>> {
    let payments = state.services.payments().list_for_tenant(user.actor()).await?;
    Ok(ApiResponse::success(payments))
}

/// Start a checkout for rent or a deposit
#[utoipa::path(
    post,
    path = "/api/tenant/payments",
    tag = "Payments",
    request_body = NewPayment,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Checkout started", body = PaymentCheckout),
        (status = 403, description = "Not your lease")
    )
)]
pub async fn initiate(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(payload): ValidatedJson<NewPayment>,
) -> AppResult<Created<PaymentCheckout>> {
    let checkout = state
        .services
        .payments()
        .initiate(user.actor(), payload)
        .await?;
    Ok(Created(checkout))
}

#[utoipa::path(
    get,
    path = "/api/tenant/payments/{id}",
    tag = "Payments",
    params(("id" = Uuid, Path, description = "Payment ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Payment", body = Payment),
        (status = 403, description = "Not your payment")
    )
)]
pub async fn tenant_get(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<Payment>> {
    let payment = state
        .services
        .payments()
        .get_for_tenant(user.actor(), id)
        .await?;
    Ok(ApiResponse::success(payment))
}

/// Gateway callback carrying a charge outcome
#[utoipa::path(
    post,
    path = "/api/webhooks/payments",
    tag = "Payments",
    request_body = GatewayEvent,
    params(("X-Webhook-Secret" = String, Header, description = "Shared webhook secret")),
    responses(
        (status = 200, description = "Event applied", body = Payment),
        (status = 401, description = "Missing or wrong webhook secret"),
        (status = 404, description = "Unknown intent")
    )
)]
pub async fn gateway_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    ValidatedJson(event): ValidatedJson<GatewayEvent>,
) -> AppResult<ApiResponse<Payment>> {
    verify_webhook_secret(state.config.webhook_secret(), &headers)?;
    let payment = state.services.payments().reconcile(event).await?;
    Ok(ApiResponse::success(payment))
}

/// An unset secret rejects every call.
fn verify_webhook_secret(expected: Option<&str>, headers: &HeaderMap) -> AppResult<()> {
    let provided = headers
        .get(WEBHOOK_SECRET_HEADER)
        .and_then(|value| value.to_str().ok());
    match (expected, provided) {
        (Some(expected), Some(provided))
            if bool::from(expected.as_bytes().ct_eq(provided.as_bytes())) =>
        {
            Ok(())
        }
        _ => Err(AppError::Unauthorized),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(secret: &str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(WEBHOOK_SECRET_HEADER, HeaderValue::from_str(secret).unwrap());
        map
    }

    #[test]
    fn test_matching_secret_is_accepted() {
        assert!(verify_webhook_secret(Some("whsec"), &headers("whsec")).is_ok());
    }

    #[test]
    fn test_wrong_or_missing_secret_is_rejected() {
        assert!(verify_webhook_secret(Some("whsec"), &headers("other")).is_err());
        assert!(verify_webhook_secret(Some("whsec"), &HeaderMap::new()).is_err());
    }

    #[test]
    fn test_secret_prefix_is_rejected() {
        assert!(verify_webhook_secret(Some("whsec_live"), &headers("whsec")).is_err());
        assert!(verify_webhook_secret(Some("whsec"), &headers("whsec_live")).is_err());
    }

    #[test]
    fn test_unconfigured_secret_rejects_everything() {
        assert!(verify_webhook_secret(None, &headers("whsec")).is_err());
    }
}
