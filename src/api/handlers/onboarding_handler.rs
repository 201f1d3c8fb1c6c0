//! Tenant onboarding handlers.

use axum::{
    extract::State,
    routing::{get, post},
    Router,
};

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{AvailableUnit, OnboardingReceipt, OnboardingSubmission};
use crate::errors::AppResult;
use crate::types::{ApiResponse, Created};

pub fn onboarding_routes() -> Router<AppState> {
    Router::new()
        .route("/units", get(available_units))
        .route("/submit", post(submit))
}

#[utoipa::path(
    get,
    path = "/api/onboarding/units",
    tag = "Onboarding",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Vacant units open for application", body = [AvailableUnit]))
)]
pub async fn available_units(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<AvailableUnit>>> {
    let units = state.services.onboarding().available_units().await?;
    Ok(ApiResponse::success(units))
}

/// Submit personal, employment and unit details in one step
#[utoipa::path(
    post,
    path = "/api/onboarding/submit",
    tag = "Onboarding",
    request_body = OnboardingSubmission,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Lease created and awaiting signature", body = OnboardingReceipt),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Already onboarded or unit no longer available")
    )
)]
pub async fn submit(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(payload): ValidatedJson<OnboardingSubmission>,
) -> AppResult<Created<OnboardingReceipt>> {
    let receipt = state
        .services
        .onboarding()
        .submit(user.actor(), payload)
        .await?;
    Ok(Created(receipt))
}
