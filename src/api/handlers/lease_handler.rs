//! Lease handlers for both sides of the tenancy.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use uuid::Uuid;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{Lease, LeaseChanges, LeaseFilter, NewLease, SignLease};
use crate::errors::AppResult;
use crate::types::{ApiResponse, Created};

pub fn landlord_lease_routes() -> Router<AppState> {
    Router::new()
        .route("/leases", get(landlord_list).post(create_lease))
        .route("/leases/:id", get(landlord_get).put(update_lease))
}

pub fn tenant_lease_routes() -> Router<AppState> {
    Router::new()
        .route("/leases", get(tenant_list))
        .route("/leases/:id", get(tenant_get))
        .route("/leases/:id/sign", post(sign_lease))
}

#[utoipa::path(
    get,
    path = "/api/landlord/leases",
    tag = "Leases",
    params(LeaseFilter),
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Leases on the landlord's units", body = [Lease]))
)]
pub async fn landlord_list(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(filter): Query<LeaseFilter>,
) -> AppResult<ApiResponse<Vec<Lease>>> {
    let leases = state
        .services
        .leases()
        .list_for_landlord(user.actor(), filter)
        .await?;
    Ok(ApiResponse::success(leases))
}

#[utoipa::path(
    post,
    path = "/api/landlord/leases",
    tag = "Leases",
    request_body = NewLease,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Lease created", body = Lease),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Unit already has an active or pending lease")
    )
)]
pub async fn create_lease(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(payload): ValidatedJson<NewLease>,
) -> AppResult<impl IntoResponse> {
    let lease = state.services.leases().create(user.actor(), payload).await?;
    Ok(Created(lease))
}

#[utoipa::path(
    get,
    path = "/api/landlord/leases/{id}",
    tag = "Leases",
    params(("id" = Uuid, Path, description = "Lease ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Lease", body = Lease),
        (status = 403, description = "Not your lease"),
        (status = 404, description = "Lease not found")
    )
)]
pub async fn landlord_get(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<Lease>> {
    let lease = state
        .services
        .leases()
        .get_for_landlord(user.actor(), id)
        .await?;
    Ok(ApiResponse::success(lease))
}

#[utoipa::path(
    put,
    path = "/api/landlord/leases/{id}",
    tag = "Leases",
    params(("id" = Uuid, Path, description = "Lease ID")),
    request_body = LeaseChanges,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Lease updated", body = Lease),
        (status = 400, description = "Invalid change")
    )
)]
pub async fn update_lease(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<LeaseChanges>,
) -> AppResult<ApiResponse<Lease>> {
    let lease = state
        .services
        .leases()
        .update(user.actor(), id, payload)
        .await?;
    Ok(ApiResponse::success(lease))
}

#[utoipa::path(
    get,
    path = "/api/tenant/leases",
    tag = "Leases",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "The tenant's leases", body = [Lease]))
)]
pub async fn tenant_list(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<ApiResponse<Vec<Lease>>> {
    let leases = state.services.leases().list_for_tenant(user.actor()).await?;
    Ok(ApiResponse::success(leases))
}

#[utoipa::path(
    get,
    path = "/api/tenant/leases/{id}",
    tag = "Leases",
    params(("id" = Uuid, Path, description = "Lease ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Lease", body = Lease),
        (status = 403, description = "Not your lease")
    )
)]
pub async fn tenant_get(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<Lease>> {
    let lease = state.services.leases().get_for_tenant(user.actor(), id).await?;
    Ok(ApiResponse::success(lease))
}

/// Sign a lease awaiting the tenant's signature
#[utoipa::path(
    post,
    path = "/api/tenant/leases/{id}/sign",
    tag = "Leases",
    params(("id" = Uuid, Path, description = "Lease ID")),
    request_body = SignLease,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Lease signed and active", body = Lease),
        (status = 400, description = "Lease is not awaiting signature")
    )
)]
pub async fn sign_lease(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<SignLease>,
) -> AppResult<ApiResponse<Lease>> {
    let lease = state
        .services
        .leases()
        .sign(user.actor(), id, payload)
        .await?;
    Ok(ApiResponse::with_message(lease, "Lease signed"))
}
