//! Maintenance request handlers.

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
use crate::domain::{
    CancelMaintenance, MaintenanceChanges, MaintenanceComment, MaintenanceDetail,
    MaintenanceFilter, MaintenanceRequest, MaintenanceUpdate, NewMaintenanceRequest,
};
use crate::errors::AppResult;
use crate::types::{ApiResponse, Created};

pub fn landlord_maintenance_routes() -> Router<AppState> {
    Router::new()
        .route("/maintenance", get(landlord_list))
        .route("/maintenance/:id", get(landlord_get).put(landlord_update))
        .route("/maintenance/:id/updates", post(landlord_comment))
}

pub fn tenant_maintenance_routes() -> Router<AppState> {
    Router::new()
        .route("/maintenance", get(tenant_list).post(submit))
        .route("/maintenance/:id", get(tenant_get))
        .route("/maintenance/:id/cancel", post(cancel))
        .route("/maintenance/:id/updates", post(tenant_comment))
}

#[utoipa::path(
    get,
    path = "/api/landlord/maintenance",
    tag = "Maintenance",
    params(MaintenanceFilter),
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Requests on the landlord's units", body = [MaintenanceRequest]))
)]
pub async fn landlord_list(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(filter): Query<MaintenanceFilter>,
) -> AppResult<ApiResponse<Vec<MaintenanceRequest>>> {
    let requests = state
        .services
        .maintenance()
        .list_for_landlord(user.actor(), filter)
        .await?;
    Ok(ApiResponse::success(requests))
}

#[utoipa::path(
    get,
    path = "/api/landlord/maintenance/{id}",
    tag = "Maintenance",
    params(("id" = Uuid, Path, description = "Request ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Request with its full log", body = MaintenanceDetail),
        (status = 403, description = "Not your property")
    )
)]
pub async fn landlord_get(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<MaintenanceDetail>> {
    let detail = state
        .services
        .maintenance()
        .get_for_landlord(user.actor(), id)
        .await?;
    Ok(ApiResponse::success(detail))
}

/// Change status, schedule, costs or notes
#[utoipa::path(
    put,
    path = "/api/landlord/maintenance/{id}",
    tag = "Maintenance",
    params(("id" = Uuid, Path, description = "Request ID")),
    request_body = MaintenanceChanges,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Request updated", body = MaintenanceRequest),
        (status = 400, description = "Transition not allowed")
    )
)]
pub async fn landlord_update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<MaintenanceChanges>,
) -> AppResult<ApiResponse<MaintenanceRequest>> {
    let request = state
        .services
        .maintenance()
        .landlord_update(user.actor(), id, payload)
        .await?;
    Ok(ApiResponse::success(request))
}

#[utoipa::path(
    post,
    path = "/api/landlord/maintenance/{id}/updates",
    tag = "Maintenance",
    params(("id" = Uuid, Path, description = "Request ID")),
    request_body = MaintenanceComment,
    security(("bearer_auth" = [])),
    responses((status = 201, description = "Comment added", body = MaintenanceUpdate))
)]
pub async fn landlord_comment(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<MaintenanceComment>,
) -> AppResult<impl IntoResponse> {
    add_comment(state, user, id, payload).await
}

#[utoipa::path(
    get,
    path = "/api/tenant/maintenance",
    tag = "Maintenance",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "The tenant's requests", body = [MaintenanceRequest]))
)]
pub async fn tenant_list(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<ApiResponse<Vec<MaintenanceRequest>>> {
    let requests = state
        .services
        .maintenance()
        .list_for_tenant(user.actor())
        .await?;
    Ok(ApiResponse::success(requests))
}

#[utoipa::path(
    post,
    path = "/api/tenant/maintenance",
    tag = "Maintenance",
    request_body = NewMaintenanceRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Request submitted", body = MaintenanceRequest),
        (status = 403, description = "No current lease on this unit")
    )
)]
pub async fn submit(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(payload): ValidatedJson<NewMaintenanceRequest>,
) -> AppResult<impl IntoResponse> {
    let request = state
        .services
        .maintenance()
        .submit(user.actor(), payload)
        .await?;
    Ok(Created(request))
}

#[utoipa::path(
    get,
    path = "/api/tenant/maintenance/{id}",
    tag = "Maintenance",
    params(("id" = Uuid, Path, description = "Request ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Request with its public log", body = MaintenanceDetail),
        (status = 403, description = "Not your request")
    )
)]
pub async fn tenant_get(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<MaintenanceDetail>> {
    let detail = state
        .services
        .maintenance()
        .get_for_tenant(user.actor(), id)
        .await?;
    Ok(ApiResponse::success(detail))
}

#[utoipa::path(
    post,
    path = "/api/tenant/maintenance/{id}/cancel",
    tag = "Maintenance",
    params(("id" = Uuid, Path, description = "Request ID")),
    request_body = CancelMaintenance,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Request cancelled", body = MaintenanceRequest),
        (status = 400, description = "Request can no longer be cancelled")
    )
)]
pub async fn cancel(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<CancelMaintenance>,
) -> AppResult<ApiResponse<MaintenanceRequest>> {
    let request = state
        .services
        .maintenance()
        .tenant_cancel(user.actor(), id, payload)
        .await?;
    Ok(ApiResponse::with_message(request, "Request cancelled"))
}

#[utoipa::path(
    post,
    path = "/api/tenant/maintenance/{id}/updates",
    tag = "Maintenance",
    params(("id" = Uuid, Path, description = "Request ID")),
    request_body = MaintenanceComment,
    security(("bearer_auth" = [])),
    responses((status = 201, description = "Comment added", body = MaintenanceUpdate))
)]
pub async fn tenant_comment(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<MaintenanceComment>,
) -> AppResult<impl IntoResponse> {
    add_comment(state, user, id, payload).await
}

async fn add_comment(
    state: AppState,
    user: CurrentUser,
    id: Uuid,
    payload: MaintenanceComment,
) -> AppResult<Created<MaintenanceUpdate>> {
    let update = state
        .services
        .maintenance()
        .comment(user.actor(), id, payload)
        .await?;
    Ok(Created(update))
}
