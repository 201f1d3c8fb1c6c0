use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Router,
};
use uuid::Uuid;

use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{MarkedRead, Notification, NotificationQuery};
use crate::errors::AppResult;
use crate::types::ApiResponse;

pub fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_notifications))
        .route("/:id/read", post(mark_read))
        .route("/read-all", post(mark_all_read))
}

#[utoipa::path(
    get,
    path = "/api/notifications",
    tag = "Notifications",
    params(NotificationQuery),
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Newest first", body = [Notification]))
)]
pub async fn list_notifications(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<NotificationQuery>,
) -> AppResult<ApiResponse<Vec<Notification>>> {
    let notifications = state
        .services
        .notifications()
        .list(user.actor(), query.unread_only)
        .await?;
    Ok(ApiResponse::success(notifications))
}

#[utoipa::path(
    post,
    path = "/api/notifications/{id}/read",
    tag = "Notifications",
    params(("id" = Uuid, Path, description = "Notification ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Marked read", body = Notification),
        (status = 404, description = "Notification not found")
    )
)]
pub async fn mark_read(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<Notification>> {
    let notification = state
        .services
        .notifications()
        .mark_read(user.actor(), id)
        .await?;
    Ok(ApiResponse::success(notification))
}

#[utoipa::path(
    post,
    path = "/api/notifications/read-all",
    tag = "Notifications",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Number of notifications marked read", body = MarkedRead))
)]
pub async fn mark_all_read(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<ApiResponse<MarkedRead>> {
    let marked = state
        .services
        .notifications()
        .mark_all_read(user.actor())
        .await?;
    Ok(ApiResponse::success(marked))
}
