//! User handlers.

use axum::{
    extract::{Query, State},
    routing::get,
    Router,
};

use crate::api::middleware::{require_admin, CurrentUser};
use crate::api::AppState;
use crate::domain::UserResponse;
use crate::errors::AppResult;
use crate::types::{ApiResponse, Paginated, PaginationParams};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/me", get(get_current_user))
}

/// Get the authenticated user's account
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_current_user(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state.services.users().get_user(current_user.id).await?;
    Ok(ApiResponse::success(user.into()))
}

/// List all users (admin only)
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    params(PaginationParams),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "One page of users", body = [UserResponse]),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(params): Query<PaginationParams>,
) -> AppResult<ApiResponse<Paginated<UserResponse>>> {
    require_admin(&current_user)?;
    let users = state
        .services
        .users()
        .list_users(current_user.actor())
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();
    Ok(ApiResponse::success(Paginated::from_vec(users, &params)))
}
