//! Landlord property, unit and dashboard handlers.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use uuid::Uuid;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{
    NewProperty, NewUnit, PortfolioSummary, Property, PropertyChanges, PropertyDetail, Unit,
    UnitChanges,
};
use crate::errors::AppResult;
use crate::types::{ApiResponse, Created};

pub fn property_routes() -> Router<AppState> {
    Router::new()
        .route("/properties", get(list_properties).post(create_property))
        .route(
            "/properties/:id",
            get(get_property).put(update_property).delete(delete_property),
        )
        .route("/properties/:id/units", get(list_units).post(create_unit))
        .route(
            "/units/:id",
            get(get_unit).put(update_unit).delete(delete_unit),
        )
        .route("/dashboard", get(dashboard))
}

#[utoipa::path(
    get,
    path = "/api/landlord/properties",
    tag = "Properties",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Properties in scope", body = [Property]))
)]
pub async fn list_properties(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<ApiResponse<Vec<Property>>> {
    let properties = state.services.properties().list_properties(user.actor()).await?;
    Ok(ApiResponse::success(properties))
}

#[utoipa::path(
    post,
    path = "/api/landlord/properties",
    tag = "Properties",
    request_body = NewProperty,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Property created", body = Property),
        (status = 400, description = "Validation error")
    )
)]
pub async fn create_property(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(payload): ValidatedJson<NewProperty>,
) -> AppResult<impl IntoResponse> {
    let property = state
        .services
        .properties()
        .create_property(user.actor(), payload)
        .await?;
    Ok(Created(property))
}

#[utoipa::path(
    get,
    path = "/api/landlord/properties/{id}",
    tag = "Properties",
    params(("id" = Uuid, Path, description = "Property ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Property with its units", body = PropertyDetail),
        (status = 403, description = "Not your property"),
        (status = 404, description = "Property not found")
    )
)]
pub async fn get_property(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<PropertyDetail>> {
    let detail = state.services.properties().get_property(user.actor(), id).await?;
    Ok(ApiResponse::success(detail))
}

#[utoipa::path(
    put,
    path = "/api/landlord/properties/{id}",
    tag = "Properties",
    params(("id" = Uuid, Path, description = "Property ID")),
    request_body = PropertyChanges,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Property updated", body = Property),
        (status = 403, description = "Not your property"),
        (status = 404, description = "Property not found")
    )
)]
pub async fn update_property(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<PropertyChanges>,
) -> AppResult<ApiResponse<Property>> {
    let property = state
        .services
        .properties()
        .update_property(user.actor(), id, payload)
        .await?;
    Ok(ApiResponse::success(property))
}

#[utoipa::path(
    delete,
    path = "/api/landlord/properties/{id}",
    tag = "Properties",
    params(("id" = Uuid, Path, description = "Property ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Property deleted"),
        (status = 400, description = "A unit still has an active or pending lease"),
        (status = 403, description = "Not your property")
    )
)]
pub async fn delete_property(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<()>> {
    state.services.properties().delete_property(user.actor(), id).await?;
    Ok(ApiResponse::message("Property deleted"))
}

#[utoipa::path(
    get,
    path = "/api/landlord/properties/{id}/units",
    tag = "Units",
    params(("id" = Uuid, Path, description = "Property ID")),
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Units of the property", body = [Unit]))
)]
pub async fn list_units(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<Vec<Unit>>> {
    let units = state.services.properties().list_units(user.actor(), id).await?;
    Ok(ApiResponse::success(units))
}

#[utoipa::path(
    post,
    path = "/api/landlord/properties/{id}/units",
    tag = "Units",
    params(("id" = Uuid, Path, description = "Property ID")),
    request_body = NewUnit,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Unit created", body = Unit),
        (status = 409, description = "Unit number already exists for this property")
    )
)]
pub async fn create_unit(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<NewUnit>,
) -> AppResult<impl IntoResponse> {
    let unit = state
        .services
        .properties()
        .create_unit(user.actor(), id, payload)
        .await?;
    Ok(Created(unit))
}

#[utoipa::path(
    get,
    path = "/api/landlord/units/{id}",
    tag = "Units",
    params(("id" = Uuid, Path, description = "Unit ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Unit", body = Unit),
        (status = 403, description = "Not your unit"),
        (status = 404, description = "Unit not found")
    )
)]
pub async fn get_unit(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<Unit>> {
    let unit = state.services.properties().get_unit(user.actor(), id).await?;
    Ok(ApiResponse::success(unit))
}

#[utoipa::path(
    put,
    path = "/api/landlord/units/{id}",
    tag = "Units",
    params(("id" = Uuid, Path, description = "Unit ID")),
    request_body = UnitChanges,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Unit updated", body = Unit),
        (status = 409, description = "Unit number already exists for this property")
    )
)]
pub async fn update_unit(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UnitChanges>,
) -> AppResult<ApiResponse<Unit>> {
    let unit = state
        .services
        .properties()
        .update_unit(user.actor(), id, payload)
        .await?;
    Ok(ApiResponse::success(unit))
}

#[utoipa::path(
    delete,
    path = "/api/landlord/units/{id}",
    tag = "Units",
    params(("id" = Uuid, Path, description = "Unit ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Unit deleted"),
        (status = 400, description = "Unit has an active or pending lease")
    )
)]
pub async fn delete_unit(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<()>> {
    state.services.properties().delete_unit(user.actor(), id).await?;
    Ok(ApiResponse::message("Unit deleted"))
}

/// Portfolio figures for the landlord dashboard
#[utoipa::path(
    get,
    path = "/api/landlord/dashboard",
    tag = "Properties",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Portfolio summary", body = PortfolioSummary))
)]
pub async fn dashboard(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<ApiResponse<PortfolioSummary>> {
    let summary = state
        .services
        .properties()
        .portfolio_summary(user.actor())
        .await?;
    Ok(ApiResponse::success(summary))
}
