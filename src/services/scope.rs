//! Ownership lookups shared by the landlord-facing services.
//!
//! Each helper resolves the entity, returns `NotFound` when it is missing
//! and `Forbidden` when the actor does not own the property above it.

use uuid::Uuid;

use crate::domain::{Actor, Lease, MaintenanceRequest, Property, Unit};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

pub(crate) async fn owned_property<U: UnitOfWork>(
    uow: &U,
    actor: &Actor,
    property_id: Uuid,
) -> AppResult<Property> {
    let property = uow
        .properties()
        .find_by_id(property_id)
        .await?
        .ok_or_not_found()?;
    actor.ensure_landlord_of(property.landlord_id)?;
    Ok(property)
}

/// The property a unit belongs to. A dangling reference is a storage fault.
pub(crate) async fn property_of<U: UnitOfWork>(uow: &U, unit: &Unit) -> AppResult<Property> {
    uow.properties()
        .find_by_id(unit.property_id)
        .await?
        .ok_or_else(|| AppError::internal(format!("Unit {} has no property", unit.id)))
}

pub(crate) async fn owned_unit<U: UnitOfWork>(
    uow: &U,
    actor: &Actor,
    unit_id: Uuid,
) -> AppResult<(Unit, Property)> {
    let unit = uow.units().find_by_id(unit_id).await?.ok_or_not_found()?;
    let property = property_of(uow, &unit).await?;
    actor.ensure_landlord_of(property.landlord_id)?;
    Ok((unit, property))
}

/// Unit behind a lease or request, with its property.
pub(crate) async fn unit_and_property<U: UnitOfWork>(
    uow: &U,
    unit_id: Uuid,
) -> AppResult<(Unit, Property)> {
    let unit = uow
        .units()
        .find_by_id(unit_id)
        .await?
        .ok_or_else(|| AppError::internal(format!("Missing unit {}", unit_id)))?;
    let property = property_of(uow, &unit).await?;
    Ok((unit, property))
}

pub(crate) async fn owned_lease<U: UnitOfWork>(
    uow: &U,
    actor: &Actor,
    lease_id: Uuid,
) -> AppResult<(Lease, Property)> {
    let lease = uow.leases().find_by_id(lease_id).await?.ok_or_not_found()?;
    let (_, property) = unit_and_property(uow, lease.unit_id).await?;
    actor.ensure_landlord_of(property.landlord_id)?;
    Ok((lease, property))
}

pub(crate) async fn owned_request<U: UnitOfWork>(
    uow: &U,
    actor: &Actor,
    request_id: Uuid,
) -> AppResult<(MaintenanceRequest, Property)> {
    let request = uow
        .maintenance()
        .find_by_id(request_id)
        .await?
        .ok_or_not_found()?;
    let (_, property) = unit_and_property(uow, request.unit_id).await?;
    actor.ensure_landlord_of(property.landlord_id)?;
    Ok((request, property))
}

/// Properties in the actor's scope: their own, or all of them for an admin.
pub(crate) async fn scoped_properties<U: UnitOfWork>(
    uow: &U,
    actor: &Actor,
) -> AppResult<Vec<Property>> {
    if actor.is_admin() {
        uow.properties().list_all().await
    } else {
        uow.properties().list_by_landlord(actor.id).await
    }
}

/// Every unit under the actor's properties.
pub(crate) async fn scoped_units<U: UnitOfWork>(uow: &U, actor: &Actor) -> AppResult<Vec<Unit>> {
    let property_ids = scoped_properties(uow, actor)
        .await?
        .into_iter()
        .map(|p| p.id)
        .collect();
    uow.units().list_by_properties(property_ids).await
}
