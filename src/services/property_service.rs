//! Property and unit management for landlords.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use super::scope::{owned_property, owned_unit, scoped_properties, scoped_units};
use crate::domain::{
    Actor, NewProperty, NewUnit, PaymentStatus, PortfolioSummary, Property, PropertyChanges,
    PropertyDetail, Unit, UnitChanges,
};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PropertyService: Send + Sync {
    async fn list_properties(&self, actor: Actor) -> AppResult<Vec<Property>>;

    async fn get_property(&self, actor: Actor, id: Uuid) -> AppResult<PropertyDetail>;

    async fn create_property(&self, actor: Actor, input: NewProperty) -> AppResult<Property>;

    async fn update_property(
        &self,
        actor: Actor,
        id: Uuid,
        changes: PropertyChanges,
    ) -> AppResult<Property>;

    /// Refused while any unit is held by an active or pending lease.
    async fn delete_property(&self, actor: Actor, id: Uuid) -> AppResult<()>;

    async fn list_units(&self, actor: Actor, property_id: Uuid) -> AppResult<Vec<Unit>>;

    async fn get_unit(&self, actor: Actor, id: Uuid) -> AppResult<Unit>;

    async fn create_unit(&self, actor: Actor, property_id: Uuid, input: NewUnit)
        -> AppResult<Unit>;

    async fn update_unit(&self, actor: Actor, id: Uuid, changes: UnitChanges) -> AppResult<Unit>;

    async fn delete_unit(&self, actor: Actor, id: Uuid) -> AppResult<()>;

    async fn portfolio_summary(&self, actor: Actor) -> AppResult<PortfolioSummary>;
}

pub struct PropertyManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> PropertyManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn ensure_number_free(&self, property_id: Uuid, number: &str) -> AppResult<()> {
        if self
            .uow
            .units()
            .find_by_number(property_id, number.trim())
            .await?
            .is_some()
        {
            return Err(AppError::conflict(
                "Unit number already exists for this property",
            ));
        }
        Ok(())
    }

    async fn ensure_no_blocking_lease(&self, unit_ids: Vec<Uuid>, what: &str) -> AppResult<()> {
        if unit_ids.is_empty() {
            return Ok(());
        }
        let blocking = self.uow.leases().count_blocking_for_units(unit_ids).await?;
        if blocking > 0 {
            return Err(AppError::bad_request(format!(
                "Cannot delete {} with an active or pending lease",
                what
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl<U: UnitOfWork> PropertyService for PropertyManager<U> {
    async fn list_properties(&self, actor: Actor) -> AppResult<Vec<Property>> {
        scoped_properties(self.uow.as_ref(), &actor).await
    }

    async fn get_property(&self, actor: Actor, id: Uuid) -> AppResult<PropertyDetail> {
        let property = owned_property(self.uow.as_ref(), &actor, id).await?;
        let units = self.uow.units().list_by_property(property.id).await?;
        Ok(PropertyDetail { property, units })
    }

    async fn create_property(&self, actor: Actor, input: NewProperty) -> AppResult<Property> {
        let property = self
            .uow
            .properties()
            .create(Property::new(actor.id, input))
            .await?;
        tracing::info!(property_id = %property.id, landlord_id = %actor.id, "Property created");
        Ok(property)
    }

    async fn update_property(
        &self,
        actor: Actor,
        id: Uuid,
        changes: PropertyChanges,
    ) -> AppResult<Property> {
        let mut property = owned_property(self.uow.as_ref(), &actor, id).await?;
        property.apply(changes);
        self.uow.properties().update(property).await
    }

    async fn delete_property(&self, actor: Actor, id: Uuid) -> AppResult<()> {
        let property = owned_property(self.uow.as_ref(), &actor, id).await?;
        let unit_ids = self
            .uow
            .units()
            .list_by_property(property.id)
            .await?
            .into_iter()
            .map(|u| u.id)
            .collect();
        self.ensure_no_blocking_lease(unit_ids, "a property").await?;

        self.uow.properties().delete(property.id).await?;
        tracing::info!(property_id = %property.id, "Property deleted");
        Ok(())
    }

    async fn list_units(&self, actor: Actor, property_id: Uuid) -> AppResult<Vec<Unit>> {
        let property = owned_property(self.uow.as_ref(), &actor, property_id).await?;
        self.uow.units().list_by_property(property.id).await
    }

    async fn get_unit(&self, actor: Actor, id: Uuid) -> AppResult<Unit> {
        let (unit, _) = owned_unit(self.uow.as_ref(), &actor, id).await?;
        Ok(unit)
    }

    async fn create_unit(
        &self,
        actor: Actor,
        property_id: Uuid,
        input: NewUnit,
    ) -> AppResult<Unit> {
        let property = owned_property(self.uow.as_ref(), &actor, property_id).await?;
        self.ensure_number_free(property.id, &input.unit_number).await?;

        let unit = self.uow.units().create(Unit::new(property.id, input)).await?;
        tracing::info!(unit_id = %unit.id, property_id = %property.id, "Unit created");
        Ok(unit)
    }

    async fn update_unit(&self, actor: Actor, id: Uuid, changes: UnitChanges) -> AppResult<Unit> {
        let (mut unit, _) = owned_unit(self.uow.as_ref(), &actor, id).await?;
        if let Some(number) = &changes.unit_number {
            if number.trim() != unit.unit_number {
                self.ensure_number_free(unit.property_id, number).await?;
            }
        }
        unit.apply(changes);
        self.uow.units().update(unit).await
    }

    async fn delete_unit(&self, actor: Actor, id: Uuid) -> AppResult<()> {
        let (unit, _) = owned_unit(self.uow.as_ref(), &actor, id).await?;
        self.ensure_no_blocking_lease(vec![unit.id], "a unit").await?;
        self.uow.units().delete(unit.id).await
    }

    async fn portfolio_summary(&self, actor: Actor) -> AppResult<PortfolioSummary> {
        let properties = scoped_properties(self.uow.as_ref(), &actor).await?;
        let units = scoped_units(self.uow.as_ref(), &actor).await?;
        let unit_ids: Vec<Uuid> = units.iter().map(|u| u.id).collect();

        let leases = self.uow.leases();
        let maintenance = self.uow.maintenance();
        let (lease_list, requests) = tokio::try_join!(
            leases.list_by_units(unit_ids.clone()),
            maintenance.list_by_units(unit_ids),
        )?;
        let payments = self
            .uow
            .payments()
            .list_by_leases(lease_list.iter().map(|l| l.id).collect())
            .await?;

        let mut summary = PortfolioSummary::from_units(properties.len(), &units);
        summary.open_maintenance_requests =
            requests.iter().filter(|r| r.status.is_open()).count();
        summary.pending_payments = payments
            .iter()
            .filter(|p| matches!(p.status, PaymentStatus::Pending | PaymentStatus::Processing))
            .count();
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PropertyType, UnitStatus, UserRole};
    use crate::infra::repositories::{
        MockLeaseRepository, MockPropertyRepository, MockUnitRepository,
    };
    use crate::services::testing::TestUnitOfWork;
    use mockall::predicate::eq;

    fn property(landlord_id: Uuid) -> Property {
        Property::new(
            landlord_id,
            NewProperty {
                name: "Maple Court".to_string(),
                property_type: PropertyType::Apartment,
                status: None,
                address_line1: "12 Maple Street".to_string(),
                address_line2: None,
                city: "Springfield".to_string(),
                state: "IL".to_string(),
                postal_code: "62701".to_string(),
                country: None,
                description: None,
            },
        )
    }

    fn new_unit(number: &str) -> NewUnit {
        NewUnit {
            unit_number: number.to_string(),
            bedrooms: 1,
            bathrooms: 1.0,
            square_feet: None,
            rent_cents: 120_000,
            deposit_cents: 120_000,
            status: None,
        }
    }

    fn properties_returning(property: Property) -> MockPropertyRepository {
        let mut repo = MockPropertyRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(property.clone())));
        repo
    }

    #[tokio::test]
    async fn test_other_landlord_is_forbidden() {
        let owner = Uuid::new_v4();
        let prop = property(owner);
        let uow = TestUnitOfWork::default().with_properties(properties_returning(prop.clone()));
        let intruder = Actor::new(Uuid::new_v4(), UserRole::Landlord);

        let result = PropertyManager::new(Arc::new(uow))
            .get_property(intruder, prop.id)
            .await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_missing_property_is_not_found() {
        let mut repo = MockPropertyRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));
        let uow = TestUnitOfWork::default().with_properties(repo);
        let actor = Actor::new(Uuid::new_v4(), UserRole::Landlord);

        let result = PropertyManager::new(Arc::new(uow))
            .get_property(actor, Uuid::new_v4())
            .await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_duplicate_unit_number_conflicts() {
        let owner = Uuid::new_v4();
        let prop = property(owner);
        let existing = Unit::new(prop.id, new_unit("2B"));

        let mut units = MockUnitRepository::new();
        units
            .expect_find_by_number()
            .withf(|_, number| number == "2B")
            .returning(move |_, _| Ok(Some(existing.clone())));
        units.expect_create().never();

        let uow = TestUnitOfWork::default()
            .with_properties(properties_returning(prop.clone()))
            .with_units(units);
        let result = PropertyManager::new(Arc::new(uow))
            .create_unit(Actor::new(owner, UserRole::Landlord), prop.id, new_unit(" 2B "))
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_unit_with_active_lease_cannot_be_deleted() {
        let owner = Uuid::new_v4();
        let prop = property(owner);
        let mut unit = Unit::new(prop.id, new_unit("1A"));
        unit.status = UnitStatus::Occupied;
        let unit_id = unit.id;

        let mut units = MockUnitRepository::new();
        units
            .expect_find_by_id()
            .with(eq(unit_id))
            .returning(move |_| Ok(Some(unit.clone())));
        units.expect_delete().never();
        let mut leases = MockLeaseRepository::new();
        leases
            .expect_count_blocking_for_units()
            .with(eq(vec![unit_id]))
            .returning(|_| Ok(1));

        let uow = TestUnitOfWork::default()
            .with_properties(properties_returning(prop))
            .with_units(units)
            .with_leases(leases);
        let result = PropertyManager::new(Arc::new(uow))
            .delete_unit(Actor::new(owner, UserRole::Landlord), unit_id)
            .await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_property_with_pending_lease_cannot_be_deleted() {
        let owner = Uuid::new_v4();
        let prop = property(owner);
        let prop_id = prop.id;
        let free = Unit::new(prop.id, new_unit("1A"));
        let reserved = Unit::new(prop.id, new_unit("1B"));
        let unit_ids = vec![free.id, reserved.id];

        let mut properties = properties_returning(prop);
        properties.expect_delete().never();
        let mut units = MockUnitRepository::new();
        units
            .expect_list_by_property()
            .with(eq(prop_id))
            .returning(move |_| Ok(vec![free.clone(), reserved.clone()]));
        let mut leases = MockLeaseRepository::new();
        leases
            .expect_count_blocking_for_units()
            .with(eq(unit_ids))
            .times(1)
            .returning(|_| Ok(1));

        let uow = TestUnitOfWork::default()
            .with_properties(properties)
            .with_units(units)
            .with_leases(leases);
        let result = PropertyManager::new(Arc::new(uow))
            .delete_property(Actor::new(owner, UserRole::Landlord), prop_id)
            .await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_admin_can_delete_free_property() {
        let prop = property(Uuid::new_v4());
        let prop_id = prop.id;

        let mut properties = properties_returning(prop);
        properties
            .expect_delete()
            .with(eq(prop_id))
            .times(1)
            .returning(|_| Ok(()));
        let mut units = MockUnitRepository::new();
        units.expect_list_by_property().returning(|_| Ok(vec![]));

        let uow = TestUnitOfWork::default()
            .with_properties(properties)
            .with_units(units);
        let admin = Actor::new(Uuid::new_v4(), UserRole::Admin);
        PropertyManager::new(Arc::new(uow))
            .delete_property(admin, prop_id)
            .await
            .unwrap();
    }
}
