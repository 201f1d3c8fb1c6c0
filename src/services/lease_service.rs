//! Lease lifecycle: landlord drafting and edits, tenant signature.
//!
//! Every lease write that moves the unit's status goes through the lease
//! repository so both rows land in one transaction.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use super::notifier::{Notice, Notifier};
use super::scope::{owned_lease, owned_unit, scoped_units, unit_and_property};
use crate::domain::{
    Actor, Lease, LeaseChanges, LeaseFilter, LeaseStatus, NewLease, NotificationKind, SignLease,
    UnitStatus, UserRole,
};
use crate::domain::validation::ordered_dates;
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait LeaseService: Send + Sync {
    async fn list_for_landlord(&self, actor: Actor, filter: LeaseFilter) -> AppResult<Vec<Lease>>;

    async fn get_for_landlord(&self, actor: Actor, id: Uuid) -> AppResult<Lease>;

    async fn create(&self, actor: Actor, input: NewLease) -> AppResult<Lease>;

    async fn update(&self, actor: Actor, id: Uuid, changes: LeaseChanges) -> AppResult<Lease>;

    async fn list_for_tenant(&self, actor: Actor) -> AppResult<Vec<Lease>>;

    async fn get_for_tenant(&self, actor: Actor, id: Uuid) -> AppResult<Lease>;

    /// Tenant signature: activates the lease and occupies the unit.
    async fn sign(&self, actor: Actor, id: Uuid, input: SignLease) -> AppResult<Lease>;
}

pub struct LeaseManager<U: UnitOfWork> {
    uow: Arc<U>,
    notifier: Arc<dyn Notifier>,
}

impl<U: UnitOfWork> LeaseManager<U> {
    pub fn new(uow: Arc<U>, notifier: Arc<dyn Notifier>) -> Self {
        Self { uow, notifier }
    }

    async fn tenant_lease(&self, actor: &Actor, id: Uuid) -> AppResult<Lease> {
        let lease = self.uow.leases().find_by_id(id).await?.ok_or_not_found()?;
        actor.ensure_tenant_of(lease.tenant_id)?;
        Ok(lease)
    }

    async fn ensure_unit_free(&self, unit_id: Uuid) -> AppResult<()> {
        let blocking = self
            .uow
            .leases()
            .count_blocking_for_units(vec![unit_id])
            .await?;
        if blocking > 0 {
            return Err(AppError::conflict(
                "Unit already has an active or pending lease",
            ));
        }
        Ok(())
    }

    async fn notify_tenant(&self, lease: &Lease, title: &str, message: String) {
        let notice = Notice::new(lease.tenant_id, NotificationKind::LeaseUpdated, title, message)
            .link(format!("/tenant/leases/{}", lease.id));
        self.notifier.dispatch(notice).await;
    }
}

#[async_trait]
impl<U: UnitOfWork> LeaseService for LeaseManager<U> {
    async fn list_for_landlord(&self, actor: Actor, filter: LeaseFilter) -> AppResult<Vec<Lease>> {
        let unit_ids = scoped_units(self.uow.as_ref(), &actor)
            .await?
            .into_iter()
            .map(|u| u.id)
            .collect();
        let leases = self.uow.leases().list_by_units(unit_ids).await?;
        Ok(leases.into_iter().filter(|l| filter.matches(l)).collect())
    }

    async fn get_for_landlord(&self, actor: Actor, id: Uuid) -> AppResult<Lease> {
        let (lease, _) = owned_lease(self.uow.as_ref(), &actor, id).await?;
        Ok(lease)
    }

    async fn create(&self, actor: Actor, input: NewLease) -> AppResult<Lease> {
        ordered_dates(input.start_date, input.end_date)?;
        let (unit, _) = owned_unit(self.uow.as_ref(), &actor, input.unit_id).await?;

        let tenant = self
            .uow
            .users()
            .find_by_id(input.tenant_id)
            .await?
            .ok_or_not_found()?;
        if tenant.role != UserRole::Tenant {
            return Err(AppError::validation("Lease tenant must be a tenant account"));
        }

        self.ensure_unit_free(unit.id).await?;

        let lease = Lease::new(&input);
        let unit_status = (lease.status == LeaseStatus::PendingSignature)
            .then_some(UnitStatus::Reserved);
        let lease = self.uow.leases().create(lease, unit_status).await?;

        tracing::info!(lease_id = %lease.id, unit_id = %unit.id, status = %lease.status, "Lease created");
        if lease.status == LeaseStatus::PendingSignature {
            self.notify_tenant(
                &lease,
                "Lease ready for signature",
                format!("Your lease for unit {} is ready to sign", unit.unit_number),
            )
            .await;
        }
        Ok(lease)
    }

    async fn update(&self, actor: Actor, id: Uuid, changes: LeaseChanges) -> AppResult<Lease> {
        let (mut lease, _) = owned_lease(self.uow.as_ref(), &actor, id).await?;
        let previous = lease.status;

        if changes.status.is_some_and(|s| s.is_blocking()) && !previous.is_blocking() {
            self.ensure_unit_free(lease.unit_id).await?;
        }
        let unit_status = lease.apply(changes)?;
        let lease = self.uow.leases().update(lease, unit_status).await?;

        if lease.status != previous {
            tracing::info!(lease_id = %lease.id, from = %previous, to = %lease.status, "Lease status changed");
            self.notify_tenant(
                &lease,
                "Lease updated",
                format!("Your lease is now {}", lease.status),
            )
            .await;
        }
        Ok(lease)
    }

    async fn list_for_tenant(&self, actor: Actor) -> AppResult<Vec<Lease>> {
        actor.ensure_role(UserRole::Tenant)?;
        self.uow.leases().list_by_tenant(actor.id).await
    }

    async fn get_for_tenant(&self, actor: Actor, id: Uuid) -> AppResult<Lease> {
        self.tenant_lease(&actor, id).await
    }

    async fn sign(&self, actor: Actor, id: Uuid, input: SignLease) -> AppResult<Lease> {
        let mut lease = self.tenant_lease(&actor, id).await?;
        lease.sign(input.signature.trim().to_string(), Utc::now())?;
        let lease = self
            .uow
            .leases()
            .update(lease, Some(UnitStatus::Occupied))
            .await?;

        tracing::info!(lease_id = %lease.id, tenant_id = %actor.id, "Lease signed");
        let (unit, property) = unit_and_property(self.uow.as_ref(), lease.unit_id).await?;
        let notice = Notice::new(
            property.landlord_id,
            NotificationKind::LeaseSigned,
            "Lease signed",
            format!(
                "The lease for {} unit {} has been signed",
                property.name, unit.unit_number
            ),
        )
        .link(format!("/landlord/leases/{}", lease.id));
        self.notifier.dispatch(notice).await;
        Ok(lease)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewProperty, NewUnit, Property, PropertyType, Unit, User};
    use crate::infra::repositories::{
        MockLeaseRepository, MockPropertyRepository, MockUnitRepository, MockUserRepository,
    };
    use crate::services::notifier::MockNotifier;
    use crate::services::testing::TestUnitOfWork;
    use chrono::NaiveDate;
    use mockall::predicate::eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn fixture(landlord_id: Uuid) -> (Property, Unit) {
        let property = Property::new(
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
        );
        let unit = Unit::new(
            property.id,
            NewUnit {
                unit_number: "3C".to_string(),
                bedrooms: 2,
                bathrooms: 1.0,
                square_feet: None,
                rent_cents: 150_000,
                deposit_cents: 150_000,
                status: None,
            },
        );
        (property, unit)
    }

    fn new_lease(unit_id: Uuid, tenant_id: Uuid, send: bool) -> NewLease {
        NewLease {
            unit_id,
            tenant_id,
            start_date: date(2030, 1, 1),
            end_date: date(2030, 12, 31),
            rent_cents: 150_000,
            deposit_cents: 150_000,
            terms: None,
            send_for_signature: send,
        }
    }

    fn location(property: &Property, unit: &Unit) -> (MockPropertyRepository, MockUnitRepository) {
        let p = property.clone();
        let u = unit.clone();
        let mut properties = MockPropertyRepository::new();
        properties
            .expect_find_by_id()
            .returning(move |_| Ok(Some(p.clone())));
        let mut units = MockUnitRepository::new();
        units.expect_find_by_id().returning(move |_| Ok(Some(u.clone())));
        (properties, units)
    }

    fn tenant_user() -> User {
        User::new(
            "tenant@example.com".to_string(),
            "hash".to_string(),
            "Tenant".to_string(),
            UserRole::Tenant,
        )
    }

    #[tokio::test]
    async fn test_sending_for_signature_reserves_unit() {
        let landlord = Uuid::new_v4();
        let (property, unit) = fixture(landlord);
        let tenant = tenant_user();
        let tenant_id = tenant.id;
        let (properties, units) = location(&property, &unit);

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(tenant.clone())));
        let mut leases = MockLeaseRepository::new();
        leases.expect_count_blocking_for_units().returning(|_| Ok(0));
        leases
            .expect_create()
            .withf(|lease, status| {
                lease.status == LeaseStatus::PendingSignature
                    && *status == Some(UnitStatus::Reserved)
            })
            .times(1)
            .returning(|lease, _| Ok(lease));
        let mut notifier = MockNotifier::new();
        notifier
            .expect_dispatch()
            .withf(move |n| n.recipient == tenant_id)
            .times(1)
            .returning(|_| ());

        let uow = TestUnitOfWork::default()
            .with_properties(properties)
            .with_units(units)
            .with_users(users)
            .with_leases(leases);
        let lease = LeaseManager::new(Arc::new(uow), Arc::new(notifier))
            .create(
                Actor::new(landlord, UserRole::Landlord),
                new_lease(unit.id, tenant_id, true),
            )
            .await
            .unwrap();
        assert_eq!(lease.status, LeaseStatus::PendingSignature);
    }

    #[tokio::test]
    async fn test_second_blocking_lease_conflicts() {
        let landlord = Uuid::new_v4();
        let (property, unit) = fixture(landlord);
        let tenant = tenant_user();
        let tenant_id = tenant.id;
        let (properties, units) = location(&property, &unit);

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(tenant.clone())));
        let mut leases = MockLeaseRepository::new();
        leases.expect_count_blocking_for_units().returning(|_| Ok(1));
        leases.expect_create().never();

        let uow = TestUnitOfWork::default()
            .with_properties(properties)
            .with_units(units)
            .with_users(users)
            .with_leases(leases);
        let result = LeaseManager::new(Arc::new(uow), Arc::new(MockNotifier::new()))
            .create(
                Actor::new(landlord, UserRole::Landlord),
                new_lease(unit.id, tenant_id, false),
            )
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_lease_for_landlord_account_is_rejected() {
        let landlord = Uuid::new_v4();
        let (property, unit) = fixture(landlord);
        let (properties, units) = location(&property, &unit);
        let mut other_landlord = tenant_user();
        other_landlord.role = UserRole::Landlord;
        let other_id = other_landlord.id;

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(other_landlord.clone())));

        let uow = TestUnitOfWork::default()
            .with_properties(properties)
            .with_units(units)
            .with_users(users);
        let result = LeaseManager::new(Arc::new(uow), Arc::new(MockNotifier::new()))
            .create(
                Actor::new(landlord, UserRole::Landlord),
                new_lease(unit.id, other_id, false),
            )
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_sign_occupies_unit_and_notifies_landlord() {
        let landlord = Uuid::new_v4();
        let (property, unit) = fixture(landlord);
        let tenant_id = Uuid::new_v4();
        let lease = Lease::new(&new_lease(unit.id, tenant_id, true));
        let lease_id = lease.id;
        let (properties, units) = location(&property, &unit);

        let mut leases = MockLeaseRepository::new();
        leases
            .expect_find_by_id()
            .with(eq(lease_id))
            .returning(move |_| Ok(Some(lease.clone())));
        leases
            .expect_update()
            .withf(|lease, status| {
                lease.status == LeaseStatus::Active && *status == Some(UnitStatus::Occupied)
            })
            .times(1)
            .returning(|lease, _| Ok(lease));
        let mut notifier = MockNotifier::new();
        notifier
            .expect_dispatch()
            .withf(move |n| n.recipient == landlord && n.kind == NotificationKind::LeaseSigned)
            .times(1)
            .returning(|_| ());

        let uow = TestUnitOfWork::default()
            .with_properties(properties)
            .with_units(units)
            .with_leases(leases);
        let lease = LeaseManager::new(Arc::new(uow), Arc::new(notifier))
            .sign(
                Actor::new(tenant_id, UserRole::Tenant),
                lease_id,
                SignLease {
                    signature: "Jordan Lee".to_string(),
                },
            )
            .await
            .unwrap();
        assert!(lease.signed_at.is_some());
    }

    #[tokio::test]
    async fn test_terminating_draft_keeps_unit_of_active_lease() {
        let landlord = Uuid::new_v4();
        let (property, unit) = fixture(landlord);
        let draft = Lease::new(&new_lease(unit.id, Uuid::new_v4(), false));
        let draft_id = draft.id;
        let (properties, units) = location(&property, &unit);

        let mut leases = MockLeaseRepository::new();
        leases
            .expect_find_by_id()
            .with(eq(draft_id))
            .returning(move |_| Ok(Some(draft.clone())));
        leases.expect_count_blocking_for_units().returning(|_| Ok(1));
        leases
            .expect_update()
            .withf(|lease, status| lease.status == LeaseStatus::Terminated && status.is_none())
            .times(1)
            .returning(|lease, _| Ok(lease));
        let mut notifier = MockNotifier::new();
        notifier.expect_dispatch().returning(|_| ());

        let uow = TestUnitOfWork::default()
            .with_properties(properties)
            .with_units(units)
            .with_leases(leases);
        let lease = LeaseManager::new(Arc::new(uow), Arc::new(notifier))
            .update(
                Actor::new(landlord, UserRole::Landlord),
                draft_id,
                LeaseChanges {
                    status: Some(LeaseStatus::Terminated),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(lease.status, LeaseStatus::Terminated);
    }

    #[tokio::test]
    async fn test_sending_draft_for_signature_on_held_unit_conflicts() {
        let landlord = Uuid::new_v4();
        let (property, unit) = fixture(landlord);
        let draft = Lease::new(&new_lease(unit.id, Uuid::new_v4(), false));
        let draft_id = draft.id;
        let unit_id = unit.id;
        let (properties, units) = location(&property, &unit);

        let mut leases = MockLeaseRepository::new();
        leases
            .expect_find_by_id()
            .returning(move |_| Ok(Some(draft.clone())));
        leases
            .expect_count_blocking_for_units()
            .withf(move |ids| ids == &vec![unit_id])
            .times(1)
            .returning(|_| Ok(1));
        leases.expect_update().never();

        let uow = TestUnitOfWork::default()
            .with_properties(properties)
            .with_units(units)
            .with_leases(leases);
        let result = LeaseManager::new(Arc::new(uow), Arc::new(MockNotifier::new()))
            .update(
                Actor::new(landlord, UserRole::Landlord),
                draft_id,
                LeaseChanges {
                    status: Some(LeaseStatus::PendingSignature),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_other_tenant_cannot_read_lease() {
        let lease = Lease::new(&new_lease(Uuid::new_v4(), Uuid::new_v4(), false));
        let lease_id = lease.id;
        let mut leases = MockLeaseRepository::new();
        leases
            .expect_find_by_id()
            .returning(move |_| Ok(Some(lease.clone())));

        let uow = TestUnitOfWork::default().with_leases(leases);
        let result = LeaseManager::new(Arc::new(uow), Arc::new(MockNotifier::new()))
            .get_for_tenant(Actor::new(Uuid::new_v4(), UserRole::Tenant), lease_id)
            .await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }
}
