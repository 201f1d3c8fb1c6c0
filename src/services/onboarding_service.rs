//! Tenant onboarding.
//!
//! Profile update, lease creation, unit reservation and the audit row are
//! written in one transaction. The reservation is a conditional
//! `VACANT -> RESERVED` update, so two tenants racing for the same unit
//! cannot both succeed.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;

use super::notifier::{Notice, Notifier};
use super::scope::property_of;
use crate::domain::{
    Actor, AuditEntry, AvailableUnit, Lease, NewLease, NotificationKind, OnboardingReceipt,
    OnboardingSubmission, SensitiveValue, UserRole,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::with_transaction;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

const AUDIT_ONBOARDING_SUBMITTED: &str = "ONBOARDING_SUBMITTED";

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait OnboardingService: Send + Sync {
    /// Vacant units open for application
    async fn available_units(&self) -> AppResult<Vec<AvailableUnit>>;

    async fn submit(&self, actor: Actor, input: OnboardingSubmission)
        -> AppResult<OnboardingReceipt>;
}

pub struct OnboardingManager<U: UnitOfWork> {
    uow: Arc<U>,
    notifier: Arc<dyn Notifier>,
}

impl<U: UnitOfWork> OnboardingManager<U> {
    pub fn new(uow: Arc<U>, notifier: Arc<dyn Notifier>) -> Self {
        Self { uow, notifier }
    }
}

#[async_trait]
impl<U: UnitOfWork> OnboardingService for OnboardingManager<U> {
    async fn available_units(&self) -> AppResult<Vec<AvailableUnit>> {
        self.uow.units().list_vacant().await
    }

    async fn submit(
        &self,
        actor: Actor,
        input: OnboardingSubmission,
    ) -> AppResult<OnboardingReceipt> {
        actor.ensure_role(UserRole::Tenant)?;
        let now = Utc::now();
        input.check_dates(now.date_naive())?;
        let end_date = input.unit_selection.end_date()?;

        let mut user = self
            .uow
            .users()
            .find_by_id(actor.id)
            .await?
            .ok_or_not_found()?;
        if user.profile.onboarding_completed {
            return Err(AppError::conflict("Onboarding already completed"));
        }

        let unit = self
            .uow
            .units()
            .find_by_id(input.unit_selection.unit_id)
            .await?
            .ok_or_not_found()?;
        if !unit.is_vacant() {
            return Err(AppError::conflict("Unit is no longer available"));
        }

        let (ssn_hash, last_four) = SensitiveValue::protect(&input.personal.ssn)?.into_parts();
        user.profile = input.profile(last_four);
        user.ssn_hash = Some(ssn_hash);
        user.updated_at = now;

        let lease = Lease::new(&NewLease {
            unit_id: unit.id,
            tenant_id: actor.id,
            start_date: input.unit_selection.move_in_date,
            end_date,
            rent_cents: unit.rent_cents,
            deposit_cents: unit.deposit_cents,
            terms: None,
            send_for_signature: true,
        });
        let audit = AuditEntry::new(
            actor.id,
            AUDIT_ONBOARDING_SUBMITTED,
            "lease",
            lease.id,
            json!({
                "unit_id": unit.id,
                "move_in_date": input.unit_selection.move_in_date,
                "lease_term_months": input.unit_selection.lease_term_months,
            }),
        );

        let unit_id = unit.id;
        let (lease, user) = with_transaction!(self.uow, |ctx| {
            ctx.reserve_unit(unit_id).await?;
            let user = ctx.save_user(&user).await?;
            let lease = ctx.insert_lease(&lease).await?;
            ctx.record_audit(&audit).await?;
            Ok((lease, user))
        })?;

        tracing::info!(
            tenant_id = %actor.id,
            unit_id = %lease.unit_id,
            lease_id = %lease.id,
            "Onboarding submitted"
        );

        match property_of(self.uow.as_ref(), &unit).await {
            Ok(property) => {
                let notice = Notice::new(
                    property.landlord_id,
                    NotificationKind::OnboardingSubmitted,
                    "New tenant application",
                    format!(
                        "{} applied for {} unit {}",
                        user.name, property.name, unit.unit_number
                    ),
                )
                .link(format!("/landlord/leases/{}", lease.id));
                self.notifier.dispatch(notice).await;
            }
            Err(e) => tracing::warn!(unit_id = %unit.id, error = %e, "Landlord lookup failed"),
        }

        Ok(OnboardingReceipt {
            lease,
            profile: user.profile,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        EmergencyContact, Employment, NewUnit, PersonalDetails, Unit, UnitSelection, UnitStatus,
        User,
    };
    use crate::infra::repositories::{MockUnitRepository, MockUserRepository};
    use crate::services::notifier::MockNotifier;
    use crate::services::testing::TestUnitOfWork;
    use chrono::{Duration, NaiveDate};
    use uuid::Uuid;

    fn unit(status: UnitStatus) -> Unit {
        let mut unit = Unit::new(
            Uuid::new_v4(),
            NewUnit {
                unit_number: "5E".to_string(),
                bedrooms: 1,
                bathrooms: 1.0,
                square_feet: None,
                rent_cents: 110_000,
                deposit_cents: 110_000,
                status: None,
            },
        );
        unit.status = status;
        unit
    }

    fn tenant() -> User {
        User::new(
            "tenant@example.com".to_string(),
            "hash".to_string(),
            "Jordan Lee".to_string(),
            UserRole::Tenant,
        )
    }

    fn submission(unit_id: Uuid) -> OnboardingSubmission {
        OnboardingSubmission {
            personal: PersonalDetails {
                phone: "555-010-2030".to_string(),
                date_of_birth: NaiveDate::from_ymd_opt(1990, 4, 12).unwrap(),
                ssn: "123-45-6789".to_string(),
            },
            emergency_contact: EmergencyContact {
                name: "Sam Lee".to_string(),
                phone: "555-010-9999".to_string(),
                relationship: "Sibling".to_string(),
            },
            employment: Employment {
                employer: "Acme".to_string(),
                job_title: "Engineer".to_string(),
                monthly_income_cents: 600_000,
            },
            unit_selection: UnitSelection {
                unit_id,
                move_in_date: Utc::now().date_naive() + Duration::days(30),
                lease_term_months: 12,
            },
        }
    }

    fn world(user: User, unit: Unit) -> TestUnitOfWork {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        let mut units = MockUnitRepository::new();
        units
            .expect_find_by_id()
            .returning(move |_| Ok(Some(unit.clone())));
        TestUnitOfWork::default().with_users(users).with_units(units)
    }

    fn service(uow: TestUnitOfWork) -> OnboardingManager<TestUnitOfWork> {
        OnboardingManager::new(Arc::new(uow), Arc::new(MockNotifier::new()))
    }

    #[tokio::test]
    async fn test_landlord_cannot_onboard() {
        let result = service(TestUnitOfWork::default())
            .submit(
                Actor::new(Uuid::new_v4(), UserRole::Landlord),
                submission(Uuid::new_v4()),
            )
            .await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_second_onboarding_conflicts() {
        let mut user = tenant();
        user.profile.onboarding_completed = true;
        let actor = Actor::new(user.id, UserRole::Tenant);
        let unit = unit(UnitStatus::Vacant);
        let unit_id = unit.id;

        let result = service(world(user, unit))
            .submit(actor, submission(unit_id))
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_reserved_unit_conflicts() {
        let user = tenant();
        let actor = Actor::new(user.id, UserRole::Tenant);
        let unit = unit(UnitStatus::Reserved);
        let unit_id = unit.id;

        let result = service(world(user, unit))
            .submit(actor, submission(unit_id))
            .await;
        assert!(matches!(result, Err(AppError::Conflict(msg)) if msg == "Unit is no longer available"));
    }

    #[tokio::test]
    async fn test_past_move_in_is_rejected() {
        let user = tenant();
        let actor = Actor::new(user.id, UserRole::Tenant);
        let mut input = submission(Uuid::new_v4());
        input.unit_selection.move_in_date = Utc::now().date_naive() - Duration::days(1);

        let result = service(TestUnitOfWork::default()).submit(actor, input).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_valid_submission_runs_in_transaction() {
        let user = tenant();
        let actor = Actor::new(user.id, UserRole::Tenant);
        let unit = unit(UnitStatus::Vacant);
        let unit_id = unit.id;

        // The mock unit of work refuses transactions, so reaching it shows
        // every pre-check passed and no write happened outside it.
        let result = service(world(user, unit))
            .submit(actor, submission(unit_id))
            .await;
        assert!(matches!(result, Err(AppError::Internal(_))));
    }
}
