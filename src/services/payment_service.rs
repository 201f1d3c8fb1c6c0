//! Rent payments: tenant checkout, landlord records and refunds, and
//! reconciliation of gateway outcomes.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use super::notifier::{Notice, Notifier};
use super::scope::{owned_lease, scoped_units, unit_and_property};
use crate::domain::{
    Actor, GatewayEvent, NewManualPayment, NewPayment, NotificationKind, Payment, PaymentCheckout,
    PaymentFilter, PaymentMethod, PaymentStatus, UserRole,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{PaymentGateway, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PaymentService: Send + Sync {
    /// Start a gateway charge against one of the tenant's leases.
    async fn initiate(&self, actor: Actor, input: NewPayment) -> AppResult<PaymentCheckout>;

    async fn list_for_tenant(&self, actor: Actor) -> AppResult<Vec<Payment>>;

    async fn get_for_tenant(&self, actor: Actor, id: Uuid) -> AppResult<Payment>;

    async fn list_for_landlord(&self, actor: Actor, filter: PaymentFilter)
        -> AppResult<Vec<Payment>>;

    async fn record_manual(&self, actor: Actor, input: NewManualPayment) -> AppResult<Payment>;

    async fn refund(&self, actor: Actor, id: Uuid) -> AppResult<Payment>;

    /// Apply an asynchronous gateway outcome. Late or repeated events for a
    /// settled payment leave it unchanged.
    async fn reconcile(&self, event: GatewayEvent) -> AppResult<Payment>;
}

pub struct PaymentManager<U: UnitOfWork> {
    uow: Arc<U>,
    gateway: Arc<dyn PaymentGateway>,
    notifier: Arc<dyn Notifier>,
    currency: String,
}

impl<U: UnitOfWork> PaymentManager<U> {
    pub fn new(
        uow: Arc<U>,
        gateway: Arc<dyn PaymentGateway>,
        notifier: Arc<dyn Notifier>,
        currency: String,
    ) -> Self {
        Self {
            uow,
            gateway,
            notifier,
            currency,
        }
    }

    async fn notify_tenant(&self, payment: &Payment, kind: NotificationKind, title: &str, message: String) {
        let notice = Notice::new(payment.tenant_id, kind, title, message)
            .link(format!("/tenant/payments/{}", payment.id));
        self.notifier.dispatch(notice).await;
    }

    async fn notify_landlord(&self, payment: &Payment, kind: NotificationKind, title: &str, message: String) {
        let landlord = match self.landlord_of(payment).await {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!(payment_id = %payment.id, error = %e, "Landlord lookup failed");
                return;
            }
        };
        let notice = Notice::new(landlord, kind, title, message).in_app_only();
        self.notifier.dispatch(notice).await;
    }

    async fn landlord_of(&self, payment: &Payment) -> AppResult<Uuid> {
        let lease = self
            .uow
            .leases()
            .find_by_id(payment.lease_id)
            .await?
            .ok_or_else(|| AppError::internal(format!("Payment {} has no lease", payment.id)))?;
        let (_, property) = unit_and_property(self.uow.as_ref(), lease.unit_id).await?;
        Ok(property.landlord_id)
    }
}

fn dollars(cents: i64) -> String {
    format!("${}.{:02}", cents / 100, (cents % 100).abs())
}

#[async_trait]
impl<U: UnitOfWork> PaymentService for PaymentManager<U> {
    async fn initiate(&self, actor: Actor, input: NewPayment) -> AppResult<PaymentCheckout> {
        let lease = self
            .uow
            .leases()
            .find_by_id(input.lease_id)
            .await?
            .ok_or_not_found()?;
        actor.ensure_tenant_of(lease.tenant_id)?;
        if !lease.status.is_blocking() {
            return Err(AppError::validation(format!(
                "Cannot pay against a lease that is {}",
                lease.status
            )));
        }

        let mut payment = Payment::pending(actor.id, &input);
        let intent = self
            .gateway
            .create_intent(payment.id, payment.amount_cents, &self.currency)
            .await?;
        payment.gateway_intent_id = Some(intent.id);

        let payment = self.uow.payments().create(payment).await?;
        tracing::info!(payment_id = %payment.id, lease_id = %lease.id, amount_cents = payment.amount_cents, "Payment initiated");
        Ok(PaymentCheckout {
            payment,
            client_secret: intent.client_secret,
        })
    }

    async fn list_for_tenant(&self, actor: Actor) -> AppResult<Vec<Payment>> {
        actor.ensure_role(UserRole::Tenant)?;
        self.uow.payments().list_by_tenant(actor.id).await
    }

    async fn get_for_tenant(&self, actor: Actor, id: Uuid) -> AppResult<Payment> {
        let payment = self.uow.payments().find_by_id(id).await?.ok_or_not_found()?;
        actor.ensure_tenant_of(payment.tenant_id)?;
        Ok(payment)
    }

    async fn list_for_landlord(
        &self,
        actor: Actor,
        filter: PaymentFilter,
    ) -> AppResult<Vec<Payment>> {
        let unit_ids = scoped_units(self.uow.as_ref(), &actor)
            .await?
            .into_iter()
            .map(|u| u.id)
            .collect();
        let lease_ids = self
            .uow
            .leases()
            .list_by_units(unit_ids)
            .await?
            .into_iter()
            .map(|l| l.id)
            .collect();
        let payments = self.uow.payments().list_by_leases(lease_ids).await?;
        Ok(payments.into_iter().filter(|p| filter.matches(p)).collect())
    }

    async fn record_manual(&self, actor: Actor, input: NewManualPayment) -> AppResult<Payment> {
        if input.method == PaymentMethod::Card {
            return Err(AppError::validation(
                "Card payments must go through checkout",
            ));
        }
        let (lease, _) = owned_lease(self.uow.as_ref(), &actor, input.lease_id).await?;

        let payment = self
            .uow
            .payments()
            .create(Payment::recorded(lease.tenant_id, &input))
            .await?;
        tracing::info!(payment_id = %payment.id, method = %payment.method, "Manual payment recorded");
        self.notify_tenant(
            &payment,
            NotificationKind::PaymentReceived,
            "Payment received",
            format!("A payment of {} was recorded", dollars(payment.amount_cents)),
        )
        .await;
        Ok(payment)
    }

    async fn refund(&self, actor: Actor, id: Uuid) -> AppResult<Payment> {
        let mut payment = self.uow.payments().find_by_id(id).await?.ok_or_not_found()?;
        owned_lease(self.uow.as_ref(), &actor, payment.lease_id).await?;

        if payment.status != PaymentStatus::Completed {
            return Err(AppError::validation("Only completed payments can be refunded"));
        }
        if let Some(intent_id) = &payment.gateway_intent_id {
            let refund_id = self.gateway.refund(intent_id, payment.amount_cents).await?;
            payment.gateway_refund_id = Some(refund_id);
        }
        payment.status = PaymentStatus::Refunded;
        payment.updated_at = Utc::now();

        let payment = self.uow.payments().update(payment).await?;
        tracing::info!(payment_id = %payment.id, "Payment refunded");
        self.notify_tenant(
            &payment,
            NotificationKind::PaymentRefunded,
            "Payment refunded",
            format!("Your payment of {} was refunded", dollars(payment.amount_cents)),
        )
        .await;
        Ok(payment)
    }

    async fn reconcile(&self, event: GatewayEvent) -> AppResult<Payment> {
        let mut payment = self
            .uow
            .payments()
            .find_by_intent(&event.intent_id)
            .await?
            .ok_or_not_found()?;

        if !payment.apply_outcome(event.outcome, event.failure_reason, Utc::now()) {
            tracing::debug!(payment_id = %payment.id, outcome = %event.outcome, "Gateway event ignored");
            return Ok(payment);
        }

        let payment = self.uow.payments().update(payment).await?;
        tracing::info!(payment_id = %payment.id, status = %payment.status, "Payment reconciled");

        let amount = dollars(payment.amount_cents);
        match payment.status {
            PaymentStatus::Completed => {
                self.notify_tenant(
                    &payment,
                    NotificationKind::PaymentReceived,
                    "Payment received",
                    format!("Your payment of {} was received", amount),
                )
                .await;
                self.notify_landlord(
                    &payment,
                    NotificationKind::PaymentReceived,
                    "Payment received",
                    format!("A rent payment of {} was received", amount),
                )
                .await;
            }
            PaymentStatus::Failed => {
                let reason = payment.failure_reason.clone().unwrap_or_default();
                self.notify_tenant(
                    &payment,
                    NotificationKind::PaymentFailed,
                    "Payment failed",
                    format!("Your payment of {} failed: {}", amount, reason),
                )
                .await;
                self.notify_landlord(
                    &payment,
                    NotificationKind::PaymentFailed,
                    "Payment failed",
                    format!("A rent payment of {} failed", amount),
                )
                .await;
            }
            _ => {}
        }
        Ok(payment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GatewayOutcome, Lease, LeaseStatus, NewLease, PaymentType};
    use crate::infra::repositories::{MockLeaseRepository, MockPaymentRepository};
    use crate::infra::{ChargeIntent, MockPaymentGateway};
    use crate::services::notifier::MockNotifier;
    use crate::services::testing::TestUnitOfWork;
    use chrono::NaiveDate;

    fn lease(tenant_id: Uuid, status: LeaseStatus) -> Lease {
        let mut lease = Lease::new(&NewLease {
            unit_id: Uuid::new_v4(),
            tenant_id,
            start_date: NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2030, 12, 31).unwrap(),
            rent_cents: 150_000,
            deposit_cents: 150_000,
            terms: None,
            send_for_signature: false,
        });
        lease.status = status;
        lease
    }

    fn new_payment(lease_id: Uuid) -> NewPayment {
        NewPayment {
            lease_id,
            amount_cents: 150_000,
            payment_type: PaymentType::Rent,
            method: None,
            due_date: None,
        }
    }

    fn service(
        uow: TestUnitOfWork,
        gateway: MockPaymentGateway,
        notifier: MockNotifier,
    ) -> PaymentManager<TestUnitOfWork> {
        PaymentManager::new(
            Arc::new(uow),
            Arc::new(gateway),
            Arc::new(notifier),
            "usd".to_string(),
        )
    }

    #[tokio::test]
    async fn test_initiate_creates_pending_payment_with_intent() {
        let tenant_id = Uuid::new_v4();
        let lease = lease(tenant_id, LeaseStatus::Active);
        let lease_id = lease.id;

        let mut leases = MockLeaseRepository::new();
        leases
            .expect_find_by_id()
            .returning(move |_| Ok(Some(lease.clone())));
        let mut payments = MockPaymentRepository::new();
        payments
            .expect_create()
            .withf(|p| {
                p.status == PaymentStatus::Pending
                    && p.gateway_intent_id.as_deref() == Some("pi_test")
            })
            .times(1)
            .returning(|p| Ok(p));
        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_create_intent()
            .withf(|_, amount, currency| *amount == 150_000 && currency == "usd")
            .returning(|_, _, _| {
                Ok(ChargeIntent {
                    id: "pi_test".to_string(),
                    client_secret: "pi_test_secret".to_string(),
                })
            });

        let uow = TestUnitOfWork::default()
            .with_leases(leases)
            .with_payments(payments);
        let checkout = service(uow, gateway, MockNotifier::new())
            .initiate(Actor::new(tenant_id, UserRole::Tenant), new_payment(lease_id))
            .await
            .unwrap();
        assert_eq!(checkout.client_secret, "pi_test_secret");
        assert_eq!(checkout.payment.method, PaymentMethod::Card);
    }

    #[tokio::test]
    async fn test_initiate_on_someone_elses_lease_is_forbidden() {
        let lease = lease(Uuid::new_v4(), LeaseStatus::Active);
        let lease_id = lease.id;
        let mut leases = MockLeaseRepository::new();
        leases
            .expect_find_by_id()
            .returning(move |_| Ok(Some(lease.clone())));
        let mut gateway = MockPaymentGateway::new();
        gateway.expect_create_intent().never();

        let uow = TestUnitOfWork::default().with_leases(leases);
        let result = service(uow, gateway, MockNotifier::new())
            .initiate(Actor::new(Uuid::new_v4(), UserRole::Tenant), new_payment(lease_id))
            .await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_initiate_on_ended_lease_is_rejected() {
        let tenant_id = Uuid::new_v4();
        let lease = lease(tenant_id, LeaseStatus::Terminated);
        let lease_id = lease.id;
        let mut leases = MockLeaseRepository::new();
        leases
            .expect_find_by_id()
            .returning(move |_| Ok(Some(lease.clone())));

        let uow = TestUnitOfWork::default().with_leases(leases);
        let result = service(uow, MockPaymentGateway::new(), MockNotifier::new())
            .initiate(Actor::new(tenant_id, UserRole::Tenant), new_payment(lease_id))
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_reconcile_ignores_events_for_settled_payment() {
        let mut payment = Payment::pending(Uuid::new_v4(), &new_payment(Uuid::new_v4()));
        payment.status = PaymentStatus::Completed;
        payment.gateway_intent_id = Some("pi_done".to_string());

        let mut payments = MockPaymentRepository::new();
        payments
            .expect_find_by_intent()
            .withf(|id| id == "pi_done")
            .returning(move |_| Ok(Some(payment.clone())));
        payments.expect_update().never();

        let uow = TestUnitOfWork::default().with_payments(payments);
        let payment = service(uow, MockPaymentGateway::new(), MockNotifier::new())
            .reconcile(GatewayEvent {
                intent_id: "pi_done".to_string(),
                outcome: GatewayOutcome::Failed,
                failure_reason: None,
            })
            .await
            .unwrap();
        assert_eq!(payment.status, PaymentStatus::Completed);
    }

    #[tokio::test]
    async fn test_reconcile_processing_updates_without_notice() {
        let payment = Payment::pending(Uuid::new_v4(), &new_payment(Uuid::new_v4()));
        let mut payments = MockPaymentRepository::new();
        payments
            .expect_find_by_intent()
            .returning(move |_| Ok(Some(payment.clone())));
        payments
            .expect_update()
            .withf(|p| p.status == PaymentStatus::Processing)
            .times(1)
            .returning(|p| Ok(p));
        let mut notifier = MockNotifier::new();
        notifier.expect_dispatch().never();

        let uow = TestUnitOfWork::default().with_payments(payments);
        service(uow, MockPaymentGateway::new(), notifier)
            .reconcile(GatewayEvent {
                intent_id: "pi_1".to_string(),
                outcome: GatewayOutcome::Processing,
                failure_reason: None,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_unknown_intent_is_not_found() {
        let mut payments = MockPaymentRepository::new();
        payments.expect_find_by_intent().returning(|_| Ok(None));

        let uow = TestUnitOfWork::default().with_payments(payments);
        let result = service(uow, MockPaymentGateway::new(), MockNotifier::new())
            .reconcile(GatewayEvent {
                intent_id: "pi_missing".to_string(),
                outcome: GatewayOutcome::Succeeded,
                failure_reason: None,
            })
            .await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[test]
    fn test_dollars_formatting() {
        assert_eq!(dollars(185_005), "$1850.05");
        assert_eq!(dollars(99), "$0.99");
    }
}
