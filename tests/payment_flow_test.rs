//! Rent payment flow across the payment service, the sandbox gateway and
//! the notification dispatcher, over mock repositories.
//!
//! Run with `cargo test --features test-utils`.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use mockall::predicate::eq;
use uuid::Uuid;

use leasedesk::domain::{
    Actor, GatewayEvent, GatewayOutcome, Lease, NewLease, NewPayment, NewProperty, NewUnit,
    NotificationKind, Payment, PaymentStatus, PaymentType, Property, PropertyType, Unit, User,
    UserRole,
};
use leasedesk::errors::{AppError, AppResult};
use leasedesk::infra::repositories::{
    MockLeaseRepository, MockMaintenanceRepository, MockNotificationRepository,
    MockPaymentRepository, MockPropertyRepository, MockUnitRepository, MockUserRepository,
};
use leasedesk::infra::{
    LeaseRepository, MaintenanceRepository, MockChatSender, NotificationRepository,
    PaymentRepository, PropertyRepository, SandboxGateway, TransactionContext, UnitOfWork,
    UnitRepository, UserRepository,
};
use leasedesk::jobs::MockMailer;
use leasedesk::services::{NotificationDispatcher, PaymentManager, PaymentService};

/// Unit of work over mock repositories; transactions are not supported.
#[derive(Default)]
struct TestUnitOfWork {
    users: Arc<MockUserRepository>,
    properties: Arc<MockPropertyRepository>,
    units: Arc<MockUnitRepository>,
    leases: Arc<MockLeaseRepository>,
    payments: Arc<MockPaymentRepository>,
    maintenance: Arc<MockMaintenanceRepository>,
    notifications: Arc<MockNotificationRepository>,
}

#[async_trait]
impl UnitOfWork for TestUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn properties(&self) -> Arc<dyn PropertyRepository> {
        self.properties.clone()
    }

    fn units(&self) -> Arc<dyn UnitRepository> {
        self.units.clone()
    }

    fn leases(&self) -> Arc<dyn LeaseRepository> {
        self.leases.clone()
    }

    fn payments(&self) -> Arc<dyn PaymentRepository> {
        self.payments.clone()
    }

    fn maintenance(&self) -> Arc<dyn MaintenanceRepository> {
        self.maintenance.clone()
    }

    fn notifications(&self) -> Arc<dyn NotificationRepository> {
        self.notifications.clone()
    }

    async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        Err(AppError::internal("Transactions not supported in test mock"))
    }
}

struct Tenancy {
    landlord: User,
    tenant: User,
    property: Property,
    unit: Unit,
    lease: Lease,
}

fn tenancy() -> Tenancy {
    let landlord = User::new(
        "owner@example.com".to_string(),
        "hash".to_string(),
        "Olive Owner".to_string(),
        UserRole::Landlord,
    );
    let tenant = User::new(
        "tenant@example.com".to_string(),
        "hash".to_string(),
        "Jordan Lee".to_string(),
        UserRole::Tenant,
    );
    let property = Property::new(
        landlord.id,
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
            unit_number: "2B".to_string(),
            bedrooms: 2,
            bathrooms: 1.0,
            square_feet: None,
            rent_cents: 185_000,
            deposit_cents: 185_000,
            status: None,
        },
    );
    let lease = Lease::new(&NewLease {
        unit_id: unit.id,
        tenant_id: tenant.id,
        start_date: NaiveDate::from_ymd_opt(2031, 1, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2031, 12, 31).unwrap(),
        rent_cents: 185_000,
        deposit_cents: 185_000,
        terms: None,
        send_for_signature: true,
    });
    Tenancy {
        landlord,
        tenant,
        property,
        unit,
        lease,
    }
}

fn rent(lease_id: Uuid) -> NewPayment {
    NewPayment {
        lease_id,
        amount_cents: 185_000,
        payment_type: PaymentType::Rent,
        method: None,
        due_date: None,
    }
}

fn manager(uow: TestUnitOfWork, mailer: MockMailer) -> PaymentManager<TestUnitOfWork> {
    let uow = Arc::new(uow);
    let notifier = Arc::new(NotificationDispatcher::new(
        uow.clone(),
        Arc::new(mailer),
        Arc::new(MockChatSender::new()),
        "#maintenance".to_string(),
        "https://app.example.com".to_string(),
    ));
    PaymentManager::new(uow, Arc::new(SandboxGateway::new()), notifier, "usd".to_string())
}

#[tokio::test]
async fn test_checkout_stores_gateway_intent() {
    let t = tenancy();

    let mut leases = MockLeaseRepository::new();
    let lease = t.lease.clone();
    leases
        .expect_find_by_id()
        .with(eq(t.lease.id))
        .returning(move |_| Ok(Some(lease.clone())));

    let mut payments = MockPaymentRepository::new();
    payments
        .expect_create()
        .withf(|p| p.status == PaymentStatus::Pending && p.gateway_intent_id.is_some())
        .times(1)
        .returning(Ok);

    let uow = TestUnitOfWork {
        leases: Arc::new(leases),
        payments: Arc::new(payments),
        ..Default::default()
    };
    let checkout = manager(uow, MockMailer::new())
        .initiate(Actor::new(t.tenant.id, UserRole::Tenant), rent(t.lease.id))
        .await
        .unwrap();

    let intent = checkout.payment.gateway_intent_id.clone().unwrap();
    assert!(checkout.client_secret.starts_with(&intent));
    assert_eq!(checkout.payment.tenant_id, t.tenant.id);
}

#[tokio::test]
async fn test_other_tenant_cannot_pay_against_lease() {
    let t = tenancy();

    let mut leases = MockLeaseRepository::new();
    let lease = t.lease.clone();
    leases
        .expect_find_by_id()
        .returning(move |_| Ok(Some(lease.clone())));

    let uow = TestUnitOfWork {
        leases: Arc::new(leases),
        ..Default::default()
    };
    let result = manager(uow, MockMailer::new())
        .initiate(Actor::new(Uuid::new_v4(), UserRole::Tenant), rent(t.lease.id))
        .await;

    assert!(matches!(result, Err(AppError::Forbidden)));
}

#[tokio::test]
async fn test_successful_charge_notifies_both_parties() {
    let t = tenancy();
    let mut pending = Payment::pending(t.tenant.id, &rent(t.lease.id));
    pending.gateway_intent_id = Some("pi_42".to_string());

    let mut payments = MockPaymentRepository::new();
    payments
        .expect_find_by_intent()
        .withf(|intent| intent == "pi_42")
        .returning(move |_| Ok(Some(pending.clone())));
    payments
        .expect_update()
        .withf(|p| p.status == PaymentStatus::Completed && p.paid_at.is_some())
        .times(1)
        .returning(Ok);

    let mut leases = MockLeaseRepository::new();
    let lease = t.lease.clone();
    leases
        .expect_find_by_id()
        .returning(move |_| Ok(Some(lease.clone())));
    let mut units = MockUnitRepository::new();
    let unit = t.unit.clone();
    units
        .expect_find_by_id()
        .returning(move |_| Ok(Some(unit.clone())));
    let mut properties = MockPropertyRepository::new();
    let property = t.property.clone();
    properties
        .expect_find_by_id()
        .returning(move |_| Ok(Some(property.clone())));

    let mut users = MockUserRepository::new();
    let tenant = t.tenant.clone();
    users
        .expect_find_by_id()
        .with(eq(t.tenant.id))
        .returning(move |_| Ok(Some(tenant.clone())));

    let (tenant_id, landlord_id) = (t.tenant.id, t.landlord.id);
    let mut notifications = MockNotificationRepository::new();
    notifications
        .expect_create()
        .withf(move |n| {
            n.kind == NotificationKind::PaymentReceived
                && (n.user_id == tenant_id || n.user_id == landlord_id)
        })
        .times(2)
        .returning(Ok);

    // Landlord notice is in-app only; one email to the tenant.
    let mut mailer = MockMailer::new();
    mailer
        .expect_send()
        .withf(|job| job.to == "tenant@example.com" && job.body.contains("$1850.00"))
        .times(1)
        .returning(|_| Ok(()));

    let uow = TestUnitOfWork {
        users: Arc::new(users),
        properties: Arc::new(properties),
        units: Arc::new(units),
        leases: Arc::new(leases),
        payments: Arc::new(payments),
        notifications: Arc::new(notifications),
        ..Default::default()
    };
    let payment = manager(uow, mailer)
        .reconcile(GatewayEvent {
            intent_id: "pi_42".to_string(),
            outcome: GatewayOutcome::Succeeded,
            failure_reason: None,
        })
        .await
        .unwrap();

    assert_eq!(payment.status, PaymentStatus::Completed);
}

#[tokio::test]
async fn test_replayed_event_leaves_settled_payment_alone() {
    let t = tenancy();
    let mut settled = Payment::pending(t.tenant.id, &rent(t.lease.id));
    settled.gateway_intent_id = Some("pi_42".to_string());
    settled.status = PaymentStatus::Completed;

    let mut payments = MockPaymentRepository::new();
    payments
        .expect_find_by_intent()
        .returning(move |_| Ok(Some(settled.clone())));
    payments.expect_update().never();

    let uow = TestUnitOfWork {
        payments: Arc::new(payments),
        ..Default::default()
    };
    let payment = manager(uow, MockMailer::new())
        .reconcile(GatewayEvent {
            intent_id: "pi_42".to_string(),
            outcome: GatewayOutcome::Failed,
            failure_reason: Some("card_declined".to_string()),
        })
        .await
        .unwrap();

    assert_eq!(payment.status, PaymentStatus::Completed);
    assert!(payment.failure_reason.is_none());
}

#[tokio::test]
async fn test_unknown_intent_is_not_found() {
    let mut payments = MockPaymentRepository::new();
    payments.expect_find_by_intent().returning(|_| Ok(None));

    let uow = TestUnitOfWork {
        payments: Arc::new(payments),
        ..Default::default()
    };
    let result = manager(uow, MockMailer::new())
        .reconcile(GatewayEvent {
            intent_id: "pi_missing".to_string(),
            outcome: GatewayOutcome::Succeeded,
            failure_reason: None,
        })
        .await;

    assert!(matches!(result, Err(AppError::NotFound)));
}
