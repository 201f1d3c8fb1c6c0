//! Rent and fee payments.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

string_enum! {
    PaymentStatus {
        Pending => "PENDING",
        Processing => "PROCESSING",
        Completed => "COMPLETED",
        Failed => "FAILED",
        Refunded => "REFUNDED",
        Cancelled => "CANCELLED",
    }
}

impl PaymentStatus {
    /// Settled payments are not moved by gateway events.
    pub fn is_settled(&self) -> bool {
        matches!(
            self,
            PaymentStatus::Completed
                | PaymentStatus::Failed
                | PaymentStatus::Refunded
                | PaymentStatus::Cancelled
        )
    }
}

string_enum! {
    PaymentType {
        Rent => "RENT",
        SecurityDeposit => "SECURITY_DEPOSIT",
        LateFee => "LATE_FEE",
        Utility => "UTILITY",
        Other => "OTHER",
    }
}

string_enum! {
    PaymentMethod {
        Card => "CARD",
        BankTransfer => "BANK_TRANSFER",
        Cash => "CASH",
        Check => "CHECK",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Payment {
    pub id: Uuid,
    pub lease_id: Uuid,
    pub tenant_id: Uuid,
    pub amount_cents: i64,
    pub payment_type: PaymentType,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub due_date: Option<NaiveDate>,
    pub paid_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway_intent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway_refund_id: Option<String>,
    pub failure_reason: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    /// A tenant-initiated payment awaiting gateway confirmation.
    pub fn pending(tenant_id: Uuid, input: &NewPayment) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            lease_id: input.lease_id,
            tenant_id,
            amount_cents: input.amount_cents,
            payment_type: input.payment_type,
            method: input.method.unwrap_or(PaymentMethod::Card),
            status: PaymentStatus::Pending,
            due_date: input.due_date,
            paid_at: None,
            gateway_intent_id: None,
            gateway_refund_id: None,
            failure_reason: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// A payment received outside the gateway (cash, check).
    pub fn recorded(tenant_id: Uuid, input: &NewManualPayment) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            lease_id: input.lease_id,
            tenant_id,
            amount_cents: input.amount_cents,
            payment_type: input.payment_type,
            method: input.method,
            status: PaymentStatus::Completed,
            due_date: input.due_date,
            paid_at: Some(input.paid_at.unwrap_or(now)),
            gateway_intent_id: None,
            gateway_refund_id: None,
            failure_reason: None,
            notes: input.notes.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a gateway outcome. Returns false when the event is ignored
    /// because the payment already settled or nothing changes.
    pub fn apply_outcome(
        &mut self,
        outcome: GatewayOutcome,
        failure_reason: Option<String>,
        at: DateTime<Utc>,
    ) -> bool {
        if self.status.is_settled() {
            return false;
        }
        let next = match outcome {
            GatewayOutcome::Succeeded => PaymentStatus::Completed,
            GatewayOutcome::Processing => PaymentStatus::Processing,
            GatewayOutcome::Failed => PaymentStatus::Failed,
        };
        if next == self.status {
            return false;
        }
        self.status = next;
        match next {
            PaymentStatus::Completed => self.paid_at = Some(at),
            PaymentStatus::Failed => {
                self.failure_reason =
                    Some(failure_reason.unwrap_or_else(|| "Payment was declined".to_string()))
            }
            _ => {}
        }
        self.updated_at = at;
        true
    }
}

/// Tenant payment initiation payload
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewPayment {
    pub lease_id: Uuid,
    #[validate(range(min = 1, message = "Amount must be greater than zero"))]
    #[schema(example = 185000)]
    pub amount_cents: i64,
    pub payment_type: PaymentType,
    pub method: Option<PaymentMethod>,
    pub due_date: Option<NaiveDate>,
}

/// Landlord-recorded offline payment payload
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewManualPayment {
    pub lease_id: Uuid,
    #[validate(range(min = 1, message = "Amount must be greater than zero"))]
    pub amount_cents: i64,
    pub payment_type: PaymentType,
    pub method: PaymentMethod,
    pub due_date: Option<NaiveDate>,
    pub paid_at: Option<DateTime<Utc>>,
    #[validate(length(max = 1000, message = "Notes are too long"))]
    pub notes: Option<String>,
}

/// Payment plus the client secret the browser needs to confirm the charge
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaymentCheckout {
    pub payment: Payment,
    pub client_secret: String,
}

string_enum! {
    GatewayOutcome {
        Succeeded => "SUCCEEDED",
        Processing => "PROCESSING",
        Failed => "FAILED",
    }
}

/// Asynchronous charge outcome reported by the payment gateway
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct GatewayEvent {
    #[validate(length(min = 1, message = "Intent id is required"))]
    pub intent_id: String,
    pub outcome: GatewayOutcome,
    pub failure_reason: Option<String>,
}

/// Landlord list filter
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaymentFilter {
    pub status: Option<PaymentStatus>,
}

impl PaymentFilter {
    pub fn matches(&self, payment: &Payment) -> bool {
        self.status.map_or(true, |s| payment.status == s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending() -> Payment {
        Payment::pending(
            Uuid::new_v4(),
            &NewPayment {
                lease_id: Uuid::new_v4(),
                amount_cents: 185_000,
                payment_type: PaymentType::Rent,
                method: None,
                due_date: None,
            },
        )
    }

    #[test]
    fn test_pending_defaults_to_card() {
        let payment = pending();
        assert_eq!(payment.status, PaymentStatus::Pending);
        assert_eq!(payment.method, PaymentMethod::Card);
    }

    #[test]
    fn test_success_completes_and_stamps_paid_at() {
        let mut payment = pending();
        let now = Utc::now();
        assert!(payment.apply_outcome(GatewayOutcome::Succeeded, None, now));
        assert_eq!(payment.status, PaymentStatus::Completed);
        assert_eq!(payment.paid_at, Some(now));
    }

    #[test]
    fn test_settled_payment_ignores_late_events() {
        let mut payment = pending();
        payment.apply_outcome(GatewayOutcome::Succeeded, None, Utc::now());
        assert!(!payment.apply_outcome(GatewayOutcome::Failed, None, Utc::now()));
        assert_eq!(payment.status, PaymentStatus::Completed);
    }

    #[test]
    fn test_failure_records_reason() {
        let mut payment = pending();
        payment.apply_outcome(
            GatewayOutcome::Failed,
            Some("card_declined".to_string()),
            Utc::now(),
        );
        assert_eq!(payment.status, PaymentStatus::Failed);
        assert_eq!(payment.failure_reason.as_deref(), Some("card_declined"));
    }

    #[test]
    fn test_repeated_processing_event_is_noop() {
        let mut payment = pending();
        assert!(payment.apply_outcome(GatewayOutcome::Processing, None, Utc::now()));
        assert!(!payment.apply_outcome(GatewayOutcome::Processing, None, Utc::now()));
    }
}
