//! Payment gateway seam.
//!
//! The gateway creates charge intents the browser confirms, and issues
//! refunds. Asynchronous outcomes come back through the payments webhook.

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// A charge intent created at the gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeIntent {
    pub id: String,
    /// Handed to the browser to confirm the charge
    pub client_secret: String,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a charge intent for a local payment
    async fn create_intent(
        &self,
        payment_id: Uuid,
        amount_cents: i64,
        currency: &str,
    ) -> AppResult<ChargeIntent>;

    /// Refund a captured intent; returns the gateway refund id
    async fn refund(&self, intent_id: &str, amount_cents: i64) -> AppResult<String>;
}

/// Local gateway that issues intent and refund ids without a remote call.
/// Outcomes are delivered by posting to the payments webhook.
#[derive(Debug, Clone, Default)]
pub struct SandboxGateway;

impl SandboxGateway {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PaymentGateway for SandboxGateway {
    async fn create_intent(
        &self,
        payment_id: Uuid,
        amount_cents: i64,
        currency: &str,
    ) -> AppResult<ChargeIntent> {
        if amount_cents <= 0 {
            return Err(AppError::validation("Amount must be greater than zero"));
        }
        let id = format!("pi_{}", Uuid::new_v4().simple());
        let client_secret = format!("{}_secret_{}", id, Uuid::new_v4().simple());

        tracing::info!(
            payment_id = %payment_id,
            intent_id = %id,
            amount_cents,
            currency,
            "Sandbox charge intent created"
        );

        Ok(ChargeIntent { id, client_secret })
    }

    async fn refund(&self, intent_id: &str, amount_cents: i64) -> AppResult<String> {
        let refund_id = format!("re_{}", Uuid::new_v4().simple());
        tracing::info!(intent_id, refund_id = %refund_id, amount_cents, "Sandbox refund issued");
        Ok(refund_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sandbox_intent_ids() {
        let gateway = SandboxGateway::new();
        let intent = gateway
            .create_intent(Uuid::new_v4(), 1_000, "usd")
            .await
            .unwrap();
        assert!(intent.id.starts_with("pi_"));
        assert!(intent.client_secret.starts_with(&intent.id));
    }

    #[tokio::test]
    async fn test_sandbox_rejects_zero_amount() {
        let gateway = SandboxGateway::new();
        assert!(gateway.create_intent(Uuid::new_v4(), 0, "usd").await.is_err());
    }
}
