//! Payment repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use super::base::{into_domain, opt_into_domain};
use super::entities::payment::{self, ActiveModel, Entity as PaymentEntity};
use crate::domain::Payment;
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Payment>>;

    /// Look up by the gateway's charge intent id
    async fn find_by_intent(&self, intent_id: &str) -> AppResult<Option<Payment>>;

    async fn list_by_tenant(&self, tenant_id: Uuid) -> AppResult<Vec<Payment>>;

    async fn list_by_leases(&self, lease_ids: Vec<Uuid>) -> AppResult<Vec<Payment>>;

    async fn create(&self, payment: Payment) -> AppResult<Payment>;

    async fn update(&self, payment: Payment) -> AppResult<Payment>;
}

pub struct PaymentStore {
    db: DatabaseConnection,
}

impl PaymentStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PaymentRepository for PaymentStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Payment>> {
        let result = PaymentEntity::find_by_id(id).one(&self.db).await?;
        opt_into_domain(result)
    }

    async fn find_by_intent(&self, intent_id: &str) -> AppResult<Option<Payment>> {
        let result = PaymentEntity::find()
            .filter(payment::Column::GatewayIntentId.eq(intent_id))
            .one(&self.db)
            .await?;
        opt_into_domain(result)
    }

    async fn list_by_tenant(&self, tenant_id: Uuid) -> AppResult<Vec<Payment>> {
        let models = PaymentEntity::find()
            .filter(payment::Column::TenantId.eq(tenant_id))
            .order_by_desc(payment::Column::CreatedAt)
            .all(&self.db)
            .await?;
        into_domain(models)
    }

    async fn list_by_leases(&self, lease_ids: Vec<Uuid>) -> AppResult<Vec<Payment>> {
        if lease_ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = PaymentEntity::find()
            .filter(payment::Column::LeaseId.is_in(lease_ids))
            .order_by_desc(payment::Column::CreatedAt)
            .all(&self.db)
            .await?;
        into_domain(models)
    }

    async fn create(&self, payment: Payment) -> AppResult<Payment> {
        let model = ActiveModel::from(&payment).insert(&self.db).await?;
        Payment::try_from(model)
    }

    async fn update(&self, payment: Payment) -> AppResult<Payment> {
        let model = ActiveModel::from(&payment).update(&self.db).await?;
        Payment::try_from(model)
    }
}
