//! Maintenance request repository.
//!
//! A status change and its log entry are written in one transaction.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};
use uuid::Uuid;

use super::base::{into_domain, opt_into_domain};
use super::entities::maintenance_request::{self, ActiveModel, Entity as RequestEntity};
use super::entities::maintenance_update::{
    self, ActiveModel as UpdateActiveModel, Entity as UpdateEntity,
};
use crate::domain::{MaintenanceRequest, MaintenanceUpdate};
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait MaintenanceRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<MaintenanceRequest>>;

    async fn list_by_tenant(&self, tenant_id: Uuid) -> AppResult<Vec<MaintenanceRequest>>;

    async fn list_by_units(&self, unit_ids: Vec<Uuid>) -> AppResult<Vec<MaintenanceRequest>>;

    async fn create(&self, request: MaintenanceRequest) -> AppResult<MaintenanceRequest>;

    /// Save the request and, when given, append the log entry atomically
    async fn save(
        &self,
        request: MaintenanceRequest,
        update: Option<MaintenanceUpdate>,
    ) -> AppResult<MaintenanceRequest>;

    /// Append a log entry with no status change
    async fn add_update(&self, update: MaintenanceUpdate) -> AppResult<MaintenanceUpdate>;

    /// Log entries, oldest first; `public_only` hides internal notes
    async fn list_updates(
        &self,
        request_id: Uuid,
        public_only: bool,
    ) -> AppResult<Vec<MaintenanceUpdate>>;
}

pub struct MaintenanceStore {
    db: DatabaseConnection,
}

impl MaintenanceStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MaintenanceRepository for MaintenanceStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<MaintenanceRequest>> {
        let result = RequestEntity::find_by_id(id).one(&self.db).await?;
        opt_into_domain(result)
    }

    async fn list_by_tenant(&self, tenant_id: Uuid) -> AppResult<Vec<MaintenanceRequest>> {
        let models = RequestEntity::find()
            .filter(maintenance_request::Column::TenantId.eq(tenant_id))
            .order_by_desc(maintenance_request::Column::CreatedAt)
            .all(&self.db)
            .await?;
        into_domain(models)
    }

    async fn list_by_units(&self, unit_ids: Vec<Uuid>) -> AppResult<Vec<MaintenanceRequest>> {
        if unit_ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = RequestEntity::find()
            .filter(maintenance_request::Column::UnitId.is_in(unit_ids))
            .order_by_desc(maintenance_request::Column::CreatedAt)
            .all(&self.db)
            .await?;
        into_domain(models)
    }

    async fn create(&self, request: MaintenanceRequest) -> AppResult<MaintenanceRequest> {
        let model = ActiveModel::from(&request).insert(&self.db).await?;
        MaintenanceRequest::try_from(model)
    }

    async fn save(
        &self,
        request: MaintenanceRequest,
        update: Option<MaintenanceUpdate>,
    ) -> AppResult<MaintenanceRequest> {
        let txn = self.db.begin().await?;
        let model = ActiveModel::from(&request).update(&txn).await?;
        if let Some(update) = &update {
            UpdateActiveModel::from(update).insert(&txn).await?;
        }
        txn.commit().await?;
        MaintenanceRequest::try_from(model)
    }

    async fn add_update(&self, update: MaintenanceUpdate) -> AppResult<MaintenanceUpdate> {
        let model = UpdateActiveModel::from(&update).insert(&self.db).await?;
        MaintenanceUpdate::try_from(model)
    }

    async fn list_updates(
        &self,
        request_id: Uuid,
        public_only: bool,
    ) -> AppResult<Vec<MaintenanceUpdate>> {
        let mut query =
            UpdateEntity::find().filter(maintenance_update::Column::RequestId.eq(request_id));
        if public_only {
            query = query.filter(maintenance_update::Column::IsPublic.eq(true));
        }
        let models = query
            .order_by_asc(maintenance_update::Column::CreatedAt)
            .all(&self.db)
            .await?;
        into_domain(models)
    }
}
