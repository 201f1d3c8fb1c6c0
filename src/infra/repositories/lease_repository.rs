//! Lease repository implementation.
//!
//! Lease writes that move the unit's status run in one transaction with
//! the unit update.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use uuid::Uuid;

use super::base::{into_domain, opt_into_domain};
use super::entities::lease::{self, ActiveModel, Entity as LeaseEntity};
use super::unit_repository::write_unit_status;
use crate::domain::{Lease, LeaseStatus, UnitStatus};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait LeaseRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Lease>>;

    async fn list_by_tenant(&self, tenant_id: Uuid) -> AppResult<Vec<Lease>>;

    async fn list_by_units(&self, unit_ids: Vec<Uuid>) -> AppResult<Vec<Lease>>;

    /// Number of ACTIVE or PENDING_SIGNATURE leases on the given units
    async fn count_blocking_for_units(&self, unit_ids: Vec<Uuid>) -> AppResult<u64>;

    /// Insert a lease, setting the unit status in the same transaction
    async fn create(&self, lease: Lease, unit_status: Option<UnitStatus>) -> AppResult<Lease>;

    /// Save a lease, setting the unit status in the same transaction
    async fn update(&self, lease: Lease, unit_status: Option<UnitStatus>) -> AppResult<Lease>;
}

/// A reservation only claims a unit that is still VACANT. Dropping the
/// transaction on conflict rolls back the lease write.
async fn set_unit_status<C: ConnectionTrait>(
    conn: &C,
    unit_id: Uuid,
    status: UnitStatus,
) -> AppResult<()> {
    let expected = (status == UnitStatus::Reserved).then_some(UnitStatus::Vacant);
    let changed = write_unit_status(conn, unit_id, status, expected).await?;
    if expected.is_some() && changed == 0 {
        return Err(AppError::conflict("Unit is no longer available"));
    }
    Ok(())
}

pub struct LeaseStore {
    db: DatabaseConnection,
}

impl LeaseStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LeaseRepository for LeaseStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Lease>> {
        let result = LeaseEntity::find_by_id(id).one(&self.db).await?;
        opt_into_domain(result)
    }

    async fn list_by_tenant(&self, tenant_id: Uuid) -> AppResult<Vec<Lease>> {
        let models = LeaseEntity::find()
            .filter(lease::Column::TenantId.eq(tenant_id))
            .order_by_desc(lease::Column::StartDate)
            .all(&self.db)
            .await?;
        into_domain(models)
    }

    async fn list_by_units(&self, unit_ids: Vec<Uuid>) -> AppResult<Vec<Lease>> {
        if unit_ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = LeaseEntity::find()
            .filter(lease::Column::UnitId.is_in(unit_ids))
            .order_by_desc(lease::Column::StartDate)
            .all(&self.db)
            .await?;
        into_domain(models)
    }

    async fn count_blocking_for_units(&self, unit_ids: Vec<Uuid>) -> AppResult<u64> {
        if unit_ids.is_empty() {
            return Ok(0);
        }
        let count = LeaseEntity::find()
            .filter(lease::Column::UnitId.is_in(unit_ids))
            .filter(
                lease::Column::Status.is_in(LeaseStatus::BLOCKING.iter().map(|s| s.as_str())),
            )
            .count(&self.db)
            .await?;
        Ok(count)
    }

    async fn create(&self, lease: Lease, unit_status: Option<UnitStatus>) -> AppResult<Lease> {
        let txn = self.db.begin().await?;
        let model = ActiveModel::from(&lease).insert(&txn).await?;
        if let Some(status) = unit_status {
            set_unit_status(&txn, lease.unit_id, status).await?;
        }
        txn.commit().await?;
        Lease::try_from(model)
    }

    async fn update(&self, lease: Lease, unit_status: Option<UnitStatus>) -> AppResult<Lease> {
        let txn = self.db.begin().await?;
        let model = ActiveModel::from(&lease).update(&txn).await?;
        if let Some(status) = unit_status {
            set_unit_status(&txn, lease.unit_id, status).await?;
        }
        txn.commit().await?;
        Lease::try_from(model)
    }
}
