//! Unit repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};
use uuid::Uuid;

use super::base::{conflict_on_unique, into_domain, opt_into_domain};
use super::entities::property::{self, Entity as PropertyEntity};
use super::entities::unit::{self, ActiveModel, Entity as UnitEntity};
use crate::domain::{AvailableUnit, Property, Unit, UnitStatus};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

const DUPLICATE_UNIT_NUMBER: &str = "Unit number already exists for this property";

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UnitRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Unit>>;

    async fn list_by_property(&self, property_id: Uuid) -> AppResult<Vec<Unit>>;

    /// Units across several properties (landlord portfolio)
    async fn list_by_properties(&self, property_ids: Vec<Uuid>) -> AppResult<Vec<Unit>>;

    /// Vacant units with their property, for onboarding
    async fn list_vacant(&self) -> AppResult<Vec<AvailableUnit>>;

    async fn find_by_number(&self, property_id: Uuid, unit_number: &str)
        -> AppResult<Option<Unit>>;

    async fn create(&self, unit: Unit) -> AppResult<Unit>;

    async fn update(&self, unit: Unit) -> AppResult<Unit>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Set a unit's status, optionally only when it currently has `expected`.
/// Returns the number of rows changed.
pub(crate) async fn write_unit_status<C: ConnectionTrait>(
    conn: &C,
    unit_id: Uuid,
    status: UnitStatus,
    expected: Option<UnitStatus>,
) -> AppResult<u64> {
    let mut update = UnitEntity::update_many()
        .col_expr(unit::Column::Status, Expr::value(status.as_str()))
        .col_expr(unit::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(unit::Column::Id.eq(unit_id));
    if let Some(expected) = expected {
        update = update.filter(unit::Column::Status.eq(expected.as_str()));
    }
    let result = update.exec(conn).await?;
    Ok(result.rows_affected)
}

pub struct UnitStore {
    db: DatabaseConnection,
}

impl UnitStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UnitRepository for UnitStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Unit>> {
        let result = UnitEntity::find_by_id(id).one(&self.db).await?;
        opt_into_domain(result)
    }

    async fn list_by_property(&self, property_id: Uuid) -> AppResult<Vec<Unit>> {
        let models = UnitEntity::find()
            .filter(unit::Column::PropertyId.eq(property_id))
            .order_by_asc(unit::Column::UnitNumber)
            .all(&self.db)
            .await?;
        into_domain(models)
    }

    async fn list_by_properties(&self, property_ids: Vec<Uuid>) -> AppResult<Vec<Unit>> {
        if property_ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = UnitEntity::find()
            .filter(unit::Column::PropertyId.is_in(property_ids))
            .order_by_asc(unit::Column::UnitNumber)
            .all(&self.db)
            .await?;
        into_domain(models)
    }

    async fn list_vacant(&self) -> AppResult<Vec<AvailableUnit>> {
        let rows = UnitEntity::find()
            .filter(unit::Column::Status.eq(UnitStatus::Vacant.as_str()))
            .find_also_related(PropertyEntity)
            .order_by_asc(property::Column::Name)
            .order_by_asc(unit::Column::UnitNumber)
            .all(&self.db)
            .await?;

        let mut available = Vec::with_capacity(rows.len());
        for (unit_model, property_model) in rows {
            let property_model = property_model
                .ok_or_else(|| AppError::internal("Unit without a property"))?;
            let property = Property::try_from(property_model)?;
            available.push(AvailableUnit {
                unit: Unit::try_from(unit_model)?,
                property_name: property.name,
                address_line1: property.address_line1,
                city: property.city,
                state: property.state,
            });
        }
        Ok(available)
    }

    async fn find_by_number(
        &self,
        property_id: Uuid,
        unit_number: &str,
    ) -> AppResult<Option<Unit>> {
        let result = UnitEntity::find()
            .filter(unit::Column::PropertyId.eq(property_id))
            .filter(unit::Column::UnitNumber.eq(unit_number))
            .one(&self.db)
            .await?;
        opt_into_domain(result)
    }

    async fn create(&self, unit: Unit) -> AppResult<Unit> {
        let model = ActiveModel::from(&unit)
            .insert(&self.db)
            .await
            .map_err(|e| conflict_on_unique(e, DUPLICATE_UNIT_NUMBER))?;
        Unit::try_from(model)
    }

    async fn update(&self, unit: Unit) -> AppResult<Unit> {
        let model = ActiveModel::from(&unit)
            .update(&self.db)
            .await
            .map_err(|e| conflict_on_unique(e, DUPLICATE_UNIT_NUMBER))?;
        Unit::try_from(model)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = UnitEntity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}
