//! Property repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use super::base::{into_domain, opt_into_domain};
use super::entities::property::{self, ActiveModel, Entity as PropertyEntity};
use crate::domain::Property;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PropertyRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Property>>;

    /// Properties owned by one landlord, by name
    async fn list_by_landlord(&self, landlord_id: Uuid) -> AppResult<Vec<Property>>;

    /// Every property (admin view)
    async fn list_all(&self) -> AppResult<Vec<Property>>;

    async fn create(&self, property: Property) -> AppResult<Property>;

    async fn update(&self, property: Property) -> AppResult<Property>;

    /// Delete a property; its units go with it
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

pub struct PropertyStore {
    db: DatabaseConnection,
}

impl PropertyStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PropertyRepository for PropertyStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Property>> {
        let result = PropertyEntity::find_by_id(id).one(&self.db).await?;
        opt_into_domain(result)
    }

    async fn list_by_landlord(&self, landlord_id: Uuid) -> AppResult<Vec<Property>> {
        let models = PropertyEntity::find()
            .filter(property::Column::LandlordId.eq(landlord_id))
            .order_by_asc(property::Column::Name)
            .all(&self.db)
            .await?;
        into_domain(models)
    }

    async fn list_all(&self) -> AppResult<Vec<Property>> {
        let models = PropertyEntity::find()
            .order_by_asc(property::Column::Name)
            .all(&self.db)
            .await?;
        into_domain(models)
    }

    async fn create(&self, property: Property) -> AppResult<Property> {
        let model = ActiveModel::from(&property).insert(&self.db).await?;
        Property::try_from(model)
    }

    async fn update(&self, property: Property) -> AppResult<Property> {
        let model = ActiveModel::from(&property).update(&self.db).await?;
        Property::try_from(model)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = PropertyEntity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}
