//! Property database entity.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use super::decode;
use crate::domain::Property;
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "properties")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub landlord_id: Uuid,
    pub name: String,
    pub property_type: String,
    pub status: String,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub description: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::unit::Entity")]
    Units,
}

impl Related<super::unit::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Units.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Property {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Property {
            id: model.id,
            landlord_id: model.landlord_id,
            name: model.name,
            property_type: decode("properties.property_type", &model.property_type)?,
            status: decode("properties.status", &model.status)?,
            address_line1: model.address_line1,
            address_line2: model.address_line2,
            city: model.city,
            state: model.state,
            postal_code: model.postal_code,
            country: model.country,
            description: model.description,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl From<&Property> for ActiveModel {
    fn from(property: &Property) -> Self {
        ActiveModel {
            id: Set(property.id),
            landlord_id: Set(property.landlord_id),
            name: Set(property.name.clone()),
            property_type: Set(property.property_type.as_str().to_string()),
            status: Set(property.status.as_str().to_string()),
            address_line1: Set(property.address_line1.clone()),
            address_line2: Set(property.address_line2.clone()),
            city: Set(property.city.clone()),
            state: Set(property.state.clone()),
            postal_code: Set(property.postal_code.clone()),
            country: Set(property.country.clone()),
            description: Set(property.description.clone()),
            created_at: Set(property.created_at),
            updated_at: Set(property.updated_at),
        }
    }
}
