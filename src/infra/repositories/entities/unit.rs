//! Unit database entity.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use super::decode;
use crate::domain::Unit;
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "units")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub property_id: Uuid,
    pub unit_number: String,
    pub bedrooms: i32,
    pub bathrooms: f64,
    pub square_feet: Option<i32>,
    pub rent_cents: i64,
    pub deposit_cents: i64,
    pub status: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::property::Entity",
        from = "Column::PropertyId",
        to = "super::property::Column::Id",
        on_delete = "Cascade"
    )]
    Property,
}

impl Related<super::property::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Property.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Unit {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Unit {
            id: model.id,
            property_id: model.property_id,
            unit_number: model.unit_number,
            bedrooms: model.bedrooms,
            bathrooms: model.bathrooms,
            square_feet: model.square_feet,
            rent_cents: model.rent_cents,
            deposit_cents: model.deposit_cents,
            status: decode("units.status", &model.status)?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl From<&Unit> for ActiveModel {
    fn from(unit: &Unit) -> Self {
        ActiveModel {
            id: Set(unit.id),
            property_id: Set(unit.property_id),
            unit_number: Set(unit.unit_number.clone()),
            bedrooms: Set(unit.bedrooms),
            bathrooms: Set(unit.bathrooms),
            square_feet: Set(unit.square_feet),
            rent_cents: Set(unit.rent_cents),
            deposit_cents: Set(unit.deposit_cents),
            status: Set(unit.status.as_str().to_string()),
            created_at: Set(unit.created_at),
            updated_at: Set(unit.updated_at),
        }
    }
}
