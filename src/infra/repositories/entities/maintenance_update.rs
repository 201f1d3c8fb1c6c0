//! Maintenance update (log entry) database entity.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use super::decode_opt;
use crate::domain::MaintenanceUpdate;
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "maintenance_updates")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub request_id: Uuid,
    pub author_id: Uuid,
    pub message: String,
    pub previous_status: Option<String>,
    pub new_status: Option<String>,
    pub is_public: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::maintenance_request::Entity",
        from = "Column::RequestId",
        to = "super::maintenance_request::Column::Id",
        on_delete = "Cascade"
    )]
    Request,
}

impl Related<super::maintenance_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Request.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for MaintenanceUpdate {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(MaintenanceUpdate {
            id: model.id,
            request_id: model.request_id,
            author_id: model.author_id,
            message: model.message,
            previous_status: decode_opt(
                "maintenance_updates.previous_status",
                model.previous_status.as_deref(),
            )?,
            new_status: decode_opt("maintenance_updates.new_status", model.new_status.as_deref())?,
            is_public: model.is_public,
            created_at: model.created_at,
        })
    }
}

impl From<&MaintenanceUpdate> for ActiveModel {
    fn from(update: &MaintenanceUpdate) -> Self {
        ActiveModel {
            id: Set(update.id),
            request_id: Set(update.request_id),
            author_id: Set(update.author_id),
            message: Set(update.message.clone()),
            previous_status: Set(update.previous_status.map(|s| s.as_str().to_string())),
            new_status: Set(update.new_status.map(|s| s.as_str().to_string())),
            is_public: Set(update.is_public),
            created_at: Set(update.created_at),
        }
    }
}
