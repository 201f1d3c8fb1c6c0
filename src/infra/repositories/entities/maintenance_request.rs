//! Maintenance request database entity.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use super::decode;
use crate::domain::MaintenanceRequest;
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "maintenance_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub unit_id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: String,
    pub status: String,
    pub permission_to_enter: bool,
    pub assigned_to: Option<String>,
    pub scheduled_date: Option<Date>,
    pub estimated_cost_cents: Option<i64>,
    pub actual_cost_cents: Option<i64>,
    pub landlord_notes: Option<String>,
    pub acknowledged_at: Option<DateTimeUtc>,
    pub completed_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::maintenance_update::Entity")]
    Updates,
}

impl Related<super::maintenance_update::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Updates.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for MaintenanceRequest {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(MaintenanceRequest {
            id: model.id,
            tenant_id: model.tenant_id,
            unit_id: model.unit_id,
            title: model.title,
            description: model.description,
            category: decode("maintenance_requests.category", &model.category)?,
            priority: decode("maintenance_requests.priority", &model.priority)?,
            status: decode("maintenance_requests.status", &model.status)?,
            permission_to_enter: model.permission_to_enter,
            assigned_to: model.assigned_to,
            scheduled_date: model.scheduled_date,
            estimated_cost_cents: model.estimated_cost_cents,
            actual_cost_cents: model.actual_cost_cents,
            landlord_notes: model.landlord_notes,
            acknowledged_at: model.acknowledged_at,
            completed_at: model.completed_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl From<&MaintenanceRequest> for ActiveModel {
    fn from(request: &MaintenanceRequest) -> Self {
        ActiveModel {
            id: Set(request.id),
            tenant_id: Set(request.tenant_id),
            unit_id: Set(request.unit_id),
            title: Set(request.title.clone()),
            description: Set(request.description.clone()),
            category: Set(request.category.as_str().to_string()),
            priority: Set(request.priority.as_str().to_string()),
            status: Set(request.status.as_str().to_string()),
            permission_to_enter: Set(request.permission_to_enter),
            assigned_to: Set(request.assigned_to.clone()),
            scheduled_date: Set(request.scheduled_date),
            estimated_cost_cents: Set(request.estimated_cost_cents),
            actual_cost_cents: Set(request.actual_cost_cents),
            landlord_notes: Set(request.landlord_notes.clone()),
            acknowledged_at: Set(request.acknowledged_at),
            completed_at: Set(request.completed_at),
            created_at: Set(request.created_at),
            updated_at: Set(request.updated_at),
        }
    }
}
