//! Lease database entity.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use super::decode;
use crate::domain::Lease;
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "leases")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub unit_id: Uuid,
    pub tenant_id: Uuid,
    pub start_date: Date,
    pub end_date: Date,
    pub rent_cents: i64,
    pub deposit_cents: i64,
    pub status: String,
    pub terms: Option<String>,
    pub signature: Option<String>,
    pub signed_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Lease {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Lease {
            id: model.id,
            unit_id: model.unit_id,
            tenant_id: model.tenant_id,
            start_date: model.start_date,
            end_date: model.end_date,
            rent_cents: model.rent_cents,
            deposit_cents: model.deposit_cents,
            status: decode("leases.status", &model.status)?,
            terms: model.terms,
            signature: model.signature,
            signed_at: model.signed_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl From<&Lease> for ActiveModel {
    fn from(lease: &Lease) -> Self {
        ActiveModel {
            id: Set(lease.id),
            unit_id: Set(lease.unit_id),
            tenant_id: Set(lease.tenant_id),
            start_date: Set(lease.start_date),
            end_date: Set(lease.end_date),
            rent_cents: Set(lease.rent_cents),
            deposit_cents: Set(lease.deposit_cents),
            status: Set(lease.status.as_str().to_string()),
            terms: Set(lease.terms.clone()),
            signature: Set(lease.signature.clone()),
            signed_at: Set(lease.signed_at),
            created_at: Set(lease.created_at),
            updated_at: Set(lease.updated_at),
        }
    }
}
