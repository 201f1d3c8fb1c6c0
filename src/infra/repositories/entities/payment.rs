//! Payment database entity.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use super::decode;
use crate::domain::Payment;
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub lease_id: Uuid,
    pub tenant_id: Uuid,
    pub amount_cents: i64,
    pub payment_type: String,
    pub method: String,
    pub status: String,
    pub due_date: Option<Date>,
    pub paid_at: Option<DateTimeUtc>,
    pub gateway_intent_id: Option<String>,
    pub gateway_refund_id: Option<String>,
    pub failure_reason: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Payment {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Payment {
            id: model.id,
            lease_id: model.lease_id,
            tenant_id: model.tenant_id,
            amount_cents: model.amount_cents,
            payment_type: decode("payments.payment_type", &model.payment_type)?,
            method: decode("payments.method", &model.method)?,
            status: decode("payments.status", &model.status)?,
            due_date: model.due_date,
            paid_at: model.paid_at,
            gateway_intent_id: model.gateway_intent_id,
            gateway_refund_id: model.gateway_refund_id,
            failure_reason: model.failure_reason,
            notes: model.notes,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl From<&Payment> for ActiveModel {
    fn from(payment: &Payment) -> Self {
        ActiveModel {
            id: Set(payment.id),
            lease_id: Set(payment.lease_id),
            tenant_id: Set(payment.tenant_id),
            amount_cents: Set(payment.amount_cents),
            payment_type: Set(payment.payment_type.as_str().to_string()),
            method: Set(payment.method.as_str().to_string()),
            status: Set(payment.status.as_str().to_string()),
            due_date: Set(payment.due_date),
            paid_at: Set(payment.paid_at),
            gateway_intent_id: Set(payment.gateway_intent_id.clone()),
            gateway_refund_id: Set(payment.gateway_refund_id.clone()),
            failure_reason: Set(payment.failure_reason.clone()),
            notes: Set(payment.notes.clone()),
            created_at: Set(payment.created_at),
            updated_at: Set(payment.updated_at),
        }
    }
}
