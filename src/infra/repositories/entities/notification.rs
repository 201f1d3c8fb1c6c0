//! Notification database entity.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use super::decode;
use crate::domain::Notification;
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub action_url: Option<String>,
    pub read: bool,
    pub read_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Notification {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Notification {
            id: model.id,
            user_id: model.user_id,
            kind: decode("notifications.kind", &model.kind)?,
            title: model.title,
            message: model.message,
            action_url: model.action_url,
            read: model.read,
            read_at: model.read_at,
            created_at: model.created_at,
        })
    }
}

impl From<&Notification> for ActiveModel {
    fn from(notification: &Notification) -> Self {
        ActiveModel {
            id: Set(notification.id),
            user_id: Set(notification.user_id),
            kind: Set(notification.kind.as_str().to_string()),
            title: Set(notification.title.clone()),
            message: Set(notification.message.clone()),
            action_url: Set(notification.action_url.clone()),
            read: Set(notification.read),
            read_at: Set(notification.read_at),
            created_at: Set(notification.created_at),
        }
    }
}
