//! Notification repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::base::into_domain;
use super::entities::notification::{self, ActiveModel, Entity as NotificationEntity};
use crate::domain::Notification;
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn create(&self, notification: Notification) -> AppResult<Notification>;

    /// A user's notifications, newest first
    async fn list_for_user(&self, user_id: Uuid, unread_only: bool)
        -> AppResult<Vec<Notification>>;

    /// Mark one of the user's notifications read; `None` when the user
    /// has no such notification
    async fn mark_read(&self, user_id: Uuid, id: Uuid) -> AppResult<Option<Notification>>;

    /// Mark every unread notification read; returns how many changed
    async fn mark_all_read(&self, user_id: Uuid) -> AppResult<u64>;
}

pub struct NotificationStore {
    db: DatabaseConnection,
}

impl NotificationStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl NotificationRepository for NotificationStore {
    async fn create(&self, notification: Notification) -> AppResult<Notification> {
        let model = ActiveModel::from(&notification).insert(&self.db).await?;
        Notification::try_from(model)
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        unread_only: bool,
    ) -> AppResult<Vec<Notification>> {
        let mut query =
            NotificationEntity::find().filter(notification::Column::UserId.eq(user_id));
        if unread_only {
            query = query.filter(notification::Column::Read.eq(false));
        }
        let models = query
            .order_by_desc(notification::Column::CreatedAt)
            .all(&self.db)
            .await?;
        into_domain(models)
    }

    async fn mark_read(&self, user_id: Uuid, id: Uuid) -> AppResult<Option<Notification>> {
        let existing = NotificationEntity::find_by_id(id)
            .filter(notification::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?;

        let Some(model) = existing else {
            return Ok(None);
        };
        if model.read {
            return Notification::try_from(model).map(Some);
        }

        let mut active: ActiveModel = model.into();
        active.read = Set(true);
        active.read_at = Set(Some(Utc::now()));
        let model = active.update(&self.db).await?;
        Notification::try_from(model).map(Some)
    }

    async fn mark_all_read(&self, user_id: Uuid) -> AppResult<u64> {
        let result = NotificationEntity::update_many()
            .col_expr(notification::Column::Read, Expr::value(true))
            .col_expr(notification::Column::ReadAt, Expr::value(Utc::now()))
            .filter(notification::Column::UserId.eq(user_id))
            .filter(notification::Column::Read.eq(false))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }
}
