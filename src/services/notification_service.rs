//! In-app notification inbox.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{Actor, MarkedRead, Notification};
use crate::errors::{AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait NotificationService: Send + Sync {
    async fn list(&self, actor: Actor, unread_only: bool) -> AppResult<Vec<Notification>>;

    /// NotFound unless the notification belongs to the caller.
    async fn mark_read(&self, actor: Actor, id: Uuid) -> AppResult<Notification>;

    async fn mark_all_read(&self, actor: Actor) -> AppResult<MarkedRead>;
}

pub struct NotificationManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> NotificationManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> NotificationService for NotificationManager<U> {
    async fn list(&self, actor: Actor, unread_only: bool) -> AppResult<Vec<Notification>> {
        self.uow
            .notifications()
            .list_for_user(actor.id, unread_only)
            .await
    }

    async fn mark_read(&self, actor: Actor, id: Uuid) -> AppResult<Notification> {
        self.uow
            .notifications()
            .mark_read(actor.id, id)
            .await?
            .ok_or_not_found()
    }

    async fn mark_all_read(&self, actor: Actor) -> AppResult<MarkedRead> {
        let updated = self.uow.notifications().mark_all_read(actor.id).await?;
        Ok(MarkedRead { updated })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserRole;
    use crate::errors::AppError;
    use crate::infra::repositories::MockNotificationRepository;
    use crate::services::testing::TestUnitOfWork;
    use mockall::predicate::eq;

    #[tokio::test]
    async fn test_foreign_notification_is_not_found() {
        let actor = Actor::new(Uuid::new_v4(), UserRole::Tenant);
        let mut repo = MockNotificationRepository::new();
        repo.expect_mark_read()
            .with(eq(actor.id), mockall::predicate::always())
            .returning(|_, _| Ok(None));

        let uow = TestUnitOfWork::default().with_notifications(repo);
        let result = NotificationManager::new(Arc::new(uow))
            .mark_read(actor, Uuid::new_v4())
            .await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_mark_all_read_reports_count() {
        let actor = Actor::new(Uuid::new_v4(), UserRole::Landlord);
        let mut repo = MockNotificationRepository::new();
        repo.expect_mark_all_read()
            .with(eq(actor.id))
            .returning(|_| Ok(3));

        let uow = TestUnitOfWork::default().with_notifications(repo);
        let marked = NotificationManager::new(Arc::new(uow))
            .mark_all_read(actor)
            .await
            .unwrap();
        assert_eq!(marked.updated, 3);
    }
}
