//! Notification dispatch.
//!
//! Every notice becomes an in-app notification; email and chat are extra
//! channels chosen per notice. Channel failures are logged and swallowed
//! so they never fail the request that triggered them.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{Notification, NotificationKind};
use crate::infra::{ChatSender, UnitOfWork};
use crate::jobs::{EmailJob, Mailer};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Something worth telling a user about
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub recipient: Uuid,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub action_url: Option<String>,
    pub email: bool,
    pub chat: bool,
}

impl Notice {
    /// In-app plus email by default.
    pub fn new(
        recipient: Uuid,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            recipient,
            kind,
            title: title.into(),
            message: message.into(),
            action_url: None,
            email: true,
            chat: false,
        }
    }

    pub fn link(mut self, url: impl Into<String>) -> Self {
        self.action_url = Some(url.into());
        self
    }

    pub fn in_app_only(mut self) -> Self {
        self.email = false;
        self
    }

    pub fn with_chat(mut self, chat: bool) -> Self {
        self.chat = chat;
        self
    }
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn dispatch(&self, notice: Notice);
}

pub struct NotificationDispatcher<U: UnitOfWork> {
    uow: Arc<U>,
    mailer: Arc<dyn Mailer>,
    chat: Arc<dyn ChatSender>,
    chat_channel: String,
    base_url: String,
}

impl<U: UnitOfWork> NotificationDispatcher<U> {
    pub fn new(
        uow: Arc<U>,
        mailer: Arc<dyn Mailer>,
        chat: Arc<dyn ChatSender>,
        chat_channel: String,
        base_url: String,
    ) -> Self {
        Self {
            uow,
            mailer,
            chat,
            chat_channel,
            base_url,
        }
    }

    async fn send_email(&self, notice: &Notice) {
        let recipient = match self.uow.users().find_by_id(notice.recipient).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                tracing::warn!(user_id = %notice.recipient, "Email skipped: unknown recipient");
                return;
            }
            Err(e) => {
                tracing::warn!(user_id = %notice.recipient, error = %e, "Email skipped");
                return;
            }
        };

        let mut body = notice.message.clone();
        if let Some(url) = &notice.action_url {
            body.push_str(&format!("\n\n{}{}", self.base_url.trim_end_matches('/'), url));
        }
        let job = EmailJob::new(recipient.email, notice.title.clone(), body);

        if let Err(e) = self.mailer.send(job).await {
            tracing::warn!(user_id = %notice.recipient, error = %e, "Email delivery failed");
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> Notifier for NotificationDispatcher<U> {
    async fn dispatch(&self, notice: Notice) {
        let notification = Notification::new(
            notice.recipient,
            notice.kind,
            notice.title.clone(),
            notice.message.clone(),
            notice.action_url.clone(),
        );
        if let Err(e) = self.uow.notifications().create(notification).await {
            tracing::warn!(user_id = %notice.recipient, error = %e, "In-app notification failed");
        }

        if notice.email {
            self.send_email(&notice).await;
        }

        if notice.chat {
            let text = format!("{}: {}", notice.title, notice.message);
            if let Err(e) = self.chat.post(&self.chat_channel, &text).await {
                tracing::warn!(channel = %self.chat_channel, error = %e, "Chat post failed");
            }
        }
    }
}
