//! Chat notification seam.

use async_trait::async_trait;

use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ChatSender: Send + Sync {
    /// Post a message to a channel
    async fn post(&self, channel: &str, text: &str) -> AppResult<()>;
}

/// Writes chat messages to the log.
#[derive(Debug, Clone, Default)]
pub struct LogChatSender;

#[async_trait]
impl ChatSender for LogChatSender {
    async fn post(&self, channel: &str, text: &str) -> AppResult<()> {
        tracing::info!(channel, text, "Chat message");
        Ok(())
    }
}
