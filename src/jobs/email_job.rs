//! Email background job.
//!
//! Without an SMTP relay configured, emails are logged instead of sent.

use serde::{Deserialize, Serialize};
use std::env;

use crate::config::DEFAULT_EMAIL_FROM;
use crate::errors::AppError;

/// Email job payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailJob {
    /// Recipient email address
    pub to: String,
    /// Email subject line
    pub subject: String,
    /// Plain text body
    pub body: String,
    /// Optional sender override (defaults to SMTP_FROM)
    #[serde(default)]
    pub from: Option<String>,
}

impl EmailJob {
    /// Create a new email job
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
            from: None,
        }
    }

    /// Set custom sender address
    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }
}

struct EmailConfig {
    smtp_host: Option<String>,
    smtp_from: String,
}

impl EmailConfig {
    fn from_env() -> Self {
        Self {
            smtp_host: env::var("SMTP_HOST").ok().filter(|h| !h.is_empty()),
            smtp_from: env::var("SMTP_FROM").unwrap_or_else(|_| DEFAULT_EMAIL_FROM.to_string()),
        }
    }
}

/// Email job handler - processes email sending jobs
pub async fn email_job_handler(job: EmailJob) -> Result<(), AppError> {
    let config = EmailConfig::from_env();
    let from = job.from.as_deref().unwrap_or(&config.smtp_from);

    tracing::info!(
        to = %job.to,
        from = %from,
        subject = %job.subject,
        "Processing email job"
    );

    match config.smtp_host {
        None => {
            tracing::info!(
                "=== EMAIL (not sent) ===\n\
                 From: {}\n\
                 To: {}\n\
                 Subject: {}\n\
                 Body:\n{}\n\
                 ========================",
                from,
                job.to,
                job.subject,
                job.body
            );
        }
        Some(host) => {
            tracing::warn!(
                smtp_host = %host,
                to = %job.to,
                "No SMTP transport is compiled in; email logged only"
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_job_builder() {
        let job = EmailJob::new("tenant@example.com", "Hello", "Body").with_from("ops@example.com");
        assert_eq!(job.to, "tenant@example.com");
        assert_eq!(job.from.as_deref(), Some("ops@example.com"));
    }

    #[test]
    fn test_email_job_deserializes_without_from() {
        let job: EmailJob =
            serde_json::from_str(r#"{"to":"a@b.c","subject":"s","body":"b"}"#).unwrap();
        assert!(job.from.is_none());
    }

    #[tokio::test]
    async fn test_handler_never_fails_without_transport() {
        let job = EmailJob::new("tenant@example.com", "Hello", "Body");
        assert!(email_job_handler(job).await.is_ok());
    }
}
