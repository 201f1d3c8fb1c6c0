//! Background jobs.
//!
//! Email delivery runs as an apalis job backed by PostgreSQL storage. The
//! [`Mailer`] seam decides whether a message is queued for the worker or
//! handled inline.

mod email_job;
mod mailer;

pub use email_job::{email_job_handler, EmailJob};
pub use mailer::{LogMailer, Mailer, QueuedMailer};

#[cfg(any(test, feature = "test-utils"))]
pub use mailer::MockMailer;
