//! In-app notifications.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

string_enum! {
    NotificationKind {
        MaintenanceSubmitted => "MAINTENANCE_SUBMITTED",
        MaintenanceUpdated => "MAINTENANCE_UPDATED",
        MaintenanceComment => "MAINTENANCE_COMMENT",
        LeaseUpdated => "LEASE_UPDATED",
        LeaseSigned => "LEASE_SIGNED",
        PaymentReceived => "PAYMENT_RECEIVED",
        PaymentFailed => "PAYMENT_FAILED",
        PaymentRefunded => "PAYMENT_REFUNDED",
        OnboardingSubmitted => "ONBOARDING_SUBMITTED",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    /// Relative link into the app, e.g. `/tenant/maintenance/<id>`
    pub action_url: Option<String>,
    pub read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(
        user_id: Uuid,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
        action_url: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            kind,
            title: title.into(),
            message: message.into(),
            action_url,
            read: false,
            read_at: None,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NotificationQuery {
    /// Only return unread notifications
    #[serde(default)]
    pub unread_only: bool,
}

/// Result of marking every notification read
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MarkedRead {
    pub updated: u64,
}
