//! Maintenance requests and their append-only update log.
//!
//! A request moves through a fixed lifecycle:
//!
//! ```text
//! SUBMITTED -> ACKNOWLEDGED -> IN_PROGRESS <-> ON_HOLD
//!                                   |
//!                                   v
//!                               COMPLETED
//! ```
//!
//! `CANCELLED` is reachable from every non-terminal state. Every actual
//! status change produces exactly one [`MaintenanceUpdate`]; re-setting the
//! current status produces none.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::validation::trimmed;
use crate::errors::{AppError, AppResult};

string_enum! {
    MaintenanceStatus {
        Submitted => "SUBMITTED",
        Acknowledged => "ACKNOWLEDGED",
        InProgress => "IN_PROGRESS",
        OnHold => "ON_HOLD",
        Completed => "COMPLETED",
        Cancelled => "CANCELLED",
    }
}

impl MaintenanceStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, MaintenanceStatus::Completed | MaintenanceStatus::Cancelled)
    }

    /// Whether `next` is a legal move from this status.
    pub fn can_transition_to(&self, next: MaintenanceStatus) -> bool {
        use MaintenanceStatus::*;
        matches!(
            (self, next),
            (Submitted, Acknowledged)
                | (Submitted, InProgress)
                | (Submitted, Cancelled)
                | (Acknowledged, InProgress)
                | (Acknowledged, OnHold)
                | (Acknowledged, Cancelled)
                | (InProgress, OnHold)
                | (InProgress, Completed)
                | (InProgress, Cancelled)
                | (OnHold, InProgress)
                | (OnHold, Cancelled)
        )
    }

    /// Human readable label used in generated log messages.
    pub fn label(&self) -> &'static str {
        match self {
            MaintenanceStatus::Submitted => "Submitted",
            MaintenanceStatus::Acknowledged => "Acknowledged",
            MaintenanceStatus::InProgress => "In Progress",
            MaintenanceStatus::OnHold => "On Hold",
            MaintenanceStatus::Completed => "Completed",
            MaintenanceStatus::Cancelled => "Cancelled",
        }
    }

    /// Statuses a landlord still has to act on.
    pub fn is_open(&self) -> bool {
        !self.is_terminal()
    }
}

string_enum! {
    MaintenancePriority {
        Low => "LOW",
        Medium => "MEDIUM",
        High => "HIGH",
        Emergency => "EMERGENCY",
    }
}

impl Default for MaintenancePriority {
    fn default() -> Self {
        MaintenancePriority::Medium
    }
}

string_enum! {
    MaintenanceCategory {
        Plumbing => "PLUMBING",
        Electrical => "ELECTRICAL",
        Hvac => "HVAC",
        Appliance => "APPLIANCE",
        Structural => "STRUCTURAL",
        PestControl => "PEST_CONTROL",
        Landscaping => "LANDSCAPING",
        General => "GENERAL",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MaintenanceRequest {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub unit_id: Uuid,
    pub title: String,
    pub description: String,
    pub category: MaintenanceCategory,
    pub priority: MaintenancePriority,
    pub status: MaintenanceStatus,
    pub permission_to_enter: bool,
    pub assigned_to: Option<String>,
    pub scheduled_date: Option<NaiveDate>,
    pub estimated_cost_cents: Option<i64>,
    pub actual_cost_cents: Option<i64>,
    pub landlord_notes: Option<String>,
    pub acknowledged_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A status move that actually happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    pub from: MaintenanceStatus,
    pub to: MaintenanceStatus,
}

impl StatusChange {
    pub fn message(&self) -> String {
        format!(
            "Status changed from {} to {}",
            self.from.label(),
            self.to.label()
        )
    }
}

impl MaintenanceRequest {
    pub fn new(tenant_id: Uuid, input: NewMaintenanceRequest) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            tenant_id,
            unit_id: input.unit_id,
            title: input.title.trim().to_string(),
            description: input.description.trim().to_string(),
            category: input.category,
            priority: input.priority,
            status: MaintenanceStatus::Submitted,
            permission_to_enter: input.permission_to_enter,
            assigned_to: None,
            scheduled_date: None,
            estimated_cost_cents: None,
            actual_cost_cents: None,
            landlord_notes: None,
            acknowledged_at: None,
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Move to `next`. Returns `None` when the status is unchanged; rejects
    /// moves outside the lifecycle. Milestone timestamps are written only
    /// the first time their status is entered.
    pub fn apply_status(
        &mut self,
        next: MaintenanceStatus,
        at: DateTime<Utc>,
    ) -> AppResult<Option<StatusChange>> {
        if next == self.status {
            return Ok(None);
        }
        if !self.status.can_transition_to(next) {
            return Err(AppError::validation(format!(
                "Cannot change status from {} to {}",
                self.status.label(),
                next.label()
            )));
        }

        let change = StatusChange {
            from: self.status,
            to: next,
        };
        self.status = next;
        match next {
            MaintenanceStatus::Acknowledged if self.acknowledged_at.is_none() => {
                self.acknowledged_at = Some(at)
            }
            MaintenanceStatus::Completed if self.completed_at.is_none() => {
                self.completed_at = Some(at)
            }
            _ => {}
        }
        self.updated_at = at;
        Ok(Some(change))
    }

    /// Apply the non-status landlord fields.
    pub fn apply_details(&mut self, changes: &MaintenanceChanges) {
        if let Some(priority) = changes.priority {
            self.priority = priority;
        }
        if let Some(assigned_to) = &changes.assigned_to {
            self.assigned_to = Some(assigned_to.clone());
        }
        if let Some(date) = changes.scheduled_date {
            self.scheduled_date = Some(date);
        }
        if let Some(cost) = changes.estimated_cost_cents {
            self.estimated_cost_cents = Some(cost);
        }
        if let Some(cost) = changes.actual_cost_cents {
            self.actual_cost_cents = Some(cost);
        }
        if let Some(notes) = &changes.landlord_notes {
            self.landlord_notes = Some(notes.clone());
        }
        self.updated_at = Utc::now();
    }
}

/// Append-only log entry on a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MaintenanceUpdate {
    pub id: Uuid,
    pub request_id: Uuid,
    pub author_id: Uuid,
    pub message: String,
    pub previous_status: Option<MaintenanceStatus>,
    pub new_status: Option<MaintenanceStatus>,
    /// Internal notes (`false`) are hidden from the tenant
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
}

impl MaintenanceUpdate {
    pub fn status_change(
        request_id: Uuid,
        author_id: Uuid,
        change: StatusChange,
        message: Option<String>,
        is_public: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            request_id,
            author_id,
            message: message.unwrap_or_else(|| change.message()),
            previous_status: Some(change.from),
            new_status: Some(change.to),
            is_public,
            created_at: Utc::now(),
        }
    }

    pub fn comment(request_id: Uuid, author_id: Uuid, message: String, is_public: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            request_id,
            author_id,
            message,
            previous_status: None,
            new_status: None,
            is_public,
            created_at: Utc::now(),
        }
    }
}

/// Maintenance request submission payload
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewMaintenanceRequest {
    pub unit_id: Uuid,
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 3, max = 100, message = "Title must be between 3 and 100 characters"))]
    #[schema(example = "Kitchen sink leaking")]
    pub title: String,
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 10, max = 2000, message = "Description must be at least 10 characters"))]
    #[schema(example = "Water pools under the sink whenever the tap runs.")]
    pub description: String,
    pub category: MaintenanceCategory,
    #[serde(default)]
    pub priority: MaintenancePriority,
    #[serde(default)]
    pub permission_to_enter: bool,
}

/// Landlord update payload
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct MaintenanceChanges {
    pub status: Option<MaintenanceStatus>,
    pub priority: Option<MaintenancePriority>,
    #[validate(length(max = 120, message = "Assignee is too long"))]
    pub assigned_to: Option<String>,
    pub scheduled_date: Option<NaiveDate>,
    #[validate(range(min = 0, message = "Estimated cost cannot be negative"))]
    pub estimated_cost_cents: Option<i64>,
    #[validate(range(min = 0, message = "Actual cost cannot be negative"))]
    pub actual_cost_cents: Option<i64>,
    #[validate(length(max = 2000, message = "Notes are too long"))]
    pub landlord_notes: Option<String>,
    /// Log message for the status change (generated when absent). Without a
    /// status change it is logged as a comment.
    #[validate(length(min = 1, max = 2000, message = "Message must be between 1 and 2000 characters"))]
    pub message: Option<String>,
    /// Visibility of the log entry (default public)
    pub is_public: Option<bool>,
}

/// Comment payload; `is_public` is ignored for tenants
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct MaintenanceComment {
    #[validate(length(min = 1, max = 2000, message = "Message must be between 1 and 2000 characters"))]
    pub message: String,
    pub is_public: Option<bool>,
}

/// Tenant cancellation payload
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CancelMaintenance {
    #[validate(length(max = 500, message = "Reason is too long"))]
    pub reason: Option<String>,
}

/// Landlord list filter
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MaintenanceFilter {
    pub status: Option<MaintenanceStatus>,
    pub priority: Option<MaintenancePriority>,
}

impl MaintenanceFilter {
    pub fn matches(&self, request: &MaintenanceRequest) -> bool {
        self.status.map_or(true, |s| request.status == s)
            && self.priority.map_or(true, |p| request.priority == p)
    }
}

/// Request with its visible log
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MaintenanceDetail {
    #[serde(flatten)]
    pub request: MaintenanceRequest,
    pub updates: Vec<MaintenanceUpdate>,
}
