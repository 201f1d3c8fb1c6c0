//! Maintenance requests: tenant submission, landlord triage and the
//! shared update log.
//!
//! A status change and its log entry are written together through
//! `MaintenanceRepository::save`. Tenants only ever see public log
//! entries.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use super::notifier::{Notice, Notifier};
use super::scope::{owned_request, property_of, scoped_units, unit_and_property};
use crate::domain::validation::not_blank;
use crate::domain::{
    Actor, CancelMaintenance, MaintenanceChanges, MaintenanceComment, MaintenanceDetail,
    MaintenanceFilter, MaintenancePriority, MaintenanceRequest, MaintenanceStatus,
    MaintenanceUpdate, NewMaintenanceRequest, NotificationKind, Property, UserRole,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait MaintenanceService: Send + Sync {
    /// Tenant submission against a unit they hold a current lease on.
    async fn submit(
        &self,
        actor: Actor,
        input: NewMaintenanceRequest,
    ) -> AppResult<MaintenanceRequest>;

    async fn list_for_tenant(&self, actor: Actor) -> AppResult<Vec<MaintenanceRequest>>;

    /// Request with public log entries only.
    async fn get_for_tenant(&self, actor: Actor, id: Uuid) -> AppResult<MaintenanceDetail>;

    async fn tenant_cancel(
        &self,
        actor: Actor,
        id: Uuid,
        input: CancelMaintenance,
    ) -> AppResult<MaintenanceRequest>;

    async fn list_for_landlord(
        &self,
        actor: Actor,
        filter: MaintenanceFilter,
    ) -> AppResult<Vec<MaintenanceRequest>>;

    /// Request with every log entry, internal notes included.
    async fn get_for_landlord(&self, actor: Actor, id: Uuid) -> AppResult<MaintenanceDetail>;

    async fn landlord_update(
        &self,
        actor: Actor,
        id: Uuid,
        changes: MaintenanceChanges,
    ) -> AppResult<MaintenanceRequest>;

    /// Append a free-text entry. Tenant comments are always public.
    async fn comment(
        &self,
        actor: Actor,
        id: Uuid,
        input: MaintenanceComment,
    ) -> AppResult<MaintenanceUpdate>;
}

pub struct MaintenanceManager<U: UnitOfWork> {
    uow: Arc<U>,
    notifier: Arc<dyn Notifier>,
}

impl<U: UnitOfWork> MaintenanceManager<U> {
    pub fn new(uow: Arc<U>, notifier: Arc<dyn Notifier>) -> Self {
        Self { uow, notifier }
    }

    async fn tenant_request(&self, actor: &Actor, id: Uuid) -> AppResult<MaintenanceRequest> {
        let request = self
            .uow
            .maintenance()
            .find_by_id(id)
            .await?
            .ok_or_not_found()?;
        actor.ensure_tenant_of(request.tenant_id)?;
        Ok(request)
    }

    async fn landlord_of(&self, request: &MaintenanceRequest) -> AppResult<Property> {
        let (_, property) = unit_and_property(self.uow.as_ref(), request.unit_id).await?;
        Ok(property)
    }

    async fn detail(
        &self,
        request: MaintenanceRequest,
        public_only: bool,
    ) -> AppResult<MaintenanceDetail> {
        let updates = self
            .uow
            .maintenance()
            .list_updates(request.id, public_only)
            .await?;
        Ok(MaintenanceDetail { request, updates })
    }

    async fn notify_tenant(&self, request: &MaintenanceRequest, kind: NotificationKind, message: String) {
        let notice = Notice::new(
            request.tenant_id,
            kind,
            format!("Maintenance update: {}", request.title),
            message,
        )
        .link(format!("/tenant/maintenance/{}", request.id));
        self.notifier.dispatch(notice).await;
    }

    async fn notify_landlord(
        &self,
        request: &MaintenanceRequest,
        kind: NotificationKind,
        title: String,
        message: String,
        chat: bool,
    ) {
        let property = match self.landlord_of(request).await {
            Ok(property) => property,
            Err(e) => {
                tracing::warn!(request_id = %request.id, error = %e, "Landlord lookup failed");
                return;
            }
        };
        let notice = Notice::new(property.landlord_id, kind, title, message)
            .link(format!("/landlord/maintenance/{}", request.id))
            .with_chat(chat);
        self.notifier.dispatch(notice).await;
    }
}

#[async_trait]
impl<U: UnitOfWork> MaintenanceService for MaintenanceManager<U> {
    async fn submit(
        &self,
        actor: Actor,
        input: NewMaintenanceRequest,
    ) -> AppResult<MaintenanceRequest> {
        actor.ensure_role(UserRole::Tenant)?;
        let unit = self
            .uow
            .units()
            .find_by_id(input.unit_id)
            .await?
            .ok_or_not_found()?;
        let property = property_of(self.uow.as_ref(), &unit).await?;

        let holds_lease = self
            .uow
            .leases()
            .list_by_tenant(actor.id)
            .await?
            .iter()
            .any(|l| l.unit_id == unit.id && l.status.is_blocking());
        if !holds_lease {
            return Err(AppError::Forbidden);
        }

        let request = self
            .uow
            .maintenance()
            .create(MaintenanceRequest::new(actor.id, input))
            .await?;
        tracing::info!(
            request_id = %request.id,
            unit_id = %unit.id,
            priority = %request.priority,
            "Maintenance request submitted"
        );

        let emergency = request.priority == MaintenancePriority::Emergency;
        let title = if emergency {
            format!("EMERGENCY maintenance request: {}", request.title)
        } else {
            format!("New maintenance request: {}", request.title)
        };
        let message = format!(
            "{} unit {} ({}): {}",
            property.name, unit.unit_number, request.category, request.description
        );
        self.notify_landlord(
            &request,
            NotificationKind::MaintenanceSubmitted,
            title,
            message,
            emergency,
        )
        .await;
        Ok(request)
    }

    async fn list_for_tenant(&self, actor: Actor) -> AppResult<Vec<MaintenanceRequest>> {
        actor.ensure_role(UserRole::Tenant)?;
        self.uow.maintenance().list_by_tenant(actor.id).await
    }

    async fn get_for_tenant(&self, actor: Actor, id: Uuid) -> AppResult<MaintenanceDetail> {
        let request = self.tenant_request(&actor, id).await?;
        self.detail(request, true).await
    }

    async fn tenant_cancel(
        &self,
        actor: Actor,
        id: Uuid,
        input: CancelMaintenance,
    ) -> AppResult<MaintenanceRequest> {
        let mut request = self.tenant_request(&actor, id).await?;
        let change = request
            .apply_status(MaintenanceStatus::Cancelled, Utc::now())?
            .ok_or_else(|| AppError::validation("Request is already cancelled"))?;

        let reason = input
            .reason
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());
        let message = match &reason {
            Some(reason) => format!("Cancelled by tenant: {}", reason),
            None => "Cancelled by tenant".to_string(),
        };
        let update =
            MaintenanceUpdate::status_change(request.id, actor.id, change, Some(message.clone()), true);
        let request = self.uow.maintenance().save(request, Some(update)).await?;

        tracing::info!(request_id = %request.id, "Maintenance request cancelled by tenant");
        self.notify_landlord(
            &request,
            NotificationKind::MaintenanceUpdated,
            format!("Maintenance request cancelled: {}", request.title),
            message,
            false,
        )
        .await;
        Ok(request)
    }

    async fn list_for_landlord(
        &self,
        actor: Actor,
        filter: MaintenanceFilter,
    ) -> AppResult<Vec<MaintenanceRequest>> {
        let unit_ids = scoped_units(self.uow.as_ref(), &actor)
            .await?
            .into_iter()
            .map(|u| u.id)
            .collect();
        let requests = self.uow.maintenance().list_by_units(unit_ids).await?;
        Ok(requests.into_iter().filter(|r| filter.matches(r)).collect())
    }

    async fn get_for_landlord(&self, actor: Actor, id: Uuid) -> AppResult<MaintenanceDetail> {
        let (request, _) = owned_request(self.uow.as_ref(), &actor, id).await?;
        self.detail(request, false).await
    }

    async fn landlord_update(
        &self,
        actor: Actor,
        id: Uuid,
        changes: MaintenanceChanges,
    ) -> AppResult<MaintenanceRequest> {
        let (mut request, _) = owned_request(self.uow.as_ref(), &actor, id).await?;

        let change = match changes.status {
            Some(next) => request.apply_status(next, Utc::now())?,
            None => None,
        };
        request.apply_details(&changes);

        // Without a status change the message is logged as a plain comment.
        let is_public = changes.is_public.unwrap_or(true);
        let message = changes
            .message
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string);
        let update = match change {
            Some(change) => Some(MaintenanceUpdate::status_change(
                request.id, actor.id, change, message, is_public,
            )),
            None => message
                .map(|message| MaintenanceUpdate::comment(request.id, actor.id, message, is_public)),
        };
        let request = self.uow.maintenance().save(request, update.clone()).await?;

        if let Some(update) = update {
            let kind = if update.new_status.is_some() {
                tracing::info!(
                    request_id = %request.id,
                    from = ?update.previous_status,
                    to = ?update.new_status,
                    "Maintenance status changed"
                );
                NotificationKind::MaintenanceUpdated
            } else {
                NotificationKind::MaintenanceComment
            };
            if update.is_public {
                self.notify_tenant(&request, kind, update.message).await;
            }
        }
        Ok(request)
    }

    async fn comment(
        &self,
        actor: Actor,
        id: Uuid,
        input: MaintenanceComment,
    ) -> AppResult<MaintenanceUpdate> {
        not_blank("Message", &input.message)?;
        let message = input.message.trim().to_string();

        if actor.role == UserRole::Tenant {
            let request = self.tenant_request(&actor, id).await?;
            let update = self
                .uow
                .maintenance()
                .add_update(MaintenanceUpdate::comment(request.id, actor.id, message, true))
                .await?;
            self.notify_landlord(
                &request,
                NotificationKind::MaintenanceComment,
                format!("New comment on: {}", request.title),
                update.message.clone(),
                false,
            )
            .await;
            return Ok(update);
        }

        let (request, _) = owned_request(self.uow.as_ref(), &actor, id).await?;
        let is_public = input.is_public.unwrap_or(true);
        let update = self
            .uow
            .maintenance()
            .add_update(MaintenanceUpdate::comment(request.id, actor.id, message, is_public))
            .await?;
        if update.is_public {
            self.notify_tenant(&request, NotificationKind::MaintenanceComment, update.message.clone())
                .await;
        }
        Ok(update)
    }
}
