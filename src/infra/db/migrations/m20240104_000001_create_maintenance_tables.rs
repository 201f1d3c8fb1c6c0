//! Migration: maintenance requests and their update log.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::Users;
use super::m20240102_000001_create_properties_and_units::Units;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MaintenanceRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MaintenanceRequests::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MaintenanceRequests::TenantId).uuid().not_null())
                    .col(ColumnDef::new(MaintenanceRequests::UnitId).uuid().not_null())
                    .col(ColumnDef::new(MaintenanceRequests::Title).string_len(100).not_null())
                    .col(ColumnDef::new(MaintenanceRequests::Description).text().not_null())
                    .col(ColumnDef::new(MaintenanceRequests::Category).string_len(30).not_null())
                    .col(ColumnDef::new(MaintenanceRequests::Priority).string_len(30).not_null())
                    .col(ColumnDef::new(MaintenanceRequests::Status).string_len(30).not_null())
                    .col(
                        ColumnDef::new(MaintenanceRequests::PermissionToEnter)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(MaintenanceRequests::AssignedTo).string())
                    .col(ColumnDef::new(MaintenanceRequests::ScheduledDate).date())
                    .col(ColumnDef::new(MaintenanceRequests::EstimatedCostCents).big_integer())
                    .col(ColumnDef::new(MaintenanceRequests::ActualCostCents).big_integer())
                    .col(ColumnDef::new(MaintenanceRequests::LandlordNotes).text())
                    .col(
                        ColumnDef::new(MaintenanceRequests::AcknowledgedAt)
                            .timestamp_with_time_zone(),
                    )
                    .col(ColumnDef::new(MaintenanceRequests::CompletedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(MaintenanceRequests::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MaintenanceRequests::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_maintenance_requests_tenant_id")
                            .from(MaintenanceRequests::Table, MaintenanceRequests::TenantId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_maintenance_requests_unit_id")
                            .from(MaintenanceRequests::Table, MaintenanceRequests::UnitId)
                            .to(Units::Table, Units::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_maintenance_requests_unit_id")
                    .table(MaintenanceRequests::Table)
                    .col(MaintenanceRequests::UnitId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_maintenance_requests_tenant_id")
                    .table(MaintenanceRequests::Table)
                    .col(MaintenanceRequests::TenantId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MaintenanceUpdates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MaintenanceUpdates::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MaintenanceUpdates::RequestId).uuid().not_null())
                    .col(ColumnDef::new(MaintenanceUpdates::AuthorId).uuid().not_null())
                    .col(ColumnDef::new(MaintenanceUpdates::Message).text().not_null())
                    .col(ColumnDef::new(MaintenanceUpdates::PreviousStatus).string_len(30))
                    .col(ColumnDef::new(MaintenanceUpdates::NewStatus).string_len(30))
                    .col(
                        ColumnDef::new(MaintenanceUpdates::IsPublic)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(MaintenanceUpdates::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_maintenance_updates_request_id")
                            .from(MaintenanceUpdates::Table, MaintenanceUpdates::RequestId)
                            .to(MaintenanceRequests::Table, MaintenanceRequests::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_maintenance_updates_request_id")
                    .table(MaintenanceUpdates::Table)
                    .col(MaintenanceUpdates::RequestId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MaintenanceUpdates::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MaintenanceRequests::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum MaintenanceRequests {
    Table,
    Id,
    TenantId,
    UnitId,
    Title,
    Description,
    Category,
    Priority,
    Status,
    PermissionToEnter,
    AssignedTo,
    ScheduledDate,
    EstimatedCostCents,
    ActualCostCents,
    LandlordNotes,
    AcknowledgedAt,
    CompletedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum MaintenanceUpdates {
    Table,
    Id,
    RequestId,
    AuthorId,
    Message,
    PreviousStatus,
    NewStatus,
    IsPublic,
    CreatedAt,
}
