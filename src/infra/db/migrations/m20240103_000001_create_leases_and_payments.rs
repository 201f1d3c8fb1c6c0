//! Migration: leases and payments.

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
                    .table(Leases::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Leases::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Leases::UnitId).uuid().not_null())
                    .col(ColumnDef::new(Leases::TenantId).uuid().not_null())
                    .col(ColumnDef::new(Leases::StartDate).date().not_null())
                    .col(ColumnDef::new(Leases::EndDate).date().not_null())
                    .col(ColumnDef::new(Leases::RentCents).big_integer().not_null())
                    .col(ColumnDef::new(Leases::DepositCents).big_integer().not_null())
                    .col(ColumnDef::new(Leases::Status).string_len(30).not_null())
                    .col(ColumnDef::new(Leases::Terms).text())
                    .col(ColumnDef::new(Leases::Signature).string())
                    .col(ColumnDef::new(Leases::SignedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Leases::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Leases::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_leases_unit_id")
                            .from(Leases::Table, Leases::UnitId)
                            .to(Units::Table, Units::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_leases_tenant_id")
                            .from(Leases::Table, Leases::TenantId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_leases_unit_id")
                    .table(Leases::Table)
                    .col(Leases::UnitId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_leases_tenant_id")
                    .table(Leases::Table)
                    .col(Leases::TenantId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Payments::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Payments::LeaseId).uuid().not_null())
                    .col(ColumnDef::new(Payments::TenantId).uuid().not_null())
                    .col(ColumnDef::new(Payments::AmountCents).big_integer().not_null())
                    .col(ColumnDef::new(Payments::PaymentType).string_len(30).not_null())
                    .col(ColumnDef::new(Payments::Method).string_len(30).not_null())
                    .col(ColumnDef::new(Payments::Status).string_len(30).not_null())
                    .col(ColumnDef::new(Payments::DueDate).date())
                    .col(ColumnDef::new(Payments::PaidAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Payments::GatewayIntentId).string())
                    .col(ColumnDef::new(Payments::GatewayRefundId).string())
                    .col(ColumnDef::new(Payments::FailureReason).string())
                    .col(ColumnDef::new(Payments::Notes).text())
                    .col(
                        ColumnDef::new(Payments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Payments::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payments_lease_id")
                            .from(Payments::Table, Payments::LeaseId)
                            .to(Leases::Table, Leases::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payments_tenant_id")
                            .from(Payments::Table, Payments::TenantId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_payments_lease_id")
                    .table(Payments::Table)
                    .col(Payments::LeaseId)
                    .to_owned(),
            )
            .await?;

        // Webhook lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_payments_gateway_intent_id")
                    .table(Payments::Table)
                    .col(Payments::GatewayIntentId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Payments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Leases::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Leases {
    Table,
    Id,
    UnitId,
    TenantId,
    StartDate,
    EndDate,
    RentCents,
    DepositCents,
    Status,
    Terms,
    Signature,
    SignedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Payments {
    Table,
    Id,
    LeaseId,
    TenantId,
    AmountCents,
    PaymentType,
    Method,
    Status,
    DueDate,
    PaidAt,
    GatewayIntentId,
    GatewayRefundId,
    FailureReason,
    Notes,
    CreatedAt,
    UpdatedAt,
}
