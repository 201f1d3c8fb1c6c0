//! Migration: properties and their units.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Properties::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Properties::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Properties::LandlordId).uuid().not_null())
                    .col(ColumnDef::new(Properties::Name).string().not_null())
                    .col(ColumnDef::new(Properties::PropertyType).string_len(30).not_null())
                    .col(ColumnDef::new(Properties::Status).string_len(30).not_null())
                    .col(ColumnDef::new(Properties::AddressLine1).string().not_null())
                    .col(ColumnDef::new(Properties::AddressLine2).string())
                    .col(ColumnDef::new(Properties::City).string().not_null())
                    .col(ColumnDef::new(Properties::State).string().not_null())
                    .col(ColumnDef::new(Properties::PostalCode).string_len(20).not_null())
                    .col(ColumnDef::new(Properties::Country).string_len(2).not_null())
                    .col(ColumnDef::new(Properties::Description).text())
                    .col(
                        ColumnDef::new(Properties::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Properties::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_properties_landlord_id")
                            .from(Properties::Table, Properties::LandlordId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_properties_landlord_id")
                    .table(Properties::Table)
                    .col(Properties::LandlordId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Units::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Units::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Units::PropertyId).uuid().not_null())
                    .col(ColumnDef::new(Units::UnitNumber).string_len(20).not_null())
                    .col(ColumnDef::new(Units::Bedrooms).integer().not_null())
                    .col(ColumnDef::new(Units::Bathrooms).double().not_null())
                    .col(ColumnDef::new(Units::SquareFeet).integer())
                    .col(ColumnDef::new(Units::RentCents).big_integer().not_null())
                    .col(ColumnDef::new(Units::DepositCents).big_integer().not_null())
                    .col(ColumnDef::new(Units::Status).string_len(30).not_null())
                    .col(
                        ColumnDef::new(Units::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Units::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_units_property_id")
                            .from(Units::Table, Units::PropertyId)
                            .to(Properties::Table, Properties::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One unit number per property
        manager
            .create_index(
                Index::create()
                    .name("idx_units_property_unit_number")
                    .table(Units::Table)
                    .col(Units::PropertyId)
                    .col(Units::UnitNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_units_status")
                    .table(Units::Table)
                    .col(Units::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Units::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Properties::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(super) enum Properties {
    Table,
    Id,
    LandlordId,
    Name,
    PropertyType,
    Status,
    AddressLine1,
    AddressLine2,
    City,
    State,
    PostalCode,
    Country,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub(super) enum Units {
    Table,
    Id,
    PropertyId,
    UnitNumber,
    Bedrooms,
    Bathrooms,
    SquareFeet,
    RentCents,
    DepositCents,
    Status,
    CreatedAt,
    UpdatedAt,
}
