//! Migration: users table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(ColumnDef::new(Users::Role).string_len(20).not_null())
                    .col(ColumnDef::new(Users::Status).string_len(20).not_null())
                    .col(ColumnDef::new(Users::Phone).string())
                    .col(ColumnDef::new(Users::DateOfBirth).date())
                    .col(ColumnDef::new(Users::SsnHash).string())
                    .col(ColumnDef::new(Users::SsnLastFour).string_len(4))
                    .col(ColumnDef::new(Users::EmergencyContactName).string())
                    .col(ColumnDef::new(Users::EmergencyContactPhone).string())
                    .col(ColumnDef::new(Users::EmergencyContactRelationship).string())
                    .col(ColumnDef::new(Users::Employer).string())
                    .col(ColumnDef::new(Users::JobTitle).string())
                    .col(ColumnDef::new(Users::MonthlyIncomeCents).big_integer())
                    .col(
                        ColumnDef::new(Users::OnboardingCompleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_users_role")
                    .table(Users::Table)
                    .col(Users::Role)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(super) enum Users {
    Table,
    Id,
    Email,
    PasswordHash,
    Name,
    Role,
    Status,
    Phone,
    DateOfBirth,
    SsnHash,
    SsnLastFour,
    EmergencyContactName,
    EmergencyContactPhone,
    EmergencyContactRelationship,
    Employer,
    JobTitle,
    MonthlyIncomeCents,
    OnboardingCompleted,
    CreatedAt,
    UpdatedAt,
}
