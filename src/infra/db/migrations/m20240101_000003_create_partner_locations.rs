//! Migration: partner hospital directory.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PartnerLocations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PartnerLocations::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PartnerLocations::ProvinceCode).string_len(10).not_null())
                    .col(ColumnDef::new(PartnerLocations::ProvinceName).string_len(100).not_null())
                    .col(ColumnDef::new(PartnerLocations::HospitalName).string_len(200).not_null())
                    .col(ColumnDef::new(PartnerLocations::Address).text().not_null())
                    .col(
                        ColumnDef::new(PartnerLocations::MaintenanceCount)
                            .integer()
                            .not_null()
                            .default(0)
                            .check(Expr::col(PartnerLocations::MaintenanceCount).gte(0)),
                    )
                    .col(
                        ColumnDef::new(PartnerLocations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PartnerLocations::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_partner_locations_province")
                    .table(PartnerLocations::Table)
                    .col(PartnerLocations::ProvinceCode)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PartnerLocations::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum PartnerLocations {
    Table,
    Id,
    ProvinceCode,
    ProvinceName,
    HospitalName,
    Address,
    MaintenanceCount,
    CreatedAt,
    UpdatedAt,
}
