//! Migration: service reports with their status logs and photo references.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_roles_and_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ServiceReports::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ServiceReports::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ServiceReports::DispatchNo)
                            .string_len(32)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(ServiceReports::AdminId).big_integer().not_null())
                    .col(ColumnDef::new(ServiceReports::TeknisiId).big_integer().null())
                    .col(ColumnDef::new(ServiceReports::AssignedBy).big_integer().null())
                    .col(ColumnDef::new(ServiceReports::CustomerName).string().not_null())
                    .col(ColumnDef::new(ServiceReports::CustomerAddress).string().not_null())
                    .col(ColumnDef::new(ServiceReports::CustomerContact).string().not_null())
                    .col(ColumnDef::new(ServiceReports::DeviceName).string().not_null())
                    .col(ColumnDef::new(ServiceReports::DeviceSerial).string().not_null())
                    .col(ColumnDef::new(ServiceReports::DeviceLocation).string().not_null())
                    .col(ColumnDef::new(ServiceReports::Complaint).text().not_null())
                    .col(ColumnDef::new(ServiceReports::ActionTaken).text().null())
                    .col(
                        ColumnDef::new(ServiceReports::Status)
                            .string_len(16)
                            .not_null()
                            .default("open"),
                    )
                    .col(
                        ColumnDef::new(ServiceReports::OpenedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ServiceReports::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ServiceReports::CompletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reports_admin")
                            .from(ServiceReports::Table, ServiceReports::AdminId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reports_teknisi")
                            .from(ServiceReports::Table, ServiceReports::TeknisiId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reports_assigned_by")
                            .from(ServiceReports::Table, ServiceReports::AssignedBy)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reports_status")
                    .table(ServiceReports::Table)
                    .col(ServiceReports::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reports_teknisi")
                    .table(ServiceReports::Table)
                    .col(ServiceReports::TeknisiId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(StatusLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StatusLogs::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(StatusLogs::ReportId).big_integer().not_null())
                    .col(ColumnDef::new(StatusLogs::ChangedBy).big_integer().not_null())
                    .col(ColumnDef::new(StatusLogs::FromStatus).string_len(16).not_null())
                    .col(ColumnDef::new(StatusLogs::ToStatus).string_len(16).not_null())
                    .col(ColumnDef::new(StatusLogs::Note).text().null())
                    .col(
                        ColumnDef::new(StatusLogs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_status_logs_report")
                            .from(StatusLogs::Table, StatusLogs::ReportId)
                            .to(ServiceReports::Table, ServiceReports::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_status_logs_user")
                            .from(StatusLogs::Table, StatusLogs::ChangedBy)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_status_logs_report")
                    .table(StatusLogs::Table)
                    .col(StatusLogs::ReportId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ReportPhotos::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ReportPhotos::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ReportPhotos::ReportId).big_integer().not_null())
                    .col(ColumnDef::new(ReportPhotos::Kind).string_len(16).not_null())
                    .col(ColumnDef::new(ReportPhotos::FilePath).string().not_null())
                    .col(
                        ColumnDef::new(ReportPhotos::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_report_photos_report")
                            .from(ReportPhotos::Table, ReportPhotos::ReportId)
                            .to(ServiceReports::Table, ServiceReports::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ReportPhotos::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(StatusLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ServiceReports::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ServiceReports {
    Table,
    Id,
    DispatchNo,
    AdminId,
    TeknisiId,
    AssignedBy,
    CustomerName,
    CustomerAddress,
    CustomerContact,
    DeviceName,
    DeviceSerial,
    DeviceLocation,
    Complaint,
    ActionTaken,
    Status,
    OpenedAt,
    UpdatedAt,
    CompletedAt,
}

#[derive(Iden)]
enum StatusLogs {
    Table,
    Id,
    ReportId,
    ChangedBy,
    FromStatus,
    ToStatus,
    Note,
    CreatedAt,
}

#[derive(Iden)]
enum ReportPhotos {
    Table,
    Id,
    ReportId,
    Kind,
    FilePath,
    CreatedAt,
}
