//! Service report repository: reports, their status logs and photos.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection,
    EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::entities::{
    report_photo::{self, Entity as PhotoEntity},
    service_report::{self, Entity as ReportEntity},
    status_log::{self, Entity as LogEntity},
};
use super::unique_violation_as;
use crate::domain::{
    Assignment, NewReport, PhotoKind, ProgressUpdate, ReportPhoto, ReportStatus, ServiceReport,
    StatusLog,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::unit_of_work::transaction;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Insert a new open report. A taken dispatch number fails with `Conflict`.
    async fn create(&self, report: NewReport) -> AppResult<ServiceReport>;

    async fn find_by_id(&self, id: i64) -> AppResult<Option<ServiceReport>>;

    /// Set the technician and the assigning admin unless the report is done.
    /// Returns false when no row matched.
    async fn assign(&self, assignment: Assignment) -> AppResult<bool>;

    /// Apply a status change and append its log row atomically.
    ///
    /// The update only matches while the report is still at `update.from`
    /// and assigned to `update.teknisi_id`; otherwise nothing is written and
    /// `Conflict` is returned.
    async fn apply_progress(&self, update: ProgressUpdate) -> AppResult<ServiceReport>;

    /// All reports, optionally filtered by status, by id ascending
    async fn list(&self, status: Option<ReportStatus>) -> AppResult<Vec<ServiceReport>>;

    /// Reports assigned to a technician, by id ascending
    async fn list_assigned(&self, teknisi_id: i64) -> AppResult<Vec<ServiceReport>>;

    /// Status history of a report, oldest first
    async fn logs(&self, report_id: i64) -> AppResult<Vec<StatusLog>>;

    async fn photos(&self, report_id: i64) -> AppResult<Vec<ReportPhoto>>;

    async fn add_photo(
        &self,
        report_id: i64,
        kind: PhotoKind,
        file_path: String,
    ) -> AppResult<ReportPhoto>;
}

pub struct ReportStore {
    db: DatabaseConnection,
}

impl ReportStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_reports(models: Vec<service_report::Model>) -> AppResult<Vec<ServiceReport>> {
    models.into_iter().map(ServiceReport::try_from).collect()
}

#[async_trait]
impl ReportRepository for ReportStore {
    async fn create(&self, report: NewReport) -> AppResult<ServiceReport> {
        let now = Utc::now();
        let active_model = service_report::ActiveModel {
            id: NotSet,
            dispatch_no: Set(report.dispatch_no),
            admin_id: Set(report.admin_id),
            teknisi_id: Set(None),
            assigned_by: Set(None),
            customer_name: Set(report.customer.name),
            customer_address: Set(report.customer.address),
            customer_contact: Set(report.customer.contact),
            device_name: Set(report.device.name),
            device_serial: Set(report.device.serial),
            device_location: Set(report.device.location),
            complaint: Set(report.complaint),
            action_taken: Set(None),
            status: Set(ReportStatus::Open.as_str().to_string()),
            opened_at: Set(now),
            updated_at: Set(now),
            completed_at: Set(None),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(unique_violation_as("Dispatch number"))?;
        ServiceReport::try_from(model)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<ServiceReport>> {
        ReportEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(ServiceReport::try_from)
            .transpose()
    }

    async fn assign(&self, assignment: Assignment) -> AppResult<bool> {
        let result = ReportEntity::update_many()
            .col_expr(
                service_report::Column::TeknisiId,
                Expr::value(Some(assignment.teknisi_id)),
            )
            .col_expr(
                service_report::Column::AssignedBy,
                Expr::value(Some(assignment.assigned_by)),
            )
            .col_expr(service_report::Column::UpdatedAt, Expr::value(assignment.at))
            .filter(service_report::Column::Id.eq(assignment.report_id))
            .filter(service_report::Column::Status.ne(ReportStatus::Done.as_str()))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }

    async fn apply_progress(&self, update: ProgressUpdate) -> AppResult<ServiceReport> {
        transaction(&self.db, |txn| {
            Box::pin(async move {
                let mut query = ReportEntity::update_many()
                    .col_expr(service_report::Column::Status, Expr::value(update.to.as_str()))
                    .col_expr(service_report::Column::UpdatedAt, Expr::value(update.at))
                    .col_expr(
                        service_report::Column::CompletedAt,
                        Expr::value(update.completed_at()),
                    );
                if let Some(action_taken) = update.action_taken.clone() {
                    query = query.col_expr(
                        service_report::Column::ActionTaken,
                        Expr::value(action_taken),
                    );
                }

                let result = query
                    .filter(service_report::Column::Id.eq(update.report_id))
                    .filter(service_report::Column::Status.eq(update.from.as_str()))
                    .filter(service_report::Column::TeknisiId.eq(update.teknisi_id))
                    .exec(txn)
                    .await?;

                if result.rows_affected != 1 {
                    return Err(AppError::stale("Report"));
                }

                status_log::ActiveModel {
                    id: NotSet,
                    report_id: Set(update.report_id),
                    changed_by: Set(update.teknisi_id),
                    from_status: Set(update.from.as_str().to_string()),
                    to_status: Set(update.to.as_str().to_string()),
                    note: Set(update.note),
                    created_at: Set(update.at),
                }
                .insert(txn)
                .await?;

                let model = ReportEntity::find_by_id(update.report_id)
                    .one(txn)
                    .await?
                    .ok_or_not_found("Report")?;
                ServiceReport::try_from(model)
            })
        })
        .await
    }

    async fn list(&self, status: Option<ReportStatus>) -> AppResult<Vec<ServiceReport>> {
        let mut query = ReportEntity::find();
        if let Some(status) = status {
            query = query.filter(service_report::Column::Status.eq(status.as_str()));
        }

        let models = query
            .order_by_asc(service_report::Column::Id)
            .all(&self.db)
            .await?;
        to_reports(models)
    }

    async fn list_assigned(&self, teknisi_id: i64) -> AppResult<Vec<ServiceReport>> {
        let models = ReportEntity::find()
            .filter(service_report::Column::TeknisiId.eq(teknisi_id))
            .order_by_asc(service_report::Column::Id)
            .all(&self.db)
            .await?;
        to_reports(models)
    }

    async fn logs(&self, report_id: i64) -> AppResult<Vec<StatusLog>> {
        LogEntity::find()
            .filter(status_log::Column::ReportId.eq(report_id))
            .order_by_asc(status_log::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(StatusLog::try_from)
            .collect()
    }

    async fn photos(&self, report_id: i64) -> AppResult<Vec<ReportPhoto>> {
        PhotoEntity::find()
            .filter(report_photo::Column::ReportId.eq(report_id))
            .order_by_asc(report_photo::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(ReportPhoto::try_from)
            .collect()
    }

    async fn add_photo(
        &self,
        report_id: i64,
        kind: PhotoKind,
        file_path: String,
    ) -> AppResult<ReportPhoto> {
        let model = report_photo::ActiveModel {
            id: NotSet,
            report_id: Set(report_id),
            kind: Set(kind.as_str().to_string()),
            file_path: Set(file_path),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await?;

        ReportPhoto::try_from(model)
    }
}
