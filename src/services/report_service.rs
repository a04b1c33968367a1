//! Report lifecycle service.
//!
//! Every mutation is authorized against the policy first, then checked
//! against the current stored state, then applied with a conditional write
//! so a concurrent change surfaces as `Conflict` instead of being
//! overwritten.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use validator::Validate;

use crate::config::MAX_DISPATCH_ATTEMPTS;
use crate::domain::{
    ensure, generate_dispatch_no, Action, Actor, Assignment, AttachPhoto, CreateReport, NewReport,
    ProgressRequest, ProgressUpdate, ReportDetail, ReportPhoto, ReportStatus, Role, ServiceReport,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[async_trait]
pub trait ReportService: Send + Sync {
    /// Open a new report with a fresh dispatch number
    async fn create(&self, actor: Actor, input: CreateReport) -> AppResult<ServiceReport>;

    /// Assign (or re-assign) a technician. Status is unchanged.
    async fn assign(&self, actor: Actor, report_id: i64, teknisi_id: i64)
        -> AppResult<ServiceReport>;

    /// Advance the status by one step and record it in the log
    async fn update_progress(
        &self,
        actor: Actor,
        report_id: i64,
        input: ProgressRequest,
    ) -> AppResult<ServiceReport>;

    async fn list(&self, actor: Actor, status: Option<ReportStatus>)
        -> AppResult<Vec<ServiceReport>>;

    async fn list_assigned(&self, actor: Actor) -> AppResult<Vec<ServiceReport>>;

    /// Report with its status history and photos
    async fn detail(&self, actor: Actor, report_id: i64) -> AppResult<ReportDetail>;

    async fn attach_photo(
        &self,
        actor: Actor,
        report_id: i64,
        input: AttachPhoto,
    ) -> AppResult<ReportPhoto>;
}

pub struct ReportManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> ReportManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn load(&self, report_id: i64) -> AppResult<ServiceReport> {
        self.uow
            .reports()
            .find_by_id(report_id)
            .await?
            .ok_or_not_found("Report")
    }
}

#[async_trait]
impl<U: UnitOfWork> ReportService for ReportManager<U> {
    async fn create(&self, actor: Actor, input: CreateReport) -> AppResult<ServiceReport> {
        ensure(actor.role, Action::CreateReport)?;
        input.validate()?;

        let reports = self.uow.reports();
        for attempt in 1..=MAX_DISPATCH_ATTEMPTS {
            let draft = NewReport {
                dispatch_no: generate_dispatch_no(Utc::now()),
                admin_id: actor.id,
                customer: input.customer.clone(),
                device: input.device.clone(),
                complaint: input.complaint.clone(),
            };

            match reports.create(draft).await {
                Ok(report) => {
                    tracing::info!(
                        report_id = report.id,
                        dispatch_no = %report.dispatch_no,
                        admin_id = actor.id,
                        "Report created"
                    );
                    return Ok(report);
                }
                Err(AppError::Conflict(_)) => {
                    tracing::warn!(attempt, "Dispatch number collision, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        tracing::error!(
            attempts = MAX_DISPATCH_ATTEMPTS,
            "Could not allocate a unique dispatch number"
        );
        Err(AppError::Conflict(format!(
            "Could not allocate a unique dispatch number after {} attempts",
            MAX_DISPATCH_ATTEMPTS
        )))
    }

    async fn assign(
        &self,
        actor: Actor,
        report_id: i64,
        teknisi_id: i64,
    ) -> AppResult<ServiceReport> {
        ensure(actor.role, Action::AssignReport)?;

        match self.uow.users().find_by_id(teknisi_id).await? {
            Some(user) if user.role == Role::Teknisi && user.is_active() => {}
            _ => return Err(AppError::NotFound("Technician")),
        }

        let report = self.load(report_id).await?;
        if report.status.is_terminal() {
            return Err(AppError::InvalidState {
                status: report.status,
            });
        }

        let reports = self.uow.reports();
        let assignment = Assignment {
            report_id,
            teknisi_id,
            assigned_by: actor.id,
            at: Utc::now(),
        };
        if !reports.assign(assignment).await? {
            // Lost a race: report the state that blocked us.
            let current = self.load(report_id).await?;
            return Err(AppError::InvalidState {
                status: current.status,
            });
        }

        let updated = self.load(report_id).await?;
        tracing::info!(
            report_id,
            teknisi_id,
            assigned_by = actor.id,
            previous_teknisi = ?report.teknisi_id,
            "Technician assigned"
        );
        Ok(updated)
    }

    async fn update_progress(
        &self,
        actor: Actor,
        report_id: i64,
        input: ProgressRequest,
    ) -> AppResult<ServiceReport> {
        input.validate()?;

        let report = self.load(report_id).await?;
        ensure(
            actor.role,
            Action::UpdateProgress {
                assigned_to_actor: report.is_assigned_to(actor.id),
            },
        )?;

        let to = report.status.transition_to(input.status)?;
        let updated = self
            .uow
            .reports()
            .apply_progress(ProgressUpdate {
                report_id,
                teknisi_id: actor.id,
                from: report.status,
                to,
                note: Some(input.job_summary),
                action_taken: Some(input.action_taken),
                at: Utc::now(),
            })
            .await?;

        tracing::info!(
            report_id,
            teknisi_id = actor.id,
            from = %report.status,
            to = %to,
            "Report status changed"
        );
        Ok(updated)
    }

    async fn list(
        &self,
        actor: Actor,
        status: Option<ReportStatus>,
    ) -> AppResult<Vec<ServiceReport>> {
        ensure(actor.role, Action::ListReports)?;
        self.uow.reports().list(status).await
    }

    async fn list_assigned(&self, actor: Actor) -> AppResult<Vec<ServiceReport>> {
        ensure(actor.role, Action::ListAssignedReports)?;
        self.uow.reports().list_assigned(actor.id).await
    }

    async fn detail(&self, actor: Actor, report_id: i64) -> AppResult<ReportDetail> {
        let report = self.load(report_id).await?;
        ensure(
            actor.role,
            Action::ViewReport {
                assigned_to_actor: report.is_assigned_to(actor.id),
            },
        )?;

        let reports = self.uow.reports();
        let (logs, photos) = futures::try_join!(reports.logs(report_id), reports.photos(report_id))?;

        Ok(ReportDetail {
            report,
            logs,
            photos,
        })
    }

    async fn attach_photo(
        &self,
        actor: Actor,
        report_id: i64,
        input: AttachPhoto,
    ) -> AppResult<ReportPhoto> {
        input.validate()?;

        let report = self.load(report_id).await?;
        ensure(
            actor.role,
            Action::AttachPhoto {
                assigned_to_actor: report.is_assigned_to(actor.id),
            },
        )?;

        let photo = self
            .uow
            .reports()
            .add_photo(report_id, input.kind, input.file_path)
            .await?;

        tracing::info!(report_id, photo_id = photo.id, kind = input.kind.as_str(), "Photo attached");
        Ok(photo)
    }
}
