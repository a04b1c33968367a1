//! Service report lifecycle types.
//!
//! A report moves strictly `open -> progress -> done`. Every status change
//! is recorded as a [`StatusLog`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::password::random_string;
use crate::config::{
    DISPATCH_ALPHABET, DISPATCH_PREFIX, DISPATCH_SUFFIX_LENGTH, PHOTO_KIND_AFTER,
    PHOTO_KIND_BEFORE, PHOTO_KIND_OTHER, STATUS_DONE, STATUS_OPEN, STATUS_PROGRESS,
};
use crate::errors::{AppError, AppResult};

/// Report status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Open,
    Progress,
    Done,
}

impl ReportStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ReportStatus::Open => STATUS_OPEN,
            ReportStatus::Progress => STATUS_PROGRESS,
            ReportStatus::Done => STATUS_DONE,
        }
    }

    /// The only status this one may move to
    pub fn successor(self) -> Option<ReportStatus> {
        match self {
            ReportStatus::Open => Some(ReportStatus::Progress),
            ReportStatus::Progress => Some(ReportStatus::Done),
            ReportStatus::Done => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self.successor().is_none()
    }

    /// Validate a move to `to`.
    ///
    /// # Errors
    /// `InvalidTransition` unless `to` is the direct successor.
    pub fn transition_to(self, to: ReportStatus) -> AppResult<ReportStatus> {
        match self.successor() {
            Some(next) if next == to => Ok(to),
            _ => Err(AppError::InvalidTransition { from: self, to }),
        }
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReportStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            STATUS_OPEN => Ok(ReportStatus::Open),
            STATUS_PROGRESS => Ok(ReportStatus::Progress),
            STATUS_DONE => Ok(ReportStatus::Done),
            other => Err(AppError::validation(format!("Unknown report status: {}", other))),
        }
    }
}

/// Photo kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PhotoKind {
    Before,
    After,
    Other,
}

impl PhotoKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PhotoKind::Before => PHOTO_KIND_BEFORE,
            PhotoKind::After => PHOTO_KIND_AFTER,
            PhotoKind::Other => PHOTO_KIND_OTHER,
        }
    }
}

impl std::str::FromStr for PhotoKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            PHOTO_KIND_BEFORE => Ok(PhotoKind::Before),
            PHOTO_KIND_AFTER => Ok(PhotoKind::After),
            PHOTO_KIND_OTHER => Ok(PhotoKind::Other),
            other => Err(AppError::validation(format!("Unknown photo kind: {}", other))),
        }
    }
}

/// Customer contact block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct CustomerInfo {
    #[validate(length(min = 1, message = "Customer name is required"))]
    #[schema(example = "RS Harapan Sehat")]
    pub name: String,
    #[validate(length(min = 1, message = "Customer address is required"))]
    #[schema(example = "Jl. Merdeka No. 10, Bandung")]
    pub address: String,
    #[validate(length(min = 1, message = "Customer contact is required"))]
    #[schema(example = "022-555-0101")]
    pub contact: String,
}

/// Device under service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct DeviceInfo {
    #[validate(length(min = 1, message = "Device name is required"))]
    #[schema(example = "Patient Monitor PM-900")]
    pub name: String,
    #[validate(length(min = 1, message = "Device serial is required"))]
    #[schema(example = "PM9-00042")]
    pub serial: String,
    #[validate(length(min = 1, message = "Device location is required"))]
    #[schema(example = "ICU Room 3")]
    pub location: String,
}

/// Create report request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateReport {
    #[validate(nested)]
    pub customer: CustomerInfo,
    #[validate(nested)]
    pub device: DeviceInfo,
    #[validate(length(min = 1, message = "Complaint is required"))]
    #[schema(example = "Monitor restarts every few minutes")]
    pub complaint: String,
}

/// Technician progress update request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ProgressRequest {
    /// Target status: must be the direct successor of the current one
    pub status: ReportStatus,
    #[validate(length(min = 1, message = "Job summary is required"))]
    #[schema(example = "Replaced power supply board")]
    pub job_summary: String,
    #[validate(length(min = 1, message = "Action taken is required"))]
    #[schema(example = "PSU swapped, burn-in test passed")]
    pub action_taken: String,
}

/// Photo reference to attach
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AttachPhoto {
    pub kind: PhotoKind,
    #[validate(length(min = 1, max = 500, message = "File path must be 1-500 characters"))]
    #[schema(example = "uploads/reports/42/before-1.jpg")]
    pub file_path: String,
}

/// Service report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceReport {
    pub id: i64,
    #[schema(example = "SR-20250101-K7QX2M")]
    pub dispatch_no: String,
    pub admin_id: i64,
    pub teknisi_id: Option<i64>,
    /// Admin who made the current assignment
    pub assigned_by: Option<i64>,
    pub customer: CustomerInfo,
    pub device: DeviceInfo,
    pub complaint: String,
    pub action_taken: Option<String>,
    pub status: ReportStatus,
    pub opened_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl ServiceReport {
    pub fn is_assigned_to(&self, user_id: i64) -> bool {
        self.teknisi_id == Some(user_id)
    }
}

/// Immutable record of one status change
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatusLog {
    pub id: i64,
    pub report_id: i64,
    pub changed_by: i64,
    pub from_status: ReportStatus,
    pub to_status: ReportStatus,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Photo reference attached to a report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportPhoto {
    pub id: i64,
    pub report_id: i64,
    pub kind: PhotoKind,
    #[schema(example = "uploads/reports/42/before-1.jpg")]
    pub file_path: String,
    pub created_at: DateTime<Utc>,
}

/// Report with its history and photos
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReportDetail {
    #[serde(flatten)]
    pub report: ServiceReport,
    pub logs: Vec<StatusLog>,
    pub photos: Vec<ReportPhoto>,
}

/// Insert payload for a new report
#[derive(Debug, Clone)]
pub struct NewReport {
    pub dispatch_no: String,
    pub admin_id: i64,
    pub customer: CustomerInfo,
    pub device: DeviceInfo,
    pub complaint: String,
}

/// Technician assignment made by an admin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    pub report_id: i64,
    pub teknisi_id: i64,
    pub assigned_by: i64,
    pub at: DateTime<Utc>,
}

/// A validated status change, applied atomically with its log row
#[derive(Debug, Clone)]
pub struct ProgressUpdate {
    pub report_id: i64,
    pub teknisi_id: i64,
    pub from: ReportStatus,
    pub to: ReportStatus,
    pub note: Option<String>,
    pub action_taken: Option<String>,
    pub at: DateTime<Utc>,
}

impl ProgressUpdate {
    /// `completed_at` value to store with this update
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        (self.to == ReportStatus::Done).then_some(self.at)
    }
}

/// Generate a dispatch number `SR-YYYYMMDD-XXXXXX` for the given UTC instant.
pub fn generate_dispatch_no(now: DateTime<Utc>) -> String {
    format!(
        "{}-{}-{}",
        DISPATCH_PREFIX,
        now.format("%Y%m%d"),
        random_string(DISPATCH_ALPHABET, DISPATCH_SUFFIX_LENGTH)
    )
}
