//! Service report handlers.

use axum::{
    extract::{Path, Query, State},
    routing::{get, patch, post},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{
    AttachPhoto, CreateReport, ProgressRequest, ReportDetail, ReportPhoto, ReportStatus,
    ServiceReport,
};
use crate::errors::AppResult;
use crate::types::{ApiResponse, Created};

/// Report list filter
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReportQuery {
    /// `open`, `progress` or `done`; empty or absent lists every report
    #[param(example = "open")]
    pub status: Option<String>,
}

impl ReportQuery {
    fn status(&self) -> AppResult<Option<ReportStatus>> {
        match self.status.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => raw.parse::<ReportStatus>().map(Some),
        }
    }
}

/// Technician assignment
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AssignRequest {
    #[validate(range(min = 1, message = "Technician id is required"))]
    #[schema(example = 7)]
    pub teknisi_id: i64,
}

/// Report routes (require a session)
pub fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/reports", post(create_report).get(list_reports))
        .route("/reports/:id", get(get_report))
        .route("/reports/:id/assign", patch(assign_report))
        .route("/reports/:id/photos", post(attach_photo))
        .route("/teknisi/reports", get(list_assigned_reports))
        .route("/teknisi/reports/:id/progress", patch(update_progress))
}

/// Open a new service report
#[utoipa::path(
    post,
    path = "/api/v1/reports",
    tag = "Reports",
    request_body = CreateReport,
    responses(
        (status = 201, description = "Report opened", body = ServiceReport),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Only ADMIN may create reports")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_report(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateReport>,
) -> AppResult<Created<ServiceReport>> {
    let report = state
        .services
        .reports()
        .create(current_user.actor(), payload)
        .await?;
    Ok(Created(report))
}

/// List reports, optionally filtered by status
#[utoipa::path(
    get,
    path = "/api/v1/reports",
    tag = "Reports",
    params(ReportQuery),
    responses(
        (status = 200, description = "Reports in creation order", body = Vec<ServiceReport>),
        (status = 400, description = "Unknown status"),
        (status = 403, description = "Not permitted for this role")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_reports(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<ReportQuery>,
) -> AppResult<ApiResponse<Vec<ServiceReport>>> {
    let status = query.status()?;
    let reports = state
        .services
        .reports()
        .list(current_user.actor(), status)
        .await?;
    Ok(ApiResponse::success(reports))
}

/// Get a report with its status history and photos
#[utoipa::path(
    get,
    path = "/api/v1/reports/{id}",
    tag = "Reports",
    params(("id" = i64, Path, description = "Report ID")),
    responses(
        (status = 200, description = "Report detail", body = ReportDetail),
        (status = 403, description = "Not permitted"),
        (status = 404, description = "Report not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_report(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<ReportDetail>> {
    let detail = state
        .services
        .reports()
        .detail(current_user.actor(), id)
        .await?;
    Ok(ApiResponse::success(detail))
}

/// Assign a technician
#[utoipa::path(
    patch,
    path = "/api/v1/reports/{id}/assign",
    tag = "Reports",
    params(("id" = i64, Path, description = "Report ID")),
    request_body = AssignRequest,
    responses(
        (status = 200, description = "Technician assigned", body = ServiceReport),
        (status = 403, description = "Only ADMIN may assign"),
        (status = 404, description = "Report or technician not found"),
        (status = 409, description = "Report is already done")
    ),
    security(("bearer_auth" = []))
)]
pub async fn assign_report(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<AssignRequest>,
) -> AppResult<ApiResponse<ServiceReport>> {
    let report = state
        .services
        .reports()
        .assign(current_user.actor(), id, payload.teknisi_id)
        .await?;
    Ok(ApiResponse::success(report))
}

/// Attach a photo reference
#[utoipa::path(
    post,
    path = "/api/v1/reports/{id}/photos",
    tag = "Reports",
    params(("id" = i64, Path, description = "Report ID")),
    request_body = AttachPhoto,
    responses(
        (status = 201, description = "Photo attached", body = ReportPhoto),
        (status = 403, description = "Only the assigned technician may attach photos"),
        (status = 404, description = "Report not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn attach_photo(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<AttachPhoto>,
) -> AppResult<Created<ReportPhoto>> {
    let photo = state
        .services
        .reports()
        .attach_photo(current_user.actor(), id, payload)
        .await?;
    Ok(Created(photo))
}

/// Reports assigned to the calling technician
#[utoipa::path(
    get,
    path = "/api/v1/teknisi/reports",
    tag = "Reports",
    responses(
        (status = 200, description = "Assigned reports", body = Vec<ServiceReport>),
        (status = 403, description = "Only TEKNISI has assigned reports")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_assigned_reports(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<ApiResponse<Vec<ServiceReport>>> {
    let reports = state
        .services
        .reports()
        .list_assigned(current_user.actor())
        .await?;
    Ok(ApiResponse::success(reports))
}

/// Advance a report one status step
#[utoipa::path(
    patch,
    path = "/api/v1/teknisi/reports/{id}/progress",
    tag = "Reports",
    params(("id" = i64, Path, description = "Report ID")),
    request_body = ProgressRequest,
    responses(
        (status = 200, description = "Status advanced", body = ServiceReport),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Report is not assigned to the caller"),
        (status = 404, description = "Report not found"),
        (status = 409, description = "Status does not directly follow the current one, or the report changed concurrently")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_progress(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<ProgressRequest>,
) -> AppResult<ApiResponse<ServiceReport>> {
    let report = state
        .services
        .reports()
        .update_progress(current_user.actor(), id, payload)
        .await?;
    Ok(ApiResponse::success(report))
}
