//! Account management handlers.
//!
//! MASTER_ADMIN manages `/admins` and ADMIN manages `/teknisi`. The role
//! check itself lives in the service layer.

use axum::{
    extract::{Path, State},
    routing::{get, patch},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{Profile, Role, TemporaryCredential, UserResponse};
use crate::errors::AppResult;
use crate::types::{ApiResponse, Created};

/// Password reset request; omit `new_password` to generate one
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "NewSecret123!")]
    pub new_password: Option<String>,
}

/// Account routes (require a session)
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/admins", get(list_admins).post(create_admin))
        .route("/admins/:id/reset-password", patch(reset_admin_password))
        .route("/teknisi", get(list_teknisi).post(create_teknisi))
        .route("/teknisi/:id/reset-password", patch(reset_teknisi_password))
}

async fn provision(
    state: &AppState,
    user: CurrentUser,
    role: Role,
    profile: Profile,
) -> AppResult<Created<UserResponse>> {
    let account = state
        .services
        .users()
        .provision(user.actor(), role, profile)
        .await?;
    Ok(Created(UserResponse::from(account)))
}

async fn list(
    state: &AppState,
    user: CurrentUser,
    role: Role,
) -> AppResult<ApiResponse<Vec<UserResponse>>> {
    let accounts = state
        .services
        .users()
        .list_by_role(user.actor(), role)
        .await?;
    Ok(ApiResponse::success(
        accounts.into_iter().map(UserResponse::from).collect(),
    ))
}

async fn reset(
    state: &AppState,
    user: CurrentUser,
    id: i64,
    payload: ResetPasswordRequest,
) -> AppResult<ApiResponse<TemporaryCredential>> {
    let credential = state
        .services
        .users()
        .reset_password(user.actor(), id, payload.new_password)
        .await?;
    Ok(ApiResponse::with_message(
        credential,
        "Password reset; the new password was emailed to the account owner",
    ))
}

/// Create an ADMIN account
#[utoipa::path(
    post,
    path = "/api/v1/admins",
    tag = "Accounts",
    request_body = Profile,
    responses(
        (status = 201, description = "Admin created", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Only MASTER_ADMIN may create admins"),
        (status = 409, description = "Email already exists")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_admin(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<Profile>,
) -> AppResult<Created<UserResponse>> {
    provision(&state, current_user, Role::Admin, payload).await
}

/// List ADMIN accounts
#[utoipa::path(
    get,
    path = "/api/v1/admins",
    tag = "Accounts",
    responses(
        (status = 200, description = "Admins, newest first", body = Vec<UserResponse>),
        (status = 403, description = "Only MASTER_ADMIN may list admins")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_admins(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<ApiResponse<Vec<UserResponse>>> {
    list(&state, current_user, Role::Admin).await
}

/// Reset an ADMIN's password
#[utoipa::path(
    patch,
    path = "/api/v1/admins/{id}/reset-password",
    tag = "Accounts",
    params(("id" = i64, Path, description = "Admin account ID")),
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset", body = TemporaryCredential),
        (status = 403, description = "Not permitted for this role"),
        (status = 404, description = "User not found"),
        (status = 502, description = "Email delivery failed; password unchanged")
    ),
    security(("bearer_auth" = []))
)]
pub async fn reset_admin_password(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<ResetPasswordRequest>,
) -> AppResult<ApiResponse<TemporaryCredential>> {
    reset(&state, current_user, id, payload).await
}

/// Create a TEKNISI account
#[utoipa::path(
    post,
    path = "/api/v1/teknisi",
    tag = "Accounts",
    request_body = Profile,
    responses(
        (status = 201, description = "Technician created", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Only ADMIN may create technicians"),
        (status = 409, description = "Email already exists")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_teknisi(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<Profile>,
) -> AppResult<Created<UserResponse>> {
    provision(&state, current_user, Role::Teknisi, payload).await
}

/// List TEKNISI accounts (an ADMIN sees only its own)
#[utoipa::path(
    get,
    path = "/api/v1/teknisi",
    tag = "Accounts",
    responses(
        (status = 200, description = "Technicians, newest first", body = Vec<UserResponse>),
        (status = 403, description = "Not permitted for this role")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_teknisi(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<ApiResponse<Vec<UserResponse>>> {
    list(&state, current_user, Role::Teknisi).await
}

/// Reset a TEKNISI's password
#[utoipa::path(
    patch,
    path = "/api/v1/teknisi/{id}/reset-password",
    tag = "Accounts",
    params(("id" = i64, Path, description = "Technician account ID")),
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset", body = TemporaryCredential),
        (status = 403, description = "Not permitted for this role"),
        (status = 404, description = "User not found"),
        (status = 502, description = "Email delivery failed; password unchanged")
    ),
    security(("bearer_auth" = []))
)]
pub async fn reset_teknisi_password(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<ResetPasswordRequest>,
) -> AppResult<ApiResponse<TemporaryCredential>> {
    reset(&state, current_user, id, payload).await
}
