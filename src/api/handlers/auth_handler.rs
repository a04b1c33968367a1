//! Authentication handlers.

use axum::{
    extract::State,
    http::header::SET_COOKIE,
    response::{AppendHeaders, IntoResponse},
    routing::{get, post},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{clear_session_cookie, session_cookie, CurrentUser};
use crate::api::AppState;
use crate::domain::UserResponse;
use crate::errors::{AppError, AppResult};
use crate::services::LoginResponse;
use crate::types::ApiResponse;

/// User login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// User email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "master@corp.com")]
    pub email: String,
    /// User password
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "ChangeMe123!")]
    pub password: String,
}

/// Password recovery request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "budi@corp.com")]
    pub email: String,
}

/// Own profile update
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100, message = "Full name must be 1-100 characters"))]
    #[schema(example = "Budi Santoso")]
    pub full_name: String,
}

/// Own password change
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    #[validate(length(min = 8, message = "New password must be at least 8 characters"))]
    pub new_password: String,
    #[validate(must_match(other = "new_password", message = "Password confirmation does not match"))]
    pub confirm_password: String,
}

/// Public authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/forgot-password", post(forgot_password))
}

/// Routes acting on the caller's own account (require a session)
pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/me", get(me).patch(update_me))
        .route("/auth/change-password", post(change_password))
}

/// Login and receive a session cookie
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful; sets the access_token cookie", body = LoginResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let auth = state.services.auth();
    let response = auth.login(&payload.email, &payload.password).await?;
    let cookie = session_cookie(
        &state.http,
        &response.token.access_token,
        auth.token_lifetime_seconds(),
    )?;

    Ok((AppendHeaders([(SET_COOKIE, cookie)]), ApiResponse::success(response)))
}

/// Drop the session cookie
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    tag = "Authentication",
    responses((status = 200, description = "Cookie cleared", body = crate::types::MessageResponse))
)]
pub async fn logout(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let cookie = clear_session_cookie(&state.http)?;
    Ok((AppendHeaders([(SET_COOKIE, cookie)]), ApiResponse::message("Logged out")))
}

/// Email a temporary password
#[utoipa::path(
    post,
    path = "/api/v1/auth/forgot-password",
    tag = "Authentication",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Temporary password emailed", body = crate::types::MessageResponse),
        (status = 401, description = "Unknown account or recovery failed; password unchanged")
    )
)]
pub async fn forgot_password(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ForgotPasswordRequest>,
) -> AppResult<ApiResponse<()>> {
    state.services.auth().forgot_password(&payload.email).await?;
    Ok(ApiResponse::message("A temporary password has been sent to your email"))
}

/// Get the signed-in account
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Authentication",
    responses(
        (status = 200, description = "Current account", body = UserResponse),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = []))
)]
pub async fn me(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state.services.auth().me(current_user.actor()).await?;
    Ok(ApiResponse::success(UserResponse::from(user)))
}

/// Update the signed-in account's display name
#[utoipa::path(
    patch,
    path = "/api/v1/auth/me",
    tag = "Authentication",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_me(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<UpdateProfileRequest>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state
        .services
        .auth()
        .update_profile(current_user.actor(), payload.full_name)
        .await?;
    Ok(ApiResponse::success(UserResponse::from(user)))
}

/// Change the signed-in account's password
#[utoipa::path(
    post,
    path = "/api/v1/auth/change-password",
    tag = "Authentication",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = crate::types::MessageResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Current password is wrong")
    ),
    security(("bearer_auth" = []))
)]
pub async fn change_password(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<ChangePasswordRequest>,
) -> AppResult<ApiResponse<()>> {
    if payload.current_password.is_empty() {
        return Err(AppError::validation("Current password is required"));
    }

    state
        .services
        .auth()
        .change_password(
            current_user.actor(),
            &payload.current_password,
            &payload.new_password,
        )
        .await?;
    Ok(ApiResponse::message("Password changed"))
}
