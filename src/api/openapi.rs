//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{auth_handler, partner_handler, report_handler, user_handler};
use crate::config::ACCESS_TOKEN_COOKIE;
use crate::domain::{
    AccountStatus, AttachPhoto, CreateReport, CustomerInfo, DeviceInfo, NewPartnerLocation,
    PartnerLocation, PhotoKind, Profile, ProgressRequest, ReportDetail, ReportPhoto, ReportStatus,
    Role, ServiceReport, StatusLog, TemporaryCredential, UserResponse,
};
use crate::services::{LoginResponse, TokenResponse};
use crate::types::MessageResponse;

/// OpenAPI documentation for the service report API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Service Report API",
        version = "0.1.0",
        description = "Field service reports for medical equipment: accounts, dispatch and technician progress"
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    paths(
        // Authentication endpoints
        auth_handler::login,
        auth_handler::logout,
        auth_handler::forgot_password,
        auth_handler::me,
        auth_handler::update_me,
        auth_handler::change_password,
        // Account endpoints
        user_handler::create_admin,
        user_handler::list_admins,
        user_handler::reset_admin_password,
        user_handler::create_teknisi,
        user_handler::list_teknisi,
        user_handler::reset_teknisi_password,
        // Report endpoints
        report_handler::create_report,
        report_handler::list_reports,
        report_handler::get_report,
        report_handler::assign_report,
        report_handler::attach_photo,
        report_handler::list_assigned_reports,
        report_handler::update_progress,
        // Partner endpoints
        partner_handler::list_partners,
        partner_handler::create_partner,
        partner_handler::delete_partner,
    ),
    components(
        schemas(
            // Domain types
            Role,
            AccountStatus,
            UserResponse,
            Profile,
            TemporaryCredential,
            ReportStatus,
            PhotoKind,
            CustomerInfo,
            DeviceInfo,
            CreateReport,
            ProgressRequest,
            AttachPhoto,
            ServiceReport,
            StatusLog,
            ReportPhoto,
            ReportDetail,
            PartnerLocation,
            NewPartnerLocation,
            // Auth types
            LoginResponse,
            TokenResponse,
            MessageResponse,
            auth_handler::LoginRequest,
            auth_handler::ForgotPasswordRequest,
            auth_handler::UpdateProfileRequest,
            auth_handler::ChangePasswordRequest,
            // Handler request types
            user_handler::ResetPasswordRequest,
            report_handler::AssignRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Sign-in, session cookie and own account"),
        (name = "Accounts", description = "Admin and technician provisioning"),
        (name = "Reports", description = "Service report lifecycle"),
        (name = "Partners", description = "Partner hospital directory")
    )
)]
pub struct ApiDoc;

/// Security schemes: the session cookie, or the same JWT as a Bearer token
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT returned by /api/v1/auth/login"))
                        .build(),
                ),
            );
            components.add_security_scheme(
                "cookie_auth",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(ACCESS_TOKEN_COOKIE))),
            );
        }
    }
}
