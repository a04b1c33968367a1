//! Partner hospital directory handlers.

use axum::{
    extract::{Path, Query, State},
    routing::{delete, get},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{NewPartnerLocation, PartnerLocation};
use crate::errors::AppResult;
use crate::types::{ApiResponse, Created, NoContent};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PartnerQuery {
    /// Restrict to one province
    #[param(example = "32")]
    pub province_code: Option<String>,
}

pub fn partner_routes() -> Router<AppState> {
    Router::new()
        .route("/partners", get(list_partners).post(create_partner))
        .route("/partners/:id", delete(delete_partner))
}

/// List partner hospitals
#[utoipa::path(
    get,
    path = "/api/v1/partners",
    tag = "Partners",
    params(PartnerQuery),
    responses((status = 200, description = "Partner locations by province, then hospital", body = Vec<PartnerLocation>)),
    security(("bearer_auth" = []))
)]
pub async fn list_partners(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<PartnerQuery>,
) -> AppResult<ApiResponse<Vec<PartnerLocation>>> {
    let partners = state
        .services
        .partners()
        .list(current_user.actor(), query.province_code)
        .await?;
    Ok(ApiResponse::success(partners))
}

/// Add a partner hospital
#[utoipa::path(
    post,
    path = "/api/v1/partners",
    tag = "Partners",
    request_body = NewPartnerLocation,
    responses(
        (status = 201, description = "Partner location added", body = PartnerLocation),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Technicians cannot manage partners")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_partner(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<NewPartnerLocation>,
) -> AppResult<Created<PartnerLocation>> {
    let partner = state
        .services
        .partners()
        .create(current_user.actor(), payload)
        .await?;
    Ok(Created(partner))
}

/// Remove a partner hospital
#[utoipa::path(
    delete,
    path = "/api/v1/partners/{id}",
    tag = "Partners",
    params(("id" = i64, Path, description = "Partner location ID")),
    responses(
        (status = 204, description = "Removed"),
        (status = 403, description = "Technicians cannot manage partners"),
        (status = 404, description = "Partner location not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_partner(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<NoContent> {
    state
        .services
        .partners()
        .delete(current_user.actor(), id)
        .await?;
    Ok(NoContent)
}
