//! Validated JSON extractor - Combines deserialization with validation.
//!
//! Both malformed JSON and failed `validator` rules are rejected with
//! `AppError::Validation` before the handler runs.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::errors::AppError;

/// Validated JSON extractor that automatically validates requests.
///
/// # Example
///
/// ```rust,ignore
/// use serde::Deserialize;
/// use validator::Validate;
/// use service_report::api::extractors::ValidatedJson;
///
/// #[derive(Deserialize, Validate)]
/// struct AssignRequest {
///     #[validate(range(min = 1))]
///     teknisi_id: i64,
/// }
///
/// async fn assign(ValidatedJson(payload): ValidatedJson<AssignRequest>) {
///     // payload.teknisi_id is already checked
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;

        value.validate()?;

        Ok(ValidatedJson(value))
    }
}
