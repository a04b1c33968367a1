//! Session authentication middleware and cookie helpers.
//!
//! The session token is read from the `access_token` cookie, or from an
//! `Authorization: Bearer` header for non-browser clients. The resolved
//! identity comes from the verified token alone.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;

use crate::api::state::HttpSettings;
use crate::api::AppState;
use crate::config::{ACCESS_TOKEN_COOKIE, BEARER_TOKEN_PREFIX};
use crate::domain::{Actor, Role};
use crate::errors::{AppError, AppResult};

/// Authenticated user extracted from the session token
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: i64,
    pub role: Role,
}

impl CurrentUser {
    pub fn actor(self) -> Actor {
        Actor {
            id: self.id,
            role: self.role,
        }
    }
}

fn session_token(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(ACCESS_TOKEN_COOKIE) {
        if !cookie.value().is_empty() {
            return Some(cookie.value().to_string());
        }
    }

    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
        .map(str::to_string)
}

/// Session authentication middleware.
///
/// Validates the session token, then injects the CurrentUser into the
/// request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = session_token(request.headers()).ok_or(AppError::Unauthorized)?;
    let claims = state.services.auth().verify_token(&token)?;

    request.extensions_mut().insert(CurrentUser {
        id: claims.sub,
        role: claims.role,
    });

    Ok(next.run(request).await)
}

fn cookie_attributes(settings: &HttpSettings) -> String {
    let mut attrs = String::from("HttpOnly; SameSite=Lax; Path=/");
    if settings.cookie_secure {
        attrs.push_str("; Secure");
    }
    if let Some(domain) = &settings.cookie_domain {
        attrs.push_str("; Domain=");
        attrs.push_str(domain);
    }
    attrs
}

/// `Set-Cookie` value carrying a fresh session token
pub fn session_cookie(settings: &HttpSettings, token: &str, max_age: i64) -> AppResult<HeaderValue> {
    HeaderValue::from_str(&format!(
        "{}={}; Max-Age={}; {}",
        ACCESS_TOKEN_COOKIE,
        token,
        max_age,
        cookie_attributes(settings)
    ))
    .map_err(|e| AppError::internal(format!("Invalid session cookie: {}", e)))
}

/// `Set-Cookie` value telling the client to drop the session
pub fn clear_session_cookie(settings: &HttpSettings) -> AppResult<HeaderValue> {
    HeaderValue::from_str(&format!(
        "{}=; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT; {}",
        ACCESS_TOKEN_COOKIE,
        cookie_attributes(settings)
    ))
    .map_err(|e| AppError::internal(format!("Invalid session cookie: {}", e)))
}
