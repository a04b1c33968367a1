//! API middleware.

mod auth;

pub use auth::{auth_middleware, clear_session_cookie, session_cookie, CurrentUser};
