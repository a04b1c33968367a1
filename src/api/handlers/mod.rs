//! HTTP request handlers.

pub mod auth_handler;
pub mod partner_handler;
pub mod report_handler;
pub mod user_handler;

pub use auth_handler::{auth_routes, session_routes};
pub use partner_handler::partner_routes;
pub use report_handler::report_routes;
pub use user_handler::user_routes;
