//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.
//! Status, role and photo kind columns hold their fixed string/id forms and
//! are converted to domain enums here.

pub mod partner_location;
pub mod report_photo;
pub mod role;
pub mod service_report;
pub mod status_log;
pub mod user;
