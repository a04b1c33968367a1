//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.

pub(crate) mod entities;
mod partner_repository;
mod report_repository;
mod user_repository;

pub use partner_repository::{PartnerRepository, PartnerStore};
pub use report_repository::{ReportRepository, ReportStore};
pub use user_repository::{UserRepository, UserStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use partner_repository::MockPartnerRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use report_repository::MockReportRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;

use crate::errors::AppError;

/// Map a unique-constraint violation to `Conflict` naming `entity`;
/// any other database error passes through.
pub(crate) fn unique_violation_as(entity: &'static str) -> impl Fn(sea_orm::DbErr) -> AppError {
    move |err| {
        if AppError::is_unique_violation(&err) {
            AppError::already_exists(entity)
        } else {
            AppError::from(err)
        }
    }
}
