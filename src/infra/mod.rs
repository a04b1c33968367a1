//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connections, migrations and seeding
//! - Repositories over PostgreSQL
//! - Outbound email
//! - Unit of Work for repository access and transactions

pub mod db;
pub mod mailer;
pub mod repositories;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use mailer::{EmailMessage, LogMailer, Mailer, SmtpMailer};
pub use repositories::{
    PartnerRepository, PartnerStore, ReportRepository, ReportStore, UserRepository, UserStore,
};
pub use unit_of_work::{Persistence, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use mailer::MockMailer;
#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{MockPartnerRepository, MockReportRepository, MockUserRepository};
