//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion, authorize every call through the domain policy,
//! and reach storage through the Unit of Work.

mod auth_service;
pub mod container;
mod credentials;
mod partner_service;
mod report_service;
#[cfg(test)]
pub(crate) mod testing;
mod token_service;
mod user_service;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use auth_service::{AuthService, Authenticator, LoginResponse};
pub use partner_service::{PartnerDirectory, PartnerService};
pub use report_service::{ReportManager, ReportService};
pub use token_service::{Claims, JwtIssuer, TokenIssuer, TokenResponse};
pub use user_service::{UserManager, UserService};

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
#[cfg(any(test, feature = "test-utils"))]
pub use token_service::MockTokenIssuer;
