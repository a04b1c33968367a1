//! Service Container - Centralized service access.
//!
//! Handlers reach every use case through [`ServiceContainer`], so tests can
//! swap in a container built over any `UnitOfWork`.

use std::sync::Arc;

use super::{
    AuthService, Authenticator, JwtIssuer, PartnerDirectory, PartnerService, ReportManager,
    ReportService, TokenIssuer, UserManager, UserService,
};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::{mailer, Mailer, Persistence, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    /// Get authentication service
    fn auth(&self) -> Arc<dyn AuthService>;

    /// Get user service
    fn users(&self) -> Arc<dyn UserService>;

    /// Get report lifecycle service
    fn reports(&self) -> Arc<dyn ReportService>;

    /// Get partner directory service
    fn partners(&self) -> Arc<dyn PartnerService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    report_service: Arc<dyn ReportService>,
    partner_service: Arc<dyn PartnerService>,
}

impl Services {
    /// Wire every service over one unit of work
    pub fn new<U: UnitOfWork + 'static>(
        uow: Arc<U>,
        tokens: Arc<dyn TokenIssuer>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            auth_service: Arc::new(Authenticator::new(uow.clone(), tokens, mailer.clone())),
            user_service: Arc::new(UserManager::new(uow.clone(), mailer)),
            report_service: Arc::new(ReportManager::new(uow.clone())),
            partner_service: Arc::new(PartnerDirectory::new(uow)),
        }
    }

    /// Create service container from database connection and config
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: &Config) -> AppResult<Self> {
        let uow = Arc::new(Persistence::new(db));
        let tokens: Arc<dyn TokenIssuer> = Arc::new(JwtIssuer::new(config));
        let mailer = mailer::from_settings(config.smtp.as_ref())?;

        Ok(Self::new(uow, tokens, mailer))
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn reports(&self) -> Arc<dyn ReportService> {
        self.report_service.clone()
    }

    fn partners(&self) -> Arc<dyn PartnerService> {
        self.partner_service.clone()
    }
}
