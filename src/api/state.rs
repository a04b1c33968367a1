//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::Database;
use crate::services::{ServiceContainer, Services};

/// HTTP-facing settings taken from configuration
#[derive(Debug, Clone)]
pub struct HttpSettings {
    /// Mark the session cookie `Secure`
    pub cookie_secure: bool,
    pub cookie_domain: Option<String>,
    /// Allowed CORS origin
    pub frontend_url: String,
}

impl From<&Config> for HttpSettings {
    fn from(config: &Config) -> Self {
        Self {
            cookie_secure: config.cookie_secure,
            cookie_domain: config.cookie_domain.clone(),
            frontend_url: config.frontend_url.clone(),
        }
    }
}

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    /// All use cases
    pub services: Arc<dyn ServiceContainer>,
    /// Database handle for health checks (absent in router tests)
    pub database: Option<Arc<Database>>,
    pub http: HttpSettings,
}

impl AppState {
    /// Create application state from database connection and config.
    pub fn from_config(database: Arc<Database>, config: &Config) -> AppResult<Self> {
        let services = Services::from_connection(database.get_connection(), config)?;

        Ok(Self {
            services: Arc::new(services),
            database: Some(database),
            http: HttpSettings::from(config),
        })
    }

    /// Create application state with manually injected services.
    pub fn new(
        services: Arc<dyn ServiceContainer>,
        database: Option<Arc<Database>>,
        http: HttpSettings,
    ) -> Self {
        Self {
            services,
            database,
            http,
        }
    }
}
