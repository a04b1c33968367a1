//! Application settings loaded from environment variables.

use std::env;

use super::constants::{
    DEFAULT_DATABASE_URL, DEFAULT_FRONTEND_URL, DEFAULT_JWT_EXPIRATION_MINUTES,
    DEFAULT_SEED_MASTER_EMAIL, DEFAULT_SEED_MASTER_NAME, DEFAULT_SEED_MASTER_PASSWORD,
    DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, DEFAULT_SMTP_PORT, MIN_JWT_SECRET_LENGTH,
};
use crate::errors::{AppError, AppResult};

/// SMTP settings. Present only when every field is configured.
#[derive(Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    password: String,
    pub from: String,
}

impl SmtpSettings {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        username: impl Into<String>,
        password: impl Into<String>,
        from: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            username: username.into(),
            password: password.into(),
            from: from.into(),
        }
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl std::fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("from", &self.from)
            .finish()
    }
}

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    jwt_secret: String,
    pub jwt_expiration_minutes: i64,
    pub server_host: String,
    pub server_port: u16,
    pub frontend_url: String,
    pub cookie_secure: bool,
    pub cookie_domain: Option<String>,
    pub seed_master_email: String,
    seed_master_password: String,
    pub seed_master_name: String,
    pub smtp: Option<SmtpSettings>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiration_minutes", &self.jwt_expiration_minutes)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("frontend_url", &self.frontend_url)
            .field("cookie_secure", &self.cookie_secure)
            .field("cookie_domain", &self.cookie_domain)
            .field("seed_master_email", &self.seed_master_email)
            .field("seed_master_password", &"[REDACTED]")
            .field("smtp", &self.smtp)
            .finish()
    }
}

impl Config {
    /// Load configuration from `.env` and the process environment.
    ///
    /// # Errors
    /// Fails if JWT_SECRET is missing in a release build or is too short.
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) => secret,
            Err(_) if cfg!(debug_assertions) => {
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                "dev-secret-key-minimum-32-chars!!".to_string()
            }
            Err(_) => {
                return Err(AppError::internal(
                    "JWT_SECRET environment variable must be set in production",
                ))
            }
        };

        let seed_master_password = seed_master_password(
            env::var("SEED_MASTER_PASSWORD").ok(),
            cfg!(debug_assertions),
        )?;

        Self::builder(jwt_secret)
            .map(|config| Self {
                database_url: env::var("DATABASE_URL")
                    .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
                jwt_expiration_minutes: parse_var("JWT_EXPIRATION_MINUTES")
                    .unwrap_or(DEFAULT_JWT_EXPIRATION_MINUTES),
                server_host: env::var("SERVER_HOST")
                    .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
                server_port: parse_var("SERVER_PORT").unwrap_or(DEFAULT_SERVER_PORT),
                frontend_url: env::var("FRONTEND_URL")
                    .unwrap_or_else(|_| DEFAULT_FRONTEND_URL.to_string()),
                cookie_secure: parse_var("COOKIE_SECURE").unwrap_or(!cfg!(debug_assertions)),
                cookie_domain: env::var("COOKIE_DOMAIN").ok().filter(|d| !d.is_empty()),
                seed_master_email: env::var("SEED_MASTER_EMAIL")
                    .unwrap_or_else(|_| DEFAULT_SEED_MASTER_EMAIL.to_string()),
                seed_master_password,
                seed_master_name: env::var("SEED_MASTER_NAME")
                    .unwrap_or_else(|_| DEFAULT_SEED_MASTER_NAME.to_string()),
                smtp: smtp_from_env(),
                ..config
            })
    }

    /// Build a configuration with development defaults around the given
    /// secret. Used by `from_env` and by tests.
    pub fn builder(jwt_secret: impl Into<String>) -> AppResult<Self> {
        let jwt_secret = jwt_secret.into();
        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(AppError::internal(format!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            )));
        }

        Ok(Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            jwt_secret,
            jwt_expiration_minutes: DEFAULT_JWT_EXPIRATION_MINUTES,
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            frontend_url: DEFAULT_FRONTEND_URL.to_string(),
            cookie_secure: false,
            cookie_domain: None,
            seed_master_email: DEFAULT_SEED_MASTER_EMAIL.to_string(),
            seed_master_password: DEFAULT_SEED_MASTER_PASSWORD.to_string(),
            seed_master_name: DEFAULT_SEED_MASTER_NAME.to_string(),
            smtp: None,
        })
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Password for the bootstrap master account.
    pub fn seed_master_password(&self) -> &str {
        &self.seed_master_password
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| match v.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            tracing::warn!(key, value = %v, "Ignoring unparsable configuration value");
            None
        }
    })
}

/// SMTP is enabled only when host, credentials and sender are all present.
/// Bootstrap master password; the built-in default is for development builds only.
fn seed_master_password(value: Option<String>, allow_default: bool) -> AppResult<String> {
    match value.filter(|v| !v.is_empty()) {
        Some(password) => Ok(password),
        None if allow_default => {
            tracing::warn!("SEED_MASTER_PASSWORD not set, using insecure default for development");
            Ok(DEFAULT_SEED_MASTER_PASSWORD.to_string())
        }
        None => Err(AppError::internal(
            "SEED_MASTER_PASSWORD environment variable must be set in production",
        )),
    }
}

fn smtp_from_env() -> Option<SmtpSettings> {
    let host = env::var("SMTP_HOST").ok().filter(|v| !v.is_empty())?;
    let username = env::var("SMTP_USERNAME").ok().filter(|v| !v.is_empty())?;
    let password = env::var("SMTP_PASSWORD").ok().filter(|v| !v.is_empty())?;
    let from = env::var("SMTP_FROM").ok().filter(|v| !v.is_empty())?;

    Some(SmtpSettings {
        host,
        port: parse_var("SMTP_PORT").unwrap_or(DEFAULT_SMTP_PORT),
        username,
        password,
        from,
    })
}
