//! Authentication service - sign-in, session tokens and self-service account
//! operations.
//!
//! Credential failures are uniform: unknown email, wrong password and
//! inactive account all produce `InvalidCredentials`.

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use super::credentials::rotate_password;
use super::token_service::{Claims, TokenIssuer, TokenResponse};
use crate::config::DUMMY_PASSWORD_HASH;
use crate::domain::{
    ensure, generate_temporary_password, Action, Actor, Password, TemporaryCredential, User,
    UserResponse,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{Mailer, UnitOfWork};

/// Successful sign-in
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub token: TokenResponse,
    pub user: UserResponse,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Check credentials and return the account
    async fn authenticate(&self, email: &str, password: &str) -> AppResult<User>;

    /// Authenticate and issue a session token
    async fn login(&self, email: &str, password: &str) -> AppResult<LoginResponse>;

    /// Verify a session token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;

    /// Token lifetime in seconds (cookie Max-Age)
    fn token_lifetime_seconds(&self) -> i64;

    /// The caller's own account
    async fn me(&self, actor: Actor) -> AppResult<User>;

    async fn update_profile(&self, actor: Actor, full_name: String) -> AppResult<User>;

    async fn change_password(
        &self,
        actor: Actor,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<()>;

    /// Issue and email a temporary password for the account with this email
    async fn forgot_password(&self, email: &str) -> AppResult<TemporaryCredential>;
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    tokens: Arc<dyn TokenIssuer>,
    mailer: Arc<dyn Mailer>,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, tokens: Arc<dyn TokenIssuer>, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            uow,
            tokens,
            mailer,
        }
    }

    async fn active_user(&self, id: i64) -> AppResult<User> {
        match self.uow.users().find_by_id(id).await? {
            Some(user) if user.is_active() => Ok(user),
            _ => Err(AppError::Unauthorized),
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn authenticate(&self, email: &str, password: &str) -> AppResult<User> {
        let user = self.uow.users().find_by_email(email).await?;

        // Verify against a dummy hash on a miss so response time does not
        // reveal whether the email exists.
        let stored = Password::from_hash(
            user.as_ref()
                .map_or(DUMMY_PASSWORD_HASH, |u| u.password_hash.as_str())
                .to_string(),
        );
        let password_valid = stored.verify(password);

        let user = match user {
            Some(user) if password_valid && user.is_active() => user,
            _ => return Err(AppError::InvalidCredentials),
        };

        let now = Utc::now();
        if let Err(e) = self.uow.users().touch_last_login(user.id, now).await {
            tracing::warn!(user_id = user.id, error = %e, "Failed to record last login");
        }

        Ok(User {
            last_login_at: Some(now),
            ..user
        })
    }

    async fn login(&self, email: &str, password: &str) -> AppResult<LoginResponse> {
        let user = self.authenticate(email, password).await?;
        let token = self.tokens.issue(&user)?;

        tracing::info!(user_id = user.id, role = %user.role, "User signed in");

        Ok(LoginResponse {
            token,
            user: UserResponse::from(user),
        })
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        self.tokens.verify(token)
    }

    fn token_lifetime_seconds(&self) -> i64 {
        self.tokens.lifetime_seconds()
    }

    async fn me(&self, actor: Actor) -> AppResult<User> {
        ensure(actor.role, Action::ManageOwnAccount)?;
        self.uow
            .users()
            .find_by_id(actor.id)
            .await?
            .ok_or_not_found("User")
    }

    async fn update_profile(&self, actor: Actor, full_name: String) -> AppResult<User> {
        ensure(actor.role, Action::ManageOwnAccount)?;

        let full_name = full_name.trim().to_string();
        if full_name.is_empty() {
            return Err(AppError::validation("Full name is required"));
        }

        self.uow.users().update_full_name(actor.id, full_name).await
    }

    async fn change_password(
        &self,
        actor: Actor,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        ensure(actor.role, Action::ManageOwnAccount)?;

        let user = self.active_user(actor.id).await?;
        if !Password::from_hash(user.password_hash.clone()).verify(current_password) {
            return Err(AppError::InvalidCredentials);
        }

        let new_hash = Password::new(new_password)?.into_string();
        if !self
            .uow
            .users()
            .swap_password_hash(user.id, user.password_hash, new_hash)
            .await?
        {
            return Err(AppError::stale("User"));
        }

        tracing::info!(user_id = actor.id, "Password changed");
        Ok(())
    }

    async fn forgot_password(&self, email: &str) -> AppResult<TemporaryCredential> {
        // Every failure looks the same to the caller so accounts cannot be enumerated.
        let user = match self.uow.users().find_by_email(email).await {
            Ok(Some(user)) if user.is_active() => user,
            Ok(_) => return Err(AppError::InvalidCredentials),
            Err(e) => {
                tracing::error!(error = %e, "Account lookup failed during recovery");
                return Err(AppError::InvalidCredentials);
            }
        };

        let credential = rotate_password(
            self.uow.users().as_ref(),
            self.mailer.as_ref(),
            &user,
            generate_temporary_password(),
        )
        .await
        .map_err(|e| {
            tracing::warn!(user_id = user.id, error = %e, "Password recovery failed");
            AppError::InvalidCredentials
        })?;

        tracing::info!(user_id = user.id, "Temporary password issued by recovery");
        Ok(credential)
    }
}
