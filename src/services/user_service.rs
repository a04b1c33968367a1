//! User service - account provisioning and management along the role
//! hierarchy.

use async_trait::async_trait;
use std::sync::Arc;
use validator::Validate;

use super::credentials::rotate_password;
use crate::domain::{
    ensure, generate_temporary_password, Action, Actor, NewUser, Password, Profile, Role,
    TemporaryCredential, User,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{Mailer, UnitOfWork};

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Create an account of `role` owned by the actor
    async fn provision(&self, actor: Actor, role: Role, profile: Profile) -> AppResult<User>;

    /// Accounts of `role` visible to the actor, newest first
    async fn list_by_role(&self, actor: Actor, role: Role) -> AppResult<Vec<User>>;

    /// Replace a subordinate's password and email the credential. A
    /// temporary password is generated when none is supplied.
    async fn reset_password(
        &self,
        actor: Actor,
        target_id: i64,
        new_password: Option<String>,
    ) -> AppResult<TemporaryCredential>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
    mailer: Arc<dyn Mailer>,
}

impl<U: UnitOfWork> UserManager<U> {
    pub fn new(uow: Arc<U>, mailer: Arc<dyn Mailer>) -> Self {
        Self { uow, mailer }
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn provision(&self, actor: Actor, role: Role, profile: Profile) -> AppResult<User> {
        ensure(actor.role, Action::ProvisionAccount(role))?;
        profile.validate()?;

        let full_name = profile.full_name.trim().to_string();
        if full_name.is_empty() {
            return Err(AppError::validation("Full name is required"));
        }

        if self.uow.users().find_by_email(&profile.email).await?.is_some() {
            return Err(AppError::already_exists("Email"));
        }

        let password_hash = Password::new(&profile.password)?.into_string();
        let user = self
            .uow
            .users()
            .create(NewUser {
                role,
                parent_id: Some(actor.id),
                full_name,
                email: profile.email,
                password_hash,
            })
            .await?;

        tracing::info!(
            user_id = user.id,
            role = %role,
            parent_id = actor.id,
            "Account provisioned"
        );
        Ok(user)
    }

    async fn list_by_role(&self, actor: Actor, role: Role) -> AppResult<Vec<User>> {
        ensure(actor.role, Action::ListAccounts(role))?;

        // Admins only see the technicians they created.
        let scope = match actor.role {
            Role::MasterAdmin => None,
            _ => Some(actor.id),
        };
        self.uow.users().list_by_role(role, scope).await
    }

    async fn reset_password(
        &self,
        actor: Actor,
        target_id: i64,
        new_password: Option<String>,
    ) -> AppResult<TemporaryCredential> {
        // Roles with nobody below them are refused before the lookup.
        if actor.role.child().is_none() {
            return Err(AppError::Forbidden);
        }

        let target = self
            .uow
            .users()
            .find_by_id(target_id)
            .await?
            .ok_or_not_found("User")?;

        ensure(actor.role, Action::ResetPassword(target.role))?;

        let plain = new_password.unwrap_or_else(generate_temporary_password);
        let credential = rotate_password(
            self.uow.users().as_ref(),
            self.mailer.as_ref(),
            &target,
            plain,
        )
        .await?;

        tracing::info!(
            user_id = target.id,
            reset_by = actor.id,
            "Password reset"
        );
        Ok(credential)
    }
}
