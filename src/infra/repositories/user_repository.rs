//! User repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection,
    EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use super::unique_violation_as;
use crate::domain::{AccountStatus, NewUser, Role, User};
use crate::errors::{AppError, AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
///
/// Accounts are never deleted. Email lookups are exact and case-sensitive.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>>;

    /// Find user by exact email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Create a new user. A taken email fails with `Conflict`.
    async fn create(&self, user: NewUser) -> AppResult<User>;

    /// Users of `role`, optionally only those created by `parent_id`,
    /// newest first (ties by id descending)
    async fn list_by_role(&self, role: Role, parent_id: Option<i64>) -> AppResult<Vec<User>>;

    /// Record a successful sign-in
    async fn touch_last_login(&self, id: i64, at: DateTime<Utc>) -> AppResult<()>;

    /// Update the display name
    async fn update_full_name(&self, id: i64, full_name: String) -> AppResult<User>;

    /// Replace the password hash only if it still equals `expected`.
    /// Returns false when another writer got there first.
    async fn swap_password_hash(&self, id: i64, expected: String, new_hash: String)
        -> AppResult<bool>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_users(models: Vec<user::Model>) -> AppResult<Vec<User>> {
    models.into_iter().map(User::try_from).collect()
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let now = Utc::now();
        let active_model = ActiveModel {
            id: NotSet,
            role_id: Set(new_user.role.id()),
            parent_id: Set(new_user.parent_id),
            full_name: Set(new_user.full_name),
            email: Set(new_user.email),
            password_hash: Set(new_user.password_hash),
            status: Set(AccountStatus::Active.as_str().to_string()),
            last_login_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(unique_violation_as("Email"))?;
        User::try_from(model)
    }

    async fn list_by_role(&self, role: Role, parent_id: Option<i64>) -> AppResult<Vec<User>> {
        let mut query = UserEntity::find().filter(user::Column::RoleId.eq(role.id()));
        if let Some(parent_id) = parent_id {
            query = query.filter(user::Column::ParentId.eq(parent_id));
        }

        let models = query
            .order_by_desc(user::Column::CreatedAt)
            .order_by_desc(user::Column::Id)
            .all(&self.db)
            .await?;
        to_users(models)
    }

    async fn touch_last_login(&self, id: i64, at: DateTime<Utc>) -> AppResult<()> {
        UserEntity::update_many()
            .col_expr(user::Column::LastLoginAt, Expr::value(Some(at)))
            .filter(user::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    async fn update_full_name(&self, id: i64, full_name: String) -> AppResult<User> {
        let user = UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found("User")?;

        let mut active: ActiveModel = user.into();
        active.full_name = Set(full_name);
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        User::try_from(model)
    }

    async fn swap_password_hash(
        &self,
        id: i64,
        expected: String,
        new_hash: String,
    ) -> AppResult<bool> {
        let result = UserEntity::update_many()
            .col_expr(user::Column::PasswordHash, Expr::value(new_hash))
            .col_expr(user::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(user::Column::Id.eq(id))
            .filter(user::Column::PasswordHash.eq(expected))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }
}
