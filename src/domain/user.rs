//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::Role;
use crate::config::{ACCOUNT_STATUS_ACTIVE, ACCOUNT_STATUS_INACTIVE};

/// Account status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Inactive,
}

impl AccountStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AccountStatus::Active => ACCOUNT_STATUS_ACTIVE,
            AccountStatus::Inactive => ACCOUNT_STATUS_INACTIVE,
        }
    }
}

impl From<&str> for AccountStatus {
    fn from(s: &str) -> Self {
        match s {
            ACCOUNT_STATUS_INACTIVE => AccountStatus::Inactive,
            _ => AccountStatus::Active,
        }
    }
}

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub role: Role,
    /// Account that provisioned this one (None for the seeded master)
    pub parent_id: Option<i64>,
    pub full_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub status: AccountStatus,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }
}

/// The authenticated caller, as established from a verified token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: i64,
    pub role: Role,
}

/// Data for a new account. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub role: Role,
    pub parent_id: Option<i64>,
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
}

/// Profile supplied when provisioning an account
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct Profile {
    #[validate(length(min = 1, max = 100, message = "Full name must be 1-100 characters"))]
    #[schema(example = "Budi Santoso")]
    pub full_name: String,
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "budi@corp.com")]
    pub email: String,
    /// Initial password (minimum 8 characters)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "SecurePass123!", min_length = 8)]
    pub password: String,
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = 7)]
    pub id: i64,
    #[schema(example = "Budi Santoso")]
    pub full_name: String,
    #[schema(example = "budi@corp.com")]
    pub email: String,
    pub role: Role,
    pub parent_id: Option<i64>,
    pub status: AccountStatus,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name,
            email: user.email,
            role: user.role,
            parent_id: user.parent_id,
            status: user.status,
            last_login_at: user.last_login_at,
            created_at: user.created_at,
        }
    }
}

/// Plain-text credential handed back once after a reset
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TemporaryCredential {
    pub user_id: i64,
    #[schema(example = "aB3$kP9mQx2Z")]
    pub temporary_password: String,
}
