//! Bootstrap data: the role rows and the first MASTER_ADMIN.
//!
//! Safe to run on every start. Existing rows are left untouched.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, Set,
};

use crate::config::Config;
use crate::domain::{AccountStatus, Password, Role};
use crate::errors::AppResult;
use crate::infra::repositories::entities::{role, user};

/// What a seeding run inserted
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedOutcome {
    pub roles_inserted: usize,
    pub master_created: bool,
}

/// Insert missing roles and, if no MASTER_ADMIN exists yet, the configured
/// bootstrap account.
pub async fn seed(db: &DatabaseConnection, config: &Config) -> AppResult<SeedOutcome> {
    let mut outcome = SeedOutcome::default();

    for r in Role::ALL {
        if role::Entity::find_by_id(r.id()).one(db).await?.is_some() {
            continue;
        }
        role::ActiveModel {
            id: Set(r.id()),
            name: Set(r.as_str().to_string()),
            description: Set(r.description().to_string()),
        }
        .insert(db)
        .await?;
        outcome.roles_inserted += 1;
    }

    let masters = user::Entity::find()
        .filter(user::Column::RoleId.eq(Role::MasterAdmin.id()))
        .count(db)
        .await?;

    if masters == 0 {
        let password = Password::new(config.seed_master_password())?;
        let now = Utc::now();
        user::ActiveModel {
            id: NotSet,
            role_id: Set(Role::MasterAdmin.id()),
            parent_id: Set(None),
            full_name: Set(config.seed_master_name.clone()),
            email: Set(config.seed_master_email.clone()),
            password_hash: Set(password.into_string()),
            status: Set(AccountStatus::Active.as_str().to_string()),
            last_login_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await?;
        outcome.master_created = true;

        tracing::info!(email = %config.seed_master_email, "Seeded master admin account");
    }

    tracing::info!(
        roles_inserted = outcome.roles_inserted,
        master_created = outcome.master_created,
        "Seeding complete"
    );

    Ok(outcome)
}
