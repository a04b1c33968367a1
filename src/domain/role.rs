//! Role hierarchy.
//!
//! The set of roles is closed and the hierarchy is fixed:
//! MASTER_ADMIN creates ADMIN, ADMIN creates TEKNISI. Conversion to and from
//! the persisted id/name happens only at the storage and token edges.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::{
    ROLE_ADMIN, ROLE_ADMIN_ID, ROLE_MASTER_ADMIN, ROLE_MASTER_ADMIN_ID, ROLE_TEKNISI,
    ROLE_TEKNISI_ID,
};
use crate::errors::AppError;

/// User roles enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    MasterAdmin,
    Admin,
    Teknisi,
}

impl Role {
    /// All roles, top of the hierarchy first
    pub const ALL: [Role; 3] = [Role::MasterAdmin, Role::Admin, Role::Teknisi];

    /// Persisted role row id
    pub fn id(self) -> i16 {
        match self {
            Role::MasterAdmin => ROLE_MASTER_ADMIN_ID,
            Role::Admin => ROLE_ADMIN_ID,
            Role::Teknisi => ROLE_TEKNISI_ID,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::MasterAdmin => ROLE_MASTER_ADMIN,
            Role::Admin => ROLE_ADMIN,
            Role::Teknisi => ROLE_TEKNISI,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Role::MasterAdmin => "Owns the system and provisions admins",
            Role::Admin => "Creates reports and provisions technicians",
            Role::Teknisi => "Works assigned service reports",
        }
    }

    /// The role that provisions accounts of this role
    pub fn parent(self) -> Option<Role> {
        match self {
            Role::MasterAdmin => None,
            Role::Admin => Some(Role::MasterAdmin),
            Role::Teknisi => Some(Role::Admin),
        }
    }

    /// The role this role provisions
    pub fn child(self) -> Option<Role> {
        match self {
            Role::MasterAdmin => Some(Role::Admin),
            Role::Admin => Some(Role::Teknisi),
            Role::Teknisi => None,
        }
    }

    /// True if `self` sits exactly one level above `other`
    pub fn is_parent_of(self, other: Role) -> bool {
        other.parent() == Some(self)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_MASTER_ADMIN => Ok(Role::MasterAdmin),
            ROLE_ADMIN => Ok(Role::Admin),
            ROLE_TEKNISI => Ok(Role::Teknisi),
            other => Err(AppError::validation(format!("Unknown role: {}", other))),
        }
    }
}

impl TryFrom<i16> for Role {
    type Error = AppError;

    fn try_from(id: i16) -> Result<Self, Self::Error> {
        match id {
            ROLE_MASTER_ADMIN_ID => Ok(Role::MasterAdmin),
            ROLE_ADMIN_ID => Ok(Role::Admin),
            ROLE_TEKNISI_ID => Ok(Role::Teknisi),
            other => Err(AppError::internal(format!("Unknown role id in store: {}", other))),
        }
    }
}
