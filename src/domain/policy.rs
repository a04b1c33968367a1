//! Authorization policy.
//!
//! [`authorize`] is a pure function of the actor's role and the action
//! (including the ownership facts the action needs). Services call it with
//! the role taken from the verified token, never from request data.

use super::Role;
use crate::errors::{AppError, AppResult};

/// Something an actor wants to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Create an account with the given role
    ProvisionAccount(Role),
    /// Reset the password of an account with the given role
    ResetPassword(Role),
    /// List accounts of the given role
    ListAccounts(Role),
    CreateReport,
    AssignReport,
    ListReports,
    ListAssignedReports,
    UpdateProgress { assigned_to_actor: bool },
    ViewReport { assigned_to_actor: bool },
    AttachPhoto { assigned_to_actor: bool },
    ManageOwnAccount,
    ListPartners,
    ManagePartners,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    RoleNotPermitted,
    NotAssigned,
    RoleFlow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        self == Decision::Allow
    }
}

fn allow_if(cond: bool, reason: DenyReason) -> Decision {
    if cond {
        Decision::Allow
    } else {
        Decision::Deny(reason)
    }
}

/// Decide whether `role` may perform `action`.
pub fn authorize(role: Role, action: Action) -> Decision {
    use DenyReason::*;

    match action {
        Action::ProvisionAccount(target) | Action::ListAccounts(target) => {
            allow_if(role.is_parent_of(target), RoleNotPermitted)
        }
        Action::ResetPassword(target) => allow_if(role.is_parent_of(target), RoleFlow),
        Action::CreateReport | Action::AssignReport => allow_if(role == Role::Admin, RoleNotPermitted),
        Action::ListReports => allow_if(
            matches!(role, Role::MasterAdmin | Role::Admin),
            RoleNotPermitted,
        ),
        Action::ListAssignedReports => allow_if(role == Role::Teknisi, RoleNotPermitted),
        Action::UpdateProgress { assigned_to_actor } | Action::AttachPhoto { assigned_to_actor } => {
            match role {
                Role::Teknisi => allow_if(assigned_to_actor, NotAssigned),
                _ => Decision::Deny(RoleNotPermitted),
            }
        }
        Action::ViewReport { assigned_to_actor } => match role {
            Role::MasterAdmin | Role::Admin => Decision::Allow,
            Role::Teknisi => allow_if(assigned_to_actor, NotAssigned),
        },
        Action::ManageOwnAccount | Action::ListPartners => Decision::Allow,
        Action::ManagePartners => allow_if(
            matches!(role, Role::MasterAdmin | Role::Admin),
            RoleNotPermitted,
        ),
    }
}

/// Run [`authorize`] and turn a denial into the matching error.
///
/// # Errors
/// `InvalidRoleFlow` for a hierarchy violation on a password reset,
/// `Forbidden` for every other denial.
pub fn ensure(role: Role, action: Action) -> AppResult<()> {
    match authorize(role, action) {
        Decision::Allow => Ok(()),
        Decision::Deny(DenyReason::RoleFlow) => {
            let target = match action {
                Action::ResetPassword(target) => target,
                _ => role,
            };
            Err(AppError::InvalidRoleFlow {
                requester: role,
                target,
            })
        }
        Decision::Deny(_) => Err(AppError::Forbidden),
    }
}
