//! Domain layer - Core business entities and logic
//!
//! This module contains the core domain models that represent
//! business concepts independent of infrastructure concerns:
//! the role hierarchy, the report lifecycle and the authorization policy.

pub mod partner;
pub mod password;
pub mod policy;
pub mod report;
pub mod role;
pub mod user;

pub use partner::{NewPartnerLocation, PartnerLocation};
pub use password::{generate_temporary_password, Password};
pub use policy::{authorize, ensure, Action, Decision, DenyReason};
pub use report::{
    generate_dispatch_no, Assignment, AttachPhoto, CreateReport, CustomerInfo, DeviceInfo, NewReport,
    PhotoKind, ProgressRequest, ProgressUpdate, ReportDetail, ReportPhoto, ReportStatus,
    ServiceReport, StatusLog,
};
pub use role::Role;
pub use user::{AccountStatus, Actor, NewUser, Profile, TemporaryCredential, User, UserResponse};
