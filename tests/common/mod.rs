//! Shared fixtures: an in-memory unit of work with the same conditional
//! write semantics as the SeaORM stores, and recording mailers.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use service_report::config::Config;
use service_report::domain::{
    AccountStatus, Actor, Assignment, NewPartnerLocation, NewReport, NewUser, PartnerLocation,
    Password, PhotoKind, ProgressUpdate, ReportPhoto, ReportStatus, Role, ServiceReport,
    StatusLog, User,
};
use service_report::errors::{AppError, AppResult};
use service_report::infra::{
    EmailMessage, Mailer, PartnerRepository, ReportRepository, UnitOfWork, UserRepository,
};
use service_report::services::{JwtIssuer, Services, TokenIssuer};

pub const TEST_SECRET: &str = "integration-test-secret-at-least-32-chars";
pub const MASTER_EMAIL: &str = "master@corp.com";
pub const MASTER_PASSWORD: &str = "MasterPass123!";

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    reports: Vec<ServiceReport>,
    logs: Vec<StatusLog>,
    photos: Vec<ReportPhoto>,
    partners: Vec<PartnerLocation>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory storage shared by all three repositories
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with<T>(&self, f: impl FnOnce(&mut Tables) -> T) -> T {
        let mut guard = self.tables.lock().expect("store mutex poisoned");
        f(&mut guard)
    }

    /// Insert the bootstrap MASTER_ADMIN and return it
    pub fn seed_master(&self) -> User {
        let hash = Password::new(MASTER_PASSWORD).unwrap().into_string();
        self.insert_user(Role::MasterAdmin, None, "Master Admin", MASTER_EMAIL, hash)
    }

    pub fn insert_user(
        &self,
        role: Role,
        parent_id: Option<i64>,
        full_name: &str,
        email: &str,
        password_hash: String,
    ) -> User {
        self.with(|t| {
            let now = Utc::now();
            let user = User {
                id: t.next_id(),
                role,
                parent_id,
                full_name: full_name.to_string(),
                email: email.to_string(),
                password_hash,
                status: AccountStatus::Active,
                last_login_at: None,
                created_at: now,
                updated_at: now,
            };
            t.users.push(user.clone());
            user
        })
    }

    pub fn deactivate(&self, id: i64) {
        self.with(|t| {
            if let Some(user) = t.users.iter_mut().find(|u| u.id == id) {
                user.status = AccountStatus::Inactive;
            }
        })
    }

    pub fn user(&self, id: i64) -> Option<User> {
        self.with(|t| t.users.iter().find(|u| u.id == id).cloned())
    }

    pub fn report(&self, id: i64) -> Option<ServiceReport> {
        self.with(|t| t.reports.iter().find(|r| r.id == id).cloned())
    }

    pub fn log_count(&self, report_id: i64) -> usize {
        self.with(|t| t.logs.iter().filter(|l| l.report_id == report_id).count())
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        Ok(self.user(id))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.with(|t| t.users.iter().find(|u| u.email == email).cloned()))
    }

    async fn create(&self, user: NewUser) -> AppResult<User> {
        self.with(|t| {
            if t.users.iter().any(|u| u.email == user.email) {
                return Err(AppError::already_exists("Email"));
            }
            let now = Utc::now();
            let created = User {
                id: t.next_id(),
                role: user.role,
                parent_id: user.parent_id,
                full_name: user.full_name,
                email: user.email,
                password_hash: user.password_hash,
                status: AccountStatus::Active,
                last_login_at: None,
                created_at: now,
                updated_at: now,
            };
            t.users.push(created.clone());
            Ok(created)
        })
    }

    async fn list_by_role(&self, role: Role, parent_id: Option<i64>) -> AppResult<Vec<User>> {
        Ok(self.with(|t| {
            let mut users: Vec<User> = t
                .users
                .iter()
                .filter(|u| u.role == role)
                .filter(|u| parent_id.map_or(true, |p| u.parent_id == Some(p)))
                .cloned()
                .collect();
            users.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
            users
        }))
    }

    async fn touch_last_login(&self, id: i64, at: DateTime<Utc>) -> AppResult<()> {
        self.with(|t| {
            if let Some(user) = t.users.iter_mut().find(|u| u.id == id) {
                user.last_login_at = Some(at);
            }
        });
        Ok(())
    }

    async fn update_full_name(&self, id: i64, full_name: String) -> AppResult<User> {
        self.with(|t| {
            let user = t
                .users
                .iter_mut()
                .find(|u| u.id == id)
                .ok_or(AppError::NotFound("User"))?;
            user.full_name = full_name;
            user.updated_at = Utc::now();
            Ok(user.clone())
        })
    }

    async fn swap_password_hash(
        &self,
        id: i64,
        expected: String,
        new_hash: String,
    ) -> AppResult<bool> {
        Ok(self.with(|t| {
            match t
                .users
                .iter_mut()
                .find(|u| u.id == id && u.password_hash == expected)
            {
                Some(user) => {
                    user.password_hash = new_hash;
                    user.updated_at = Utc::now();
                    true
                }
                None => false,
            }
        }))
    }
}

#[async_trait]
impl ReportRepository for MemoryStore {
    async fn create(&self, report: NewReport) -> AppResult<ServiceReport> {
        self.with(|t| {
            if t.reports.iter().any(|r| r.dispatch_no == report.dispatch_no) {
                return Err(AppError::already_exists("Dispatch number"));
            }
            let now = Utc::now();
            let created = ServiceReport {
                id: t.next_id(),
                dispatch_no: report.dispatch_no,
                admin_id: report.admin_id,
                teknisi_id: None,
                assigned_by: None,
                customer: report.customer,
                device: report.device,
                complaint: report.complaint,
                action_taken: None,
                status: ReportStatus::Open,
                opened_at: now,
                updated_at: now,
                completed_at: None,
            };
            t.reports.push(created.clone());
            Ok(created)
        })
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<ServiceReport>> {
        Ok(self.report(id))
    }

    async fn assign(&self, assignment: Assignment) -> AppResult<bool> {
        Ok(self.with(|t| {
            match t
                .reports
                .iter_mut()
                .find(|r| r.id == assignment.report_id && r.status != ReportStatus::Done)
            {
                Some(report) => {
                    report.teknisi_id = Some(assignment.teknisi_id);
                    report.assigned_by = Some(assignment.assigned_by);
                    report.updated_at = assignment.at;
                    true
                }
                None => false,
            }
        }))
    }

    async fn apply_progress(&self, update: ProgressUpdate) -> AppResult<ServiceReport> {
        self.with(|t| {
            let log_id = t.next_id();
            let report = t
                .reports
                .iter_mut()
                .find(|r| {
                    r.id == update.report_id
                        && r.status == update.from
                        && r.teknisi_id == Some(update.teknisi_id)
                })
                .ok_or_else(|| AppError::stale("Report"))?;

            report.status = update.to;
            report.updated_at = update.at;
            report.completed_at = update.completed_at();
            if let Some(action_taken) = update.action_taken.clone() {
                report.action_taken = Some(action_taken);
            }
            let updated = report.clone();

            t.logs.push(StatusLog {
                id: log_id,
                report_id: update.report_id,
                changed_by: update.teknisi_id,
                from_status: update.from,
                to_status: update.to,
                note: update.note,
                created_at: update.at,
            });
            Ok(updated)
        })
    }

    async fn list(&self, status: Option<ReportStatus>) -> AppResult<Vec<ServiceReport>> {
        Ok(self.with(|t| {
            t.reports
                .iter()
                .filter(|r| status.map_or(true, |s| r.status == s))
                .cloned()
                .collect()
        }))
    }

    async fn list_assigned(&self, teknisi_id: i64) -> AppResult<Vec<ServiceReport>> {
        Ok(self.with(|t| {
            t.reports
                .iter()
                .filter(|r| r.teknisi_id == Some(teknisi_id))
                .cloned()
                .collect()
        }))
    }

    async fn logs(&self, report_id: i64) -> AppResult<Vec<StatusLog>> {
        Ok(self.with(|t| {
            t.logs
                .iter()
                .filter(|l| l.report_id == report_id)
                .cloned()
                .collect()
        }))
    }

    async fn photos(&self, report_id: i64) -> AppResult<Vec<ReportPhoto>> {
        Ok(self.with(|t| {
            t.photos
                .iter()
                .filter(|p| p.report_id == report_id)
                .cloned()
                .collect()
        }))
    }

    async fn add_photo(
        &self,
        report_id: i64,
        kind: PhotoKind,
        file_path: String,
    ) -> AppResult<ReportPhoto> {
        Ok(self.with(|t| {
            let photo = ReportPhoto {
                id: t.next_id(),
                report_id,
                kind,
                file_path,
                created_at: Utc::now(),
            };
            t.photos.push(photo.clone());
            photo
        }))
    }
}

#[async_trait]
impl PartnerRepository for MemoryStore {
    async fn list(&self, province_code: Option<String>) -> AppResult<Vec<PartnerLocation>> {
        Ok(self.with(|t| {
            let mut partners: Vec<PartnerLocation> = t
                .partners
                .iter()
                .filter(|p| province_code.as_ref().map_or(true, |c| &p.province_code == c))
                .cloned()
                .collect();
            partners.sort_by(|a, b| {
                a.province_name
                    .cmp(&b.province_name)
                    .then_with(|| a.hospital_name.cmp(&b.hospital_name))
            });
            partners
        }))
    }

    async fn create(&self, input: NewPartnerLocation) -> AppResult<PartnerLocation> {
        Ok(self.with(|t| {
            let now = Utc::now();
            let partner = PartnerLocation {
                id: t.next_id(),
                province_code: input.province_code,
                province_name: input.province_name,
                hospital_name: input.hospital_name,
                address: input.address,
                maintenance_count: input.maintenance_count,
                created_at: now,
                updated_at: now,
            };
            t.partners.push(partner.clone());
            partner
        }))
    }

    async fn delete(&self, id: i64) -> AppResult<u64> {
        Ok(self.with(|t| {
            let before = t.partners.len();
            t.partners.retain(|p| p.id != id);
            (before - t.partners.len()) as u64
        }))
    }
}

impl UnitOfWork for MemoryStore {
    fn users(&self) -> Arc<dyn UserRepository> {
        Arc::new(self.clone())
    }

    fn reports(&self) -> Arc<dyn ReportRepository> {
        Arc::new(self.clone())
    }

    fn partners(&self) -> Arc<dyn PartnerRepository> {
        Arc::new(self.clone())
    }
}

/// Mailer that keeps every message it was asked to send
#[derive(Clone, Default)]
pub struct RecordingMailer {
    sent: Arc<Mutex<Vec<EmailMessage>>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().expect("mailer mutex poisoned").clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: EmailMessage) -> AppResult<()> {
        self.sent.lock().expect("mailer mutex poisoned").push(message);
        Ok(())
    }
}

/// Mailer whose SMTP relay is always down
pub struct FailingMailer;

#[async_trait]
impl Mailer for FailingMailer {
    async fn send(&self, _message: EmailMessage) -> AppResult<()> {
        Err(AppError::Delivery("connection refused".into()))
    }
}

pub fn test_config() -> Config {
    Config::builder(TEST_SECRET).unwrap()
}

pub fn token_issuer() -> Arc<dyn TokenIssuer> {
    Arc::new(JwtIssuer::new(&test_config()))
}

/// Everything a test needs: storage, the recording mailer and the services
pub struct Harness {
    pub store: MemoryStore,
    pub mailer: RecordingMailer,
    pub services: Services,
    pub master: Actor,
}

impl Harness {
    pub fn new() -> Self {
        let store = MemoryStore::new();
        let mailer = RecordingMailer::default();
        let master = store.seed_master();
        let services = Services::new(
            Arc::new(store.clone()),
            token_issuer(),
            Arc::new(mailer.clone()),
        );
        Self {
            store,
            mailer,
            services,
            master: Actor {
                id: master.id,
                role: master.role,
            },
        }
    }

    /// Harness whose outbound email always fails
    pub fn with_failing_mailer() -> (MemoryStore, Services, Actor) {
        let store = MemoryStore::new();
        let master = store.seed_master();
        let services = Services::new(
            Arc::new(store.clone()),
            token_issuer(),
            Arc::new(FailingMailer),
        );
        (
            store,
            services,
            Actor {
                id: master.id,
                role: master.role,
            },
        )
    }
}
