//! Unit of Work over mockall repositories, for service unit tests.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::{CustomerInfo, DeviceInfo, ReportStatus, ServiceReport};
use crate::infra::{
    MockPartnerRepository, MockReportRepository, MockUserRepository, PartnerRepository,
    ReportRepository, UnitOfWork, UserRepository,
};

pub(crate) struct MockUow {
    pub users: Arc<MockUserRepository>,
    pub reports: Arc<MockReportRepository>,
    pub partners: Arc<MockPartnerRepository>,
}

impl MockUow {
    pub fn new() -> Self {
        Self {
            users: Arc::new(MockUserRepository::new()),
            reports: Arc::new(MockReportRepository::new()),
            partners: Arc::new(MockPartnerRepository::new()),
        }
    }

    pub fn with_reports(reports: MockReportRepository) -> Arc<Self> {
        Arc::new(Self {
            reports: Arc::new(reports),
            ..Self::new()
        })
    }

    pub fn with_partners(partners: MockPartnerRepository) -> Arc<Self> {
        Arc::new(Self {
            partners: Arc::new(partners),
            ..Self::new()
        })
    }
}

impl UnitOfWork for MockUow {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn reports(&self) -> Arc<dyn ReportRepository> {
        self.reports.clone()
    }

    fn partners(&self) -> Arc<dyn PartnerRepository> {
        self.partners.clone()
    }
}

pub(crate) fn sample_report(id: i64, status: ReportStatus, teknisi_id: Option<i64>) -> ServiceReport {
    let now = Utc::now();
    ServiceReport {
        id,
        dispatch_no: format!("SR-20250101-{:06}", id),
        admin_id: 2,
        teknisi_id,
        assigned_by: teknisi_id.map(|_| 2),
        customer: CustomerInfo {
            name: "Jane Doe".into(),
            address: "123 St".into(),
            contact: "555-0100".into(),
        },
        device: DeviceInfo {
            name: "X-Ray Unit".into(),
            serial: "SN-42".into(),
            location: "Room 3".into(),
        },
        complaint: "No image output".into(),
        action_taken: None,
        status,
        opened_at: now,
        updated_at: now,
        completed_at: None,
    }
}
