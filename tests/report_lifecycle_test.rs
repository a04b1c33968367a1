//! Report lifecycle: creation, assignment and monotonic progress.

mod common;

use std::sync::Arc;

use common::Harness;
use service_report::domain::{
    Actor, AttachPhoto, CreateReport, CustomerInfo, DeviceInfo, PhotoKind, Profile,
    ProgressRequest, ReportStatus, Role,
};
use service_report::errors::AppError;
use service_report::services::ServiceContainer;

struct Crew {
    admin: Actor,
    teknisi: Actor,
    other_teknisi: Actor,
}

async fn crew(h: &Harness) -> Crew {
    let users = h.services.users();
    let profile = |name: &str, email: &str| Profile {
        full_name: name.into(),
        email: email.into(),
        password: "Initial123!".into(),
    };

    let admin = users
        .provision(h.master, Role::Admin, profile("Ani", "ani@corp.com"))
        .await
        .unwrap();
    let admin = Actor {
        id: admin.id,
        role: Role::Admin,
    };
    let teknisi = users
        .provision(admin, Role::Teknisi, profile("Budi", "budi@corp.com"))
        .await
        .unwrap();
    let other = users
        .provision(admin, Role::Teknisi, profile("Citra", "citra@corp.com"))
        .await
        .unwrap();

    Crew {
        admin,
        teknisi: Actor {
            id: teknisi.id,
            role: Role::Teknisi,
        },
        other_teknisi: Actor {
            id: other.id,
            role: Role::Teknisi,
        },
    }
}

fn new_report() -> CreateReport {
    CreateReport {
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
    }
}

fn progress(status: ReportStatus, summary: &str) -> ProgressRequest {
    ProgressRequest {
        status,
        job_summary: summary.into(),
        action_taken: format!("{} - action", summary),
    }
}

#[tokio::test]
async fn test_create_opens_unassigned_report_with_empty_log() {
    let h = Harness::new();
    let c = crew(&h).await;

    let report = h.services.reports().create(c.admin, new_report()).await.unwrap();

    assert_eq!(report.status, ReportStatus::Open);
    assert_eq!(report.teknisi_id, None);
    assert_eq!(report.admin_id, c.admin.id);
    assert!(report.dispatch_no.starts_with("SR-"));
    assert!(report.completed_at.is_none());
    assert_eq!(h.store.log_count(report.id), 0);
}

#[tokio::test]
async fn test_only_admin_creates_reports() {
    let h = Harness::new();
    let c = crew(&h).await;

    for actor in [h.master, c.teknisi] {
        let result = h.services.reports().create(actor, new_report()).await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }
}

#[tokio::test]
async fn test_blank_customer_field_is_validation_error() {
    let h = Harness::new();
    let c = crew(&h).await;
    let mut input = new_report();
    input.customer.name = String::new();

    let result = h.services.reports().create(c.admin, input).await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_full_lifecycle_open_progress_done() {
    let h = Harness::new();
    let c = crew(&h).await;
    let reports = h.services.reports();

    let report = reports.create(c.admin, new_report()).await.unwrap();
    let assigned = reports.assign(c.admin, report.id, c.teknisi.id).await.unwrap();
    assert_eq!(assigned.teknisi_id, Some(c.teknisi.id));
    assert_eq!(assigned.status, ReportStatus::Open);

    let in_progress = reports
        .update_progress(c.teknisi, report.id, progress(ReportStatus::Progress, "diagnosed"))
        .await
        .unwrap();
    assert_eq!(in_progress.status, ReportStatus::Progress);
    assert!(in_progress.completed_at.is_none());
    assert_eq!(h.store.log_count(report.id), 1);

    let done = reports
        .update_progress(c.teknisi, report.id, progress(ReportStatus::Done, "repaired"))
        .await
        .unwrap();
    assert_eq!(done.status, ReportStatus::Done);
    assert!(done.completed_at.is_some());
    assert_eq!(done.action_taken.as_deref(), Some("repaired - action"));

    let detail = reports.detail(c.admin, report.id).await.unwrap();
    let steps: Vec<_> = detail
        .logs
        .iter()
        .map(|l| (l.from_status, l.to_status, l.changed_by))
        .collect();
    assert_eq!(
        steps,
        vec![
            (ReportStatus::Open, ReportStatus::Progress, c.teknisi.id),
            (ReportStatus::Progress, ReportStatus::Done, c.teknisi.id),
        ]
    );
    assert_eq!(detail.logs[0].note.as_deref(), Some("diagnosed"));
}

#[tokio::test]
async fn test_skipping_progress_is_rejected_without_log() {
    let h = Harness::new();
    let c = crew(&h).await;
    let reports = h.services.reports();

    let report = reports.create(c.admin, new_report()).await.unwrap();
    reports.assign(c.admin, report.id, c.teknisi.id).await.unwrap();

    let result = reports
        .update_progress(c.teknisi, report.id, progress(ReportStatus::Done, "rushed"))
        .await;

    assert!(matches!(
        result,
        Err(AppError::InvalidTransition {
            from: ReportStatus::Open,
            to: ReportStatus::Done
        })
    ));
    assert_eq!(h.store.report(report.id).unwrap().status, ReportStatus::Open);
    assert_eq!(h.store.log_count(report.id), 0);
}

#[tokio::test]
async fn test_repeating_or_reversing_status_is_rejected() {
    let h = Harness::new();
    let c = crew(&h).await;
    let reports = h.services.reports();

    let report = reports.create(c.admin, new_report()).await.unwrap();
    reports.assign(c.admin, report.id, c.teknisi.id).await.unwrap();
    reports
        .update_progress(c.teknisi, report.id, progress(ReportStatus::Progress, "diagnosed"))
        .await
        .unwrap();

    for status in [ReportStatus::Progress, ReportStatus::Open] {
        let result = reports
            .update_progress(c.teknisi, report.id, progress(status, "again"))
            .await;
        assert!(matches!(result, Err(AppError::InvalidTransition { .. })));
    }
    assert_eq!(h.store.log_count(report.id), 1);
}

#[tokio::test]
async fn test_unassigned_technician_is_forbidden() {
    let h = Harness::new();
    let c = crew(&h).await;
    let reports = h.services.reports();

    let report = reports.create(c.admin, new_report()).await.unwrap();
    reports.assign(c.admin, report.id, c.teknisi.id).await.unwrap();

    let result = reports
        .update_progress(c.other_teknisi, report.id, progress(ReportStatus::Progress, "hijack"))
        .await;
    assert!(matches!(result, Err(AppError::Forbidden)));

    let admin_attempt = reports
        .update_progress(c.admin, report.id, progress(ReportStatus::Progress, "admin"))
        .await;
    assert!(matches!(admin_attempt, Err(AppError::Forbidden)));

    assert_eq!(h.store.log_count(report.id), 0);
}

#[tokio::test]
async fn test_reassignment_keeps_status_and_moves_ownership() {
    let h = Harness::new();
    let c = crew(&h).await;
    let reports = h.services.reports();

    let report = reports.create(c.admin, new_report()).await.unwrap();
    reports.assign(c.admin, report.id, c.teknisi.id).await.unwrap();
    reports
        .update_progress(c.teknisi, report.id, progress(ReportStatus::Progress, "started"))
        .await
        .unwrap();

    let moved = reports.assign(c.admin, report.id, c.other_teknisi.id).await.unwrap();
    assert_eq!(moved.status, ReportStatus::Progress);
    assert_eq!(moved.teknisi_id, Some(c.other_teknisi.id));

    let previous = reports
        .update_progress(c.teknisi, report.id, progress(ReportStatus::Done, "late"))
        .await;
    assert!(matches!(previous, Err(AppError::Forbidden)));

    reports
        .update_progress(c.other_teknisi, report.id, progress(ReportStatus::Done, "finished"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_assign_records_acting_admin() {
    let h = Harness::new();
    let c = crew(&h).await;
    let reports = h.services.reports();

    let second_admin = h
        .services
        .users()
        .provision(
            h.master,
            Role::Admin,
            Profile {
                full_name: "Dewi".into(),
                email: "dewi@corp.com".into(),
                password: "Initial123!".into(),
            },
        )
        .await
        .unwrap();
    let second_admin = Actor {
        id: second_admin.id,
        role: Role::Admin,
    };

    let report = reports.create(c.admin, new_report()).await.unwrap();
    assert_eq!(report.assigned_by, None);

    let assigned = reports
        .assign(second_admin, report.id, c.teknisi.id)
        .await
        .unwrap();
    assert_eq!(assigned.admin_id, c.admin.id);
    assert_eq!(assigned.assigned_by, Some(second_admin.id));
    assert_eq!(h.store.report(report.id).unwrap().assigned_by, Some(second_admin.id));

    let reassigned = reports.assign(c.admin, report.id, c.other_teknisi.id).await.unwrap();
    assert_eq!(reassigned.assigned_by, Some(c.admin.id));
}

#[tokio::test]
async fn test_done_report_cannot_be_reassigned() {
    let h = Harness::new();
    let c = crew(&h).await;
    let reports = h.services.reports();

    let report = reports.create(c.admin, new_report()).await.unwrap();
    reports.assign(c.admin, report.id, c.teknisi.id).await.unwrap();
    for (status, summary) in [(ReportStatus::Progress, "a"), (ReportStatus::Done, "b")] {
        reports
            .update_progress(c.teknisi, report.id, progress(status, summary))
            .await
            .unwrap();
    }

    let result = reports.assign(c.admin, report.id, c.other_teknisi.id).await;
    assert!(matches!(
        result,
        Err(AppError::InvalidState {
            status: ReportStatus::Done
        })
    ));
}

#[tokio::test]
async fn test_assign_requires_a_technician() {
    let h = Harness::new();
    let c = crew(&h).await;
    let reports = h.services.reports();
    let report = reports.create(c.admin, new_report()).await.unwrap();

    let to_admin = reports.assign(c.admin, report.id, c.admin.id).await;
    assert!(matches!(to_admin, Err(AppError::NotFound("Technician"))));

    let missing_report = reports.assign(c.admin, 9_999, c.teknisi.id).await;
    assert!(matches!(missing_report, Err(AppError::NotFound("Report"))));

    let by_teknisi = reports.assign(c.teknisi, report.id, c.teknisi.id).await;
    assert!(matches!(by_teknisi, Err(AppError::Forbidden)));
}

#[tokio::test]
async fn test_listing_filters_by_status_and_is_repeatable() {
    let h = Harness::new();
    let c = crew(&h).await;
    let reports = h.services.reports();

    let first = reports.create(c.admin, new_report()).await.unwrap();
    let second = reports.create(c.admin, new_report()).await.unwrap();
    assert_ne!(first.dispatch_no, second.dispatch_no);

    reports.assign(c.admin, second.id, c.teknisi.id).await.unwrap();
    reports
        .update_progress(c.teknisi, second.id, progress(ReportStatus::Progress, "x"))
        .await
        .unwrap();

    let all = reports.list(h.master, None).await.unwrap();
    let ids: Vec<i64> = all.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![first.id, second.id]);

    let open = reports.list(c.admin, Some(ReportStatus::Open)).await.unwrap();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].id, first.id);

    let again = reports.list(c.admin, Some(ReportStatus::Open)).await.unwrap();
    assert_eq!(again.len(), open.len());

    let denied = reports.list(c.teknisi, None).await;
    assert!(matches!(denied, Err(AppError::Forbidden)));
}

#[tokio::test]
async fn test_technician_sees_only_assigned_reports() {
    let h = Harness::new();
    let c = crew(&h).await;
    let reports = h.services.reports();

    let mine = reports.create(c.admin, new_report()).await.unwrap();
    let theirs = reports.create(c.admin, new_report()).await.unwrap();
    reports.assign(c.admin, mine.id, c.teknisi.id).await.unwrap();
    reports.assign(c.admin, theirs.id, c.other_teknisi.id).await.unwrap();

    let assigned = reports.list_assigned(c.teknisi).await.unwrap();
    assert_eq!(assigned.len(), 1);
    assert_eq!(assigned[0].id, mine.id);

    let foreign = reports.detail(c.teknisi, theirs.id).await;
    assert!(matches!(foreign, Err(AppError::Forbidden)));
    assert!(reports.detail(c.teknisi, mine.id).await.is_ok());
}

#[tokio::test]
async fn test_assigned_technician_attaches_photos() {
    let h = Harness::new();
    let c = crew(&h).await;
    let reports = h.services.reports();

    let report = reports.create(c.admin, new_report()).await.unwrap();
    reports.assign(c.admin, report.id, c.teknisi.id).await.unwrap();

    let photo = AttachPhoto {
        kind: PhotoKind::Before,
        file_path: "uploads/1/before.jpg".into(),
    };
    reports
        .attach_photo(c.teknisi, report.id, photo.clone())
        .await
        .unwrap();

    let denied = reports.attach_photo(c.other_teknisi, report.id, photo).await;
    assert!(matches!(denied, Err(AppError::Forbidden)));

    let detail = reports.detail(c.admin, report.id).await.unwrap();
    assert_eq!(detail.photos.len(), 1);
    assert_eq!(detail.photos[0].kind, PhotoKind::Before);
}

#[tokio::test]
async fn test_concurrent_progress_updates_apply_once() {
    let h = Harness::new();
    let c = crew(&h).await;
    let reports = h.services.reports();

    let report = reports.create(c.admin, new_report()).await.unwrap();
    reports.assign(c.admin, report.id, c.teknisi.id).await.unwrap();

    let services = Arc::new(h.services);
    let tasks = (0..8).map(|i| {
        let services = services.clone();
        let teknisi = c.teknisi;
        tokio::spawn(async move {
            services
                .reports()
                .update_progress(
                    teknisi,
                    report.id,
                    progress(ReportStatus::Progress, &format!("attempt {}", i)),
                )
                .await
        })
    });

    let results = futures::future::join_all(tasks).await;
    let succeeded = results
        .into_iter()
        .map(|joined| joined.unwrap())
        .filter(Result::is_ok)
        .count();

    assert_eq!(succeeded, 1);
    assert_eq!(h.store.log_count(report.id), 1);
}
