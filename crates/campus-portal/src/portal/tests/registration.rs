use std::sync::Arc;

use super::common::*;
use crate::portal::domain::{
    EventRegistrationRequest, PlacementRegistrationRequest, RegistrationStatus,
};
use crate::portal::{
    DeliveryOutcome, MemoryMailer, MemoryResumeStore, MemoryStore, NotificationKind,
    PortalStore, RegistrationError, RegistrationKind, RegistrationService, ResumeError,
    ResumeFile, ResumeStore, StoreError, ValidationError,
};

fn service<M: crate::portal::Mailer + 'static>(
    store: &Arc<MemoryStore>,
    mailer: M,
) -> RegistrationService<MemoryStore, M> {
    RegistrationService::new(Arc::clone(store), notifier(mailer))
}

fn placement_request(
    student: crate::portal::domain::StudentId,
    placement: crate::portal::domain::PlacementId,
    role: &str,
) -> PlacementRegistrationRequest {
    PlacementRegistrationRequest {
        student,
        placement,
        role_name: role.to_string(),
        resume: Some("resumes/12345.pdf".to_string()),
        resume_name: Some("resume.pdf".to_string()),
    }
}

#[tokio::test]
async fn placement_registration_is_applied_and_confirmed() {
    let store = Arc::new(MemoryStore::new());
    let student = insert_student(&store, "12345", "student@test.com");
    let placement = insert_placement(&store, "TechCorp Solutions", date(2026, 3, 15));
    let mailer = MemoryMailer::default();
    let service = service(&store, mailer.clone());

    let registered = service
        .register_for_placement(placement_request(
            student.id,
            placement.id,
            "Software Engineer",
        ))
        .await
        .expect("registration succeeds");

    assert_eq!(registered.registration.status, RegistrationStatus::Applied);
    assert_eq!(registered.registration.role_name, "Software Engineer");
    assert_eq!(registered.notification, DeliveryOutcome::Delivered);

    let sent = mailer.sent_of(NotificationKind::PlacementConfirmation);
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, vec!["student@test.com".to_string()]);
    assert_eq!(
        sent[0].subject,
        "Placement Drive Registration: TechCorp Solutions"
    );
    assert!(sent[0].body.contains("2026-03-15"));
}

#[tokio::test]
async fn duplicate_placement_registration_is_rejected_without_writing() {
    let store = Arc::new(MemoryStore::new());
    let student = insert_student(&store, "12345", "student@test.com");
    let placement = insert_placement(&store, "TechCorp Solutions", date(2026, 3, 15));
    let mailer = MemoryMailer::default();
    let service = service(&store, mailer.clone());

    service
        .register_for_placement(placement_request(
            student.id,
            placement.id,
            "Software Engineer",
        ))
        .await
        .expect("first registration succeeds");
    let err = service
        .register_for_placement(placement_request(
            student.id,
            placement.id,
            "software engineer ",
        ))
        .await
        .expect_err("second registration rejected");

    assert!(matches!(
        err,
        RegistrationError::DuplicateRegistration(RegistrationKind::Placement)
    ));
    assert_eq!(err.to_string(), "Already registered");
    assert_eq!(
        store
            .placement_registrations_for_placement(placement.id)
            .expect("list")
            .len(),
        1
    );
    assert_eq!(mailer.sent().len(), 1);
}

#[tokio::test]
async fn different_role_on_same_placement_is_allowed() {
    let store = Arc::new(MemoryStore::new());
    let student = insert_student(&store, "12345", "student@test.com");
    let placement = insert_placement(&store, "TechCorp Solutions", date(2026, 3, 15));
    let service = service(&store, MemoryMailer::default());

    for role in ["Software Engineer", "Data Analyst"] {
        service
            .register_for_placement(placement_request(student.id, placement.id, role))
            .await
            .expect("registration succeeds");
    }

    let registrations = store
        .placement_registrations_for_student(student.id)
        .expect("list");
    assert_eq!(registrations.len(), 2);
}

#[tokio::test]
async fn role_must_be_offered_by_the_placement() {
    let store = Arc::new(MemoryStore::new());
    let student = insert_student(&store, "12345", "student@test.com");
    let placement = insert_placement(&store, "TechCorp Solutions", date(2026, 3, 15));
    let service = service(&store, MemoryMailer::default());

    let err = service
        .register_for_placement(placement_request(student.id, placement.id, "Chef"))
        .await
        .expect_err("unknown role rejected");
    assert!(matches!(
        err,
        RegistrationError::Validation(ValidationError::UnknownRole { .. })
    ));

    let err = service
        .register_for_placement(placement_request(student.id, placement.id, "  "))
        .await
        .expect_err("blank role rejected");
    assert!(matches!(
        err,
        RegistrationError::Validation(ValidationError::Required { field: "role_name" })
    ));
    assert!(store.placement_registrations().expect("list").is_empty());
}

#[tokio::test]
async fn unknown_student_or_placement_is_not_found() {
    let store = Arc::new(MemoryStore::new());
    let student = insert_student(&store, "12345", "student@test.com");
    let service = service(&store, MemoryMailer::default());

    let err = service
        .register_for_placement(placement_request(
            student.id,
            crate::portal::domain::PlacementId(999),
            "Software Engineer",
        ))
        .await
        .expect_err("missing placement");
    assert!(matches!(
        err,
        RegistrationError::Store(StoreError::NotFound { id: 999, .. })
    ));
}

#[tokio::test]
async fn mail_failure_keeps_the_registration() {
    let store = Arc::new(MemoryStore::new());
    let student = insert_student(&store, "12345", "student@test.com");
    let placement = insert_placement(&store, "TechCorp Solutions", date(2026, 3, 15));
    let service = service(&store, FailingMailer::default());

    let registered = service
        .register_for_placement(placement_request(
            student.id,
            placement.id,
            "Data Analyst",
        ))
        .await
        .expect("registration survives mail failure");

    assert!(matches!(
        registered.notification,
        DeliveryOutcome::Failed { ref reason } if reason.contains("connection refused")
    ));
    assert_eq!(store.placement_registrations().expect("list").len(), 1);
}

#[tokio::test]
async fn mail_timeout_is_reported_not_raised() {
    let store = Arc::new(MemoryStore::new());
    let student = insert_student(&store, "12345", "student@test.com");
    let (_, hackathon, _) = insert_event(&store, "Tech Symposium 2026", date(2026, 3, 22));
    let service = service(&store, SlowMailer);

    let registered = service
        .register_for_event(EventRegistrationRequest {
            student: student.id,
            competition: hackathon.id,
            event: None,
        })
        .await
        .expect("registration survives slow mail");

    assert!(matches!(
        registered.notification,
        DeliveryOutcome::Failed { ref reason } if reason.contains("timed out")
    ));
    assert_eq!(store.event_registrations().expect("list").len(), 1);
}

#[tokio::test]
async fn event_registration_is_unique_per_competition() {
    let store = Arc::new(MemoryStore::new());
    let student = insert_student(&store, "12345", "student@test.com");
    let (event, hackathon, coding) =
        insert_event(&store, "Tech Symposium 2026", date(2026, 3, 22));
    let mailer = MemoryMailer::default();
    let service = service(&store, mailer.clone());

    let first = service
        .register_for_event(EventRegistrationRequest {
            student: student.id,
            competition: hackathon.id,
            event: Some(event.id),
        })
        .await
        .expect("first registration succeeds");
    assert_eq!(first.registration.event, event.id);

    let err = service
        .register_for_event(EventRegistrationRequest {
            student: student.id,
            competition: hackathon.id,
            event: None,
        })
        .await
        .expect_err("duplicate rejected");
    assert_eq!(err.to_string(), "Already registered for this competition");

    service
        .register_for_event(EventRegistrationRequest {
            student: student.id,
            competition: coding.id,
            event: None,
        })
        .await
        .expect("another competition in the same event succeeds");

    assert_eq!(
        store
            .event_registrations_for_event(event.id)
            .expect("list")
            .len(),
        2
    );
    let subjects: Vec<_> = mailer
        .sent_of(NotificationKind::EventConfirmation)
        .into_iter()
        .map(|email| email.subject)
        .collect();
    assert_eq!(
        subjects,
        vec![
            "Registration Confirmed: Tech Symposium 2026 - Hackathon".to_string(),
            "Registration Confirmed: Tech Symposium 2026 - Coding Contest".to_string(),
        ]
    );
}

#[tokio::test]
async fn event_id_must_own_the_competition() {
    let store = Arc::new(MemoryStore::new());
    let student = insert_student(&store, "12345", "student@test.com");
    let (_, hackathon, _) = insert_event(&store, "Tech Symposium 2026", date(2026, 3, 22));
    let (other, _, _) = insert_event(&store, "Cultural Fest 2026", date(2026, 3, 18));
    let service = service(&store, MemoryMailer::default());

    let err = service
        .register_for_event(EventRegistrationRequest {
            student: student.id,
            competition: hackathon.id,
            event: Some(other.id),
        })
        .await
        .expect_err("mismatch rejected");

    assert!(matches!(
        err,
        RegistrationError::Validation(ValidationError::CompetitionEventMismatch { .. })
    ));
    assert!(store.event_registrations().expect("list").is_empty());
}

#[tokio::test]
async fn status_updates_and_withdrawals() {
    let store = Arc::new(MemoryStore::new());
    let student = insert_student(&store, "12345", "student@test.com");
    let placement = insert_placement(&store, "TechCorp Solutions", date(2026, 3, 15));
    let (_, hackathon, _) = insert_event(&store, "Tech Symposium 2026", date(2026, 3, 22));
    let service = service(&store, MemoryMailer::default());

    let placed = service
        .register_for_placement(placement_request(
            student.id,
            placement.id,
            "Cloud Architect",
        ))
        .await
        .expect("placement registration");
    let entered = service
        .register_for_event(EventRegistrationRequest {
            student: student.id,
            competition: hackathon.id,
            event: None,
        })
        .await
        .expect("event registration");

    let view = service
        .update_placement_status(placed.registration.id, RegistrationStatus::Shortlisted)
        .expect("status updated");
    assert_eq!(view.registration.status, RegistrationStatus::Shortlisted);
    assert_eq!(view.placement_details.details.company_name, "TechCorp Solutions");

    let mine = service.for_student(student.id).expect("student view");
    assert_eq!(mine.placements.len(), 1);
    assert_eq!(mine.events.len(), 1);
    assert_eq!(mine.events[0].competition_details.details.name, "Hackathon");
    assert_eq!(mine.events[0].event_details.competitions.len(), 2);

    service
        .withdraw_placement(placed.registration.id)
        .expect("withdrawn");
    service
        .withdraw_event(entered.registration.id)
        .expect("withdrawn");
    let mine = service.for_student(student.id).expect("student view");
    assert!(mine.placements.is_empty());
    assert!(mine.events.is_empty());

    let err = service
        .withdraw_event(entered.registration.id)
        .expect_err("already gone");
    assert!(matches!(err, RegistrationError::Store(StoreError::NotFound { .. })));
}

fn resume_file(name: &str, body: &'static [u8]) -> ResumeFile {
    ResumeFile {
        file_name: name.to_string(),
        content_type: Some("application/pdf".to_string()),
        bytes: axum::body::Bytes::from_static(body),
    }
}

#[tokio::test]
async fn uploaded_resume_follows_the_registration() {
    let store = Arc::new(MemoryStore::new());
    let student = insert_student(&store, "12345", "student@test.com");
    let placement = insert_placement(&store, "TechCorp Solutions", date(2026, 3, 15));
    let resumes = MemoryResumeStore::new();
    let service = RegistrationService::new(Arc::clone(&store), notifier(MemoryMailer::default()))
        .with_resume_store(Arc::new(resumes.clone()));
    let mut request = placement_request(student.id, placement.id, "Software Engineer");
    request.resume = None;
    request.resume_name = None;

    let registered = service
        .register_with_resume(request.clone(), resume_file("cv.pdf", b"%PDF-1.7"))
        .await
        .expect("registration succeeds");
    let key = registered.registration.resume.clone().expect("resume key");
    assert_eq!(registered.registration.resume_name.as_deref(), Some("cv.pdf"));
    assert_eq!(resumes.len(), 1);
    let stored = service
        .resume(registered.registration.id)
        .expect("resume available");
    assert_eq!(&stored.bytes[..], b"%PDF-1.7");

    let err = service
        .register_with_resume(request, resume_file("second.pdf", b"%PDF-1.7 again"))
        .await
        .expect_err("duplicate rejected");
    assert!(matches!(
        err,
        RegistrationError::DuplicateRegistration(RegistrationKind::Placement)
    ));
    assert_eq!(resumes.len(), 1, "rejected upload is discarded");

    service
        .withdraw_placement(registered.registration.id)
        .expect("withdrawn");
    assert!(resumes.load(&key).expect("load").is_none());
    assert!(resumes.is_empty());
}

#[tokio::test]
async fn empty_resume_and_missing_resume_are_reported() {
    let store = Arc::new(MemoryStore::new());
    let student = insert_student(&store, "12345", "student@test.com");
    let placement = insert_placement(&store, "TechCorp Solutions", date(2026, 3, 15));
    let service = service(&store, MemoryMailer::default());
    let mut request = placement_request(student.id, placement.id, "Data Analyst");
    request.resume = None;

    let err = service
        .register_with_resume(request.clone(), resume_file("empty.pdf", b""))
        .await
        .expect_err("empty upload rejected");
    assert!(matches!(err, RegistrationError::Resume(ResumeError::Empty)));
    assert!(store.placement_registrations().expect("list").is_empty());

    let registered = service
        .register_for_placement(request)
        .await
        .expect("registration without resume");
    let err = service
        .resume(registered.registration.id)
        .expect_err("nothing attached");
    assert!(matches!(err, RegistrationError::NoResume(id) if id == registered.registration.id));
}

#[tokio::test]
async fn cascading_deletes_release_resumes() {
    let harness = harness();
    let services = &harness.services;
    let first = insert_student(&harness.store, "12345", "student@test.com");
    let second = insert_student(&harness.store, "67890", "other@test.com");
    let techcorp = insert_placement(&harness.store, "TechCorp Solutions", date(2026, 3, 15));
    let datavision = insert_placement(&harness.store, "DataVision Analytics", date(2026, 3, 20));

    let upload = move |student, placement| {
        let mut request = placement_request(student, placement, "Data Analyst");
        request.resume = None;
        services
            .registrations
            .register_with_resume(request, resume_file("cv.pdf", b"%PDF-1.7"))
    };
    let by_first = upload(first.id, techcorp.id).await.expect("registered");
    let by_second = upload(second.id, datavision.id).await.expect("registered");
    let first_key = by_first.registration.resume.expect("stored");
    let second_key = by_second.registration.resume.expect("stored");

    services.accounts.delete(first.id).expect("student deleted");
    assert!(services.resumes.load(&first_key).expect("load").is_none());
    assert!(services.resumes.load(&second_key).expect("load").is_some());

    services
        .catalog
        .delete_placement(datavision.id)
        .expect("placement deleted");
    assert!(services.resumes.load(&second_key).expect("load").is_none());

    let reseeded = upload(second.id, techcorp.id).await.expect("registered");
    let key = reseeded.registration.resume.expect("stored");
    services.seed_demo().expect("seeded");
    assert!(services.resumes.load(&key).expect("load").is_none());
}
