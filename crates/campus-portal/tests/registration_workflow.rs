//! End-to-end registration scenarios driven through the public service facade.

mod common {
    use std::sync::Arc;
    use std::time::Duration;

    use campus_portal::config::MailConfig;
    use campus_portal::portal::{
        Credentials, MemoryMailer, MemoryStore, Notifier, PortalServices, PortalStore,
    };

    pub(super) type Portal = PortalServices<MemoryStore, MemoryMailer>;

    pub(super) fn portal() -> (Arc<Portal>, MemoryMailer) {
        let store = Arc::new(MemoryStore::new());
        let mailer = MemoryMailer::default();
        let notifier = Notifier::new(
            Arc::new(mailer.clone()),
            &MailConfig {
                from_address: "placements@college.edu".to_string(),
                send_timeout: Duration::from_secs(1),
            },
        );
        let credentials = Credentials::with_cost(1024, 1).expect("valid argon2 params");
        let portal = Arc::new(PortalServices::new(store, notifier, credentials));
        portal.seed_demo().expect("demo data seeded");
        (portal, mailer)
    }

    pub(super) fn placement_named(portal: &Portal, company: &str) -> u64 {
        portal
            .store
            .placements()
            .expect("list placements")
            .into_iter()
            .find(|placement| placement.details.company_name == company)
            .map(|placement| placement.id.0)
            .expect("seeded placement")
    }
}

use campus_portal::portal::domain::{
    LoginRequest, PlacementId, PlacementRegistrationRequest, StudentId,
};
use campus_portal::portal::{NotificationKind, PortalStore, RegistrationError};
use chrono::NaiveDate;

fn request(student: StudentId, placement: u64, role: &str) -> PlacementRegistrationRequest {
    PlacementRegistrationRequest {
        student,
        placement: PlacementId(placement),
        role_name: role.to_string(),
        resume: None,
        resume_name: None,
    }
}

#[tokio::test]
async fn demo_student_registers_and_gets_reminded() {
    let (portal, mailer) = common::portal();
    let student = portal
        .accounts
        .login(&LoginRequest {
            register_number: "12345".to_string(),
            password: "password123".to_string(),
        })
        .expect("demo login");
    let placement = common::placement_named(&portal, "CloudNine Technologies");

    let registered = portal
        .registrations
        .register_for_placement(request(student.id, placement, "DevOps Engineer"))
        .await
        .expect("registered");
    assert!(registered.notification.is_delivered());

    let confirmation = &mailer.sent_of(NotificationKind::PlacementConfirmation)[0];
    assert_eq!(confirmation.from, "placements@college.edu");
    assert!(confirmation.body.contains("2026-04-05"));

    let today = NaiveDate::from_ymd_opt(2026, 4, 4).expect("valid date");
    let report = portal.reminders.run(today).await.expect("reminders run");
    assert_eq!(report.dispatches.len(), 1);
    assert_eq!(
        mailer.sent_of(NotificationKind::PlacementReminder)[0].to,
        vec!["student@test.com".to_string()]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_duplicate_submissions_store_one_row() {
    let (portal, _) = common::portal();
    let student = portal
        .store
        .student_by_register_number("12345")
        .expect("lookup")
        .expect("demo student");
    let placement = common::placement_named(&portal, "TechCorp Solutions");

    let mut handles = Vec::new();
    for _ in 0..8 {
        let portal = portal.clone();
        let request = request(student.id, placement, "Software Engineer");
        handles.push(tokio::spawn(async move {
            portal.registrations.register_for_placement(request).await
        }));
    }

    let mut created = 0;
    let mut duplicates = 0;
    for handle in handles {
        match handle.await.expect("task joins") {
            Ok(_) => created += 1,
            Err(RegistrationError::DuplicateRegistration(_)) => duplicates += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(duplicates, 7);
    assert_eq!(
        portal
            .store
            .placement_registrations_for_placement(PlacementId(placement))
            .expect("list")
            .len(),
        1
    );
}

#[tokio::test]
async fn reseeding_clears_registrations() {
    let (portal, _) = common::portal();
    let student = portal
        .store
        .student_by_register_number("12345")
        .expect("lookup")
        .expect("demo student");
    let placement = common::placement_named(&portal, "InnovateTech");
    portal
        .registrations
        .register_for_placement(request(student.id, placement, "Product Manager"))
        .await
        .expect("registered");

    portal.seed_demo().expect("reseeded");

    assert!(portal
        .store
        .placement_registrations()
        .expect("list")
        .is_empty());
    assert_eq!(portal.store.placements().expect("list").len(), 5);
}
