use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::response::Response;
use chrono::{NaiveDate, NaiveTime};
use serde_json::Value;

use crate::config::MailConfig;
use crate::portal::domain::{
    Competition, CompetitionDetails, CompetitionKind, Event, EventDetails, Placement,
    PlacementDetails, Student, StudentDraft, StudentProfile,
};
use crate::portal::{
    Credentials, MailError, Mailer, MemoryMailer, MemoryStore, Notifier, OutboundEmail,
    PortalServices, PortalStore,
};

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// Argon2 with minimal cost so tests hash quickly.
pub(super) fn credentials() -> Credentials {
    Credentials::with_cost(1024, 1).expect("valid argon2 params")
}

pub(super) fn mail_config() -> MailConfig {
    MailConfig {
        from_address: "noreply@campusconnect.com".to_string(),
        send_timeout: Duration::from_millis(200),
    }
}

pub(super) fn notifier<M: Mailer>(mailer: M) -> Notifier<M> {
    Notifier::new(Arc::new(mailer), &mail_config())
}

pub(super) fn profile(register_number: &str, email: &str) -> StudentProfile {
    StudentProfile {
        register_number: register_number.to_string(),
        name: format!("Student {register_number}"),
        email: email.to_string(),
        phone: "9876543210".to_string(),
        student_class: "B.Tech".to_string(),
        department: "CS".to_string(),
        year: "4".to_string(),
        college: "Engineering College".to_string(),
        cgpa: Some("8.1".to_string()),
        backlogs: None,
        history_of_arrears: None,
        tenth_marks: None,
        twelfth_marks: None,
    }
}

pub(super) fn draft(register_number: &str, email: &str, password: &str) -> StudentDraft {
    StudentDraft {
        profile: profile(register_number, email),
        password: password.to_string(),
    }
}

pub(super) fn placement_details(company: &str, on: NaiveDate) -> PlacementDetails {
    PlacementDetails {
        company_name: company.to_string(),
        logo: None,
        description: "Cloud computing and AI solutions".to_string(),
        date: on,
        time: NaiveTime::from_hms_opt(10, 0, 0).expect("valid time"),
        venue: "Main Auditorium".to_string(),
        roles: "Software Engineer,Data Analyst,Cloud Architect".to_string(),
        eligibility: "B.E./B.Tech in CS/IT with 7.0+ CGPA".to_string(),
        package: "8-15 LPA".to_string(),
    }
}

pub(super) fn event_details(name: &str, on: NaiveDate) -> EventDetails {
    EventDetails {
        event_name: name.to_string(),
        image: None,
        description: "Technical event showcasing innovation".to_string(),
        date: on,
        time: NaiveTime::from_hms_opt(9, 0, 0).expect("valid time"),
        venue: "Computer Lab".to_string(),
        rules: None,
        contact_person: Some("Technical Committee Head".to_string()),
        contact_number: None,
    }
}

pub(super) fn competition_details(name: &str) -> CompetitionDetails {
    CompetitionDetails {
        name: name.to_string(),
        image: None,
        description: format!("{name} round"),
        prize: "25,000".to_string(),
        team_size: Some("1".to_string()),
        kind: Some(CompetitionKind::Individual),
    }
}

pub(super) fn insert_student(store: &MemoryStore, register_number: &str, email: &str) -> Student {
    store
        .insert_student(profile(register_number, email), "unused-hash".to_string())
        .expect("student inserted")
}

pub(super) fn insert_placement(store: &MemoryStore, company: &str, on: NaiveDate) -> Placement {
    store
        .insert_placement(placement_details(company, on))
        .expect("placement inserted")
}

/// An event with two competitions, "Hackathon" and "Coding Contest".
pub(super) fn insert_event(
    store: &MemoryStore,
    name: &str,
    on: NaiveDate,
) -> (Event, Competition, Competition) {
    let event = store
        .insert_event(event_details(name, on))
        .expect("event inserted");
    let hackathon = store
        .insert_competition(event.id, competition_details("Hackathon"))
        .expect("competition inserted");
    let coding = store
        .insert_competition(event.id, competition_details("Coding Contest"))
        .expect("competition inserted");
    (event, hackathon, coding)
}

pub(super) struct Harness<M> {
    pub store: Arc<MemoryStore>,
    pub mailer: Arc<M>,
    pub services: Arc<PortalServices<MemoryStore, M>>,
}

pub(super) fn harness_with<M: Mailer + 'static>(mailer: M) -> Harness<M> {
    let store = Arc::new(MemoryStore::new());
    let mailer = Arc::new(mailer);
    let notifier = Notifier::new(Arc::clone(&mailer), &mail_config());
    let services = Arc::new(PortalServices::new(
        Arc::clone(&store),
        notifier,
        credentials(),
    ));
    Harness {
        store,
        mailer,
        services,
    }
}

pub(super) fn harness() -> Harness<MemoryMailer> {
    harness_with(MemoryMailer::default())
}

/// Always refuses to send and counts the attempts.
#[derive(Debug, Default)]
pub(super) struct FailingMailer {
    pub attempts: AtomicUsize,
}

impl FailingMailer {
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl Mailer for FailingMailer {
    async fn send(&self, _email: &OutboundEmail) -> Result<(), MailError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(MailError::Transport("smtp connection refused".to_string()))
    }
}

/// Never finishes within the notifier's timeout.
#[derive(Debug, Default)]
pub(super) struct SlowMailer;

impl Mailer for SlowMailer {
    async fn send(&self, _email: &OutboundEmail) -> Result<(), MailError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(())
    }
}

/// Fails only for messages whose subject mentions `needle`.
#[derive(Debug, Default)]
pub(super) struct SelectiveMailer {
    pub needle: String,
    pub inner: MemoryMailer,
}

impl Mailer for SelectiveMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailError> {
        if email.subject.contains(&self.needle) {
            return Err(MailError::Rejected(format!("mailbox full for {}", email.subject)));
        }
        self.inner.send(email).await
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
