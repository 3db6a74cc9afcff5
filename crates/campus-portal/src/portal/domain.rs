use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// Store-assigned identifier for a student account.
    StudentId
);
entity_id!(PlacementId);
entity_id!(EventId);
entity_id!(CompetitionId);
entity_id!(PlacementRegistrationId);
entity_id!(EventRegistrationId);

/// Profile fields captured at sign-up and editable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentProfile {
    pub register_number: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub student_class: String,
    pub department: String,
    pub year: String,
    pub college: String,
    #[serde(default)]
    pub cgpa: Option<String>,
    #[serde(default)]
    pub backlogs: Option<String>,
    #[serde(default)]
    pub history_of_arrears: Option<String>,
    #[serde(default)]
    pub tenth_marks: Option<String>,
    #[serde(default)]
    pub twelfth_marks: Option<String>,
}

/// Stored student. The password hash never leaves the process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Student {
    pub id: StudentId,
    #[serde(flatten)]
    pub profile: StudentProfile,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

/// Sign-up payload.
#[derive(Debug, Clone, Deserialize)]
pub struct StudentDraft {
    #[serde(flatten)]
    pub profile: StudentProfile,
    #[serde(alias = "password_hash")]
    pub password: String,
}

/// Partial profile edit; absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentUpdate {
    pub register_number: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub student_class: Option<String>,
    pub department: Option<String>,
    pub year: Option<String>,
    pub college: Option<String>,
    pub cgpa: Option<String>,
    pub backlogs: Option<String>,
    pub history_of_arrears: Option<String>,
    pub tenth_marks: Option<String>,
    pub twelfth_marks: Option<String>,
    #[serde(alias = "password_hash")]
    pub password: Option<String>,
}

impl StudentUpdate {
    /// Applies every present field except the password, which needs hashing first.
    pub fn apply_to(&self, profile: &mut StudentProfile) {
        fn set(target: &mut String, value: &Option<String>) {
            if let Some(value) = value {
                *target = value.trim().to_string();
            }
        }
        fn set_opt(target: &mut Option<String>, value: &Option<String>) {
            if let Some(value) = value {
                *target = Some(value.trim().to_string());
            }
        }

        set(&mut profile.register_number, &self.register_number);
        set(&mut profile.name, &self.name);
        set(&mut profile.email, &self.email);
        set(&mut profile.phone, &self.phone);
        set(&mut profile.student_class, &self.student_class);
        set(&mut profile.department, &self.department);
        set(&mut profile.year, &self.year);
        set(&mut profile.college, &self.college);
        set_opt(&mut profile.cgpa, &self.cgpa);
        set_opt(&mut profile.backlogs, &self.backlogs);
        set_opt(&mut profile.history_of_arrears, &self.history_of_arrears);
        set_opt(&mut profile.tenth_marks, &self.tenth_marks);
        set_opt(&mut profile.twelfth_marks, &self.twelfth_marks);
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub register_number: String,
    pub password: String,
}

/// Company drive details as entered by placement staff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementDetails {
    pub company_name: String,
    #[serde(default)]
    pub logo: Option<String>,
    pub description: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub venue: String,
    /// Comma separated role names.
    pub roles: String,
    pub eligibility: String,
    pub package: String,
}

impl PlacementDetails {
    pub fn role_names(&self) -> impl Iterator<Item = &str> {
        self.roles
            .split(',')
            .map(str::trim)
            .filter(|role| !role.is_empty())
    }

    /// Returns the advertised spelling of `requested`, ignoring case and padding.
    pub fn offered_role(&self, requested: &str) -> Option<&str> {
        let requested = requested.trim();
        self.role_names()
            .find(|role| role.eq_ignore_ascii_case(requested))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub id: PlacementId,
    #[serde(flatten)]
    pub details: PlacementDetails,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDetails {
    pub event_name: String,
    #[serde(default)]
    pub image: Option<String>,
    pub description: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub venue: String,
    #[serde(default)]
    pub rules: Option<String>,
    #[serde(default)]
    pub contact_person: Option<String>,
    #[serde(default)]
    pub contact_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub id: EventId,
    #[serde(flatten)]
    pub details: EventDetails,
    pub created_at: DateTime<Utc>,
}

/// Event payload; competitions may be created inline.
#[derive(Debug, Clone, Deserialize)]
pub struct EventDraft {
    #[serde(flatten)]
    pub details: EventDetails,
    #[serde(default)]
    pub competitions: Vec<CompetitionDetails>,
}

/// Event as returned to clients, competitions in creation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventView {
    #[serde(flatten)]
    pub event: Event,
    pub competitions: Vec<Competition>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompetitionKind {
    Individual,
    Team,
    #[serde(rename = "Individual/Team")]
    IndividualOrTeam,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitionDetails {
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    pub description: String,
    pub prize: String,
    #[serde(default)]
    pub team_size: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<CompetitionKind>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Competition {
    pub id: CompetitionId,
    pub event: EventId,
    #[serde(flatten)]
    pub details: CompetitionDetails,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompetitionDraft {
    pub event: EventId,
    #[serde(flatten)]
    pub details: CompetitionDetails,
}

/// Progress of a placement application as tracked by the placement cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistrationStatus {
    #[default]
    Applied,
    Shortlisted,
    Selected,
    Rejected,
}

impl RegistrationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            RegistrationStatus::Applied => "Applied",
            RegistrationStatus::Shortlisted => "Shortlisted",
            RegistrationStatus::Selected => "Selected",
            RegistrationStatus::Rejected => "Rejected",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacementRegistration {
    pub id: PlacementRegistrationId,
    pub student: StudentId,
    pub placement: PlacementId,
    pub role_name: String,
    pub resume: Option<String>,
    pub resume_name: Option<String>,
    pub registered_at: DateTime<Utc>,
    pub status: RegistrationStatus,
}

/// Insert payload handed to the store; the store assigns id and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPlacementRegistration {
    pub student: StudentId,
    pub placement: PlacementId,
    pub role_name: String,
    pub resume: Option<String>,
    pub resume_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventRegistration {
    pub id: EventRegistrationId,
    pub student: StudentId,
    pub event: EventId,
    pub competition: CompetitionId,
    pub registered_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewEventRegistration {
    pub student: StudentId,
    pub event: EventId,
    pub competition: CompetitionId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlacementRegistrationRequest {
    pub student: StudentId,
    pub placement: PlacementId,
    pub role_name: String,
    /// Storage key of an uploaded file, filled in by the upload path only.
    #[serde(skip_deserializing)]
    pub resume: Option<String>,
    #[serde(default)]
    pub resume_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventRegistrationRequest {
    pub student: StudentId,
    pub competition: CompetitionId,
    /// Optional cross-check; must own `competition` when present.
    #[serde(default)]
    pub event: Option<EventId>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusUpdate {
    pub status: RegistrationStatus,
}

/// Registration joined with the records it references.
#[derive(Debug, Clone, Serialize)]
pub struct PlacementRegistrationView {
    #[serde(flatten)]
    pub registration: PlacementRegistration,
    pub student_details: Student,
    pub placement_details: Placement,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventRegistrationView {
    #[serde(flatten)]
    pub registration: EventRegistration,
    pub student_details: Student,
    pub event_details: EventView,
    pub competition_details: Competition,
}

/// Everything a single student has signed up for.
#[derive(Debug, Clone, Serialize)]
pub struct StudentRegistrations {
    pub placements: Vec<PlacementRegistrationView>,
    pub events: Vec<EventRegistrationView>,
}
