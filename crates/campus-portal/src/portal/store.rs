use std::fmt;

use chrono::NaiveDate;

use super::domain::{
    Competition, CompetitionDetails, CompetitionId, Event, EventDetails, EventId,
    EventRegistration, EventRegistrationId, NewEventRegistration, NewPlacementRegistration,
    Placement, PlacementDetails, PlacementId, PlacementRegistration, PlacementRegistrationId,
    RegistrationStatus, Student, StudentId, StudentProfile,
};

/// Uniqueness rules the store enforces on insert and update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    StudentRegisterNumber,
    StudentEmail,
    /// One row per (student, placement, role_name).
    PlacementRegistration,
    /// One row per (student, competition).
    EventRegistration,
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Constraint::StudentRegisterNumber => "student.register_number",
            Constraint::StudentEmail => "student.email",
            Constraint::PlacementRegistration => {
                "placement_registration(student, placement, role_name)"
            }
            Constraint::EventRegistration => "event_registration(student, competition)",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Student,
    Placement,
    Event,
    Competition,
    PlacementRegistration,
    EventRegistration,
}

impl EntityKind {
    pub const fn label(self) -> &'static str {
        match self {
            EntityKind::Student => "student",
            EntityKind::Placement => "placement",
            EntityKind::Event => "event",
            EntityKind::Competition => "competition",
            EntityKind::PlacementRegistration => "placement registration",
            EntityKind::EventRegistration => "event registration",
        }
    }
}

/// Error enumeration for store failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("unique constraint {0} violated")]
    Conflict(Constraint),
    #[error("{} {id} not found", .entity.label())]
    NotFound { entity: EntityKind, id: u64 },
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn not_found(entity: EntityKind, id: u64) -> Self {
        StoreError::NotFound { entity, id }
    }
}

/// Storage abstraction for the six portal tables.
///
/// Inserts are atomic check-and-insert operations: a uniqueness violation is
/// returned as [`StoreError::Conflict`] and leaves the store untouched, and a
/// dangling reference is returned as [`StoreError::NotFound`]. Deletes cascade
/// the way the foreign keys describe: students, placements, competitions and
/// events take their registrations with them, and events take their
/// competitions.
pub trait PortalStore: Send + Sync {
    fn insert_student(
        &self,
        profile: StudentProfile,
        password_hash: String,
    ) -> Result<Student, StoreError>;
    fn update_student(&self, student: Student) -> Result<Student, StoreError>;
    fn student(&self, id: StudentId) -> Result<Option<Student>, StoreError>;
    fn student_by_register_number(
        &self,
        register_number: &str,
    ) -> Result<Option<Student>, StoreError>;
    fn student_by_email(&self, email: &str) -> Result<Option<Student>, StoreError>;
    fn students(&self) -> Result<Vec<Student>, StoreError>;
    fn delete_student(&self, id: StudentId) -> Result<(), StoreError>;

    fn insert_placement(&self, details: PlacementDetails) -> Result<Placement, StoreError>;
    fn update_placement(
        &self,
        id: PlacementId,
        details: PlacementDetails,
    ) -> Result<Placement, StoreError>;
    fn placement(&self, id: PlacementId) -> Result<Option<Placement>, StoreError>;
    fn placements(&self) -> Result<Vec<Placement>, StoreError>;
    fn placements_on(&self, date: NaiveDate) -> Result<Vec<Placement>, StoreError>;
    fn delete_placement(&self, id: PlacementId) -> Result<(), StoreError>;

    fn insert_event(&self, details: EventDetails) -> Result<Event, StoreError>;
    /// Inserts the event and its competitions as one unit: all rows or none.
    fn insert_event_with_competitions(
        &self,
        details: EventDetails,
        competitions: Vec<CompetitionDetails>,
    ) -> Result<(Event, Vec<Competition>), StoreError>;
    fn update_event(&self, id: EventId, details: EventDetails) -> Result<Event, StoreError>;
    fn event(&self, id: EventId) -> Result<Option<Event>, StoreError>;
    fn events(&self) -> Result<Vec<Event>, StoreError>;
    fn events_on(&self, date: NaiveDate) -> Result<Vec<Event>, StoreError>;
    fn delete_event(&self, id: EventId) -> Result<(), StoreError>;

    fn insert_competition(
        &self,
        event: EventId,
        details: CompetitionDetails,
    ) -> Result<Competition, StoreError>;
    fn update_competition(
        &self,
        id: CompetitionId,
        details: CompetitionDetails,
    ) -> Result<Competition, StoreError>;
    fn competition(&self, id: CompetitionId) -> Result<Option<Competition>, StoreError>;
    fn competitions(&self) -> Result<Vec<Competition>, StoreError>;
    fn competitions_for_event(&self, event: EventId) -> Result<Vec<Competition>, StoreError>;
    fn delete_competition(&self, id: CompetitionId) -> Result<(), StoreError>;

    fn insert_placement_registration(
        &self,
        registration: NewPlacementRegistration,
    ) -> Result<PlacementRegistration, StoreError>;
    fn placement_registration(
        &self,
        id: PlacementRegistrationId,
    ) -> Result<Option<PlacementRegistration>, StoreError>;
    fn placement_registrations(&self) -> Result<Vec<PlacementRegistration>, StoreError>;
    fn placement_registrations_for_placement(
        &self,
        placement: PlacementId,
    ) -> Result<Vec<PlacementRegistration>, StoreError>;
    fn placement_registrations_for_student(
        &self,
        student: StudentId,
    ) -> Result<Vec<PlacementRegistration>, StoreError>;
    fn set_placement_registration_status(
        &self,
        id: PlacementRegistrationId,
        status: RegistrationStatus,
    ) -> Result<PlacementRegistration, StoreError>;
    fn delete_placement_registration(&self, id: PlacementRegistrationId)
        -> Result<(), StoreError>;

    fn insert_event_registration(
        &self,
        registration: NewEventRegistration,
    ) -> Result<EventRegistration, StoreError>;
    fn event_registration(
        &self,
        id: EventRegistrationId,
    ) -> Result<Option<EventRegistration>, StoreError>;
    fn event_registrations(&self) -> Result<Vec<EventRegistration>, StoreError>;
    fn event_registrations_for_event(
        &self,
        event: EventId,
    ) -> Result<Vec<EventRegistration>, StoreError>;
    fn event_registrations_for_student(
        &self,
        student: StudentId,
    ) -> Result<Vec<EventRegistration>, StoreError>;
    fn delete_event_registration(&self, id: EventRegistrationId) -> Result<(), StoreError>;
}
