use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{NaiveDate, Utc};

use super::domain::{
    Competition, CompetitionDetails, CompetitionId, Event, EventDetails, EventId,
    EventRegistration, EventRegistrationId, NewEventRegistration, NewPlacementRegistration,
    Placement, PlacementDetails, PlacementId, PlacementRegistration, PlacementRegistrationId,
    RegistrationStatus, Student, StudentId, StudentProfile,
};
use super::store::{Constraint, EntityKind, PortalStore, StoreError};

/// Process-local store used by the service binary, the demo and the tests.
///
/// All tables sit behind one mutex, so every check-and-insert is atomic with
/// respect to concurrent requests. Maps are keyed by id, which keeps listings
/// in insertion order.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

#[derive(Debug, Default)]
struct Tables {
    next_id: u64,
    students: BTreeMap<u64, Student>,
    placements: BTreeMap<u64, Placement>,
    events: BTreeMap<u64, Event>,
    competitions: BTreeMap<u64, Competition>,
    placement_registrations: BTreeMap<u64, PlacementRegistration>,
    event_registrations: BTreeMap<u64, EventRegistration>,
}

impl Tables {
    fn allocate(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn check_student_unique(
        &self,
        profile: &StudentProfile,
        except: Option<StudentId>,
    ) -> Result<(), StoreError> {
        for existing in self.students.values() {
            if Some(existing.id) == except {
                continue;
            }
            if existing.profile.register_number == profile.register_number {
                return Err(StoreError::Conflict(Constraint::StudentRegisterNumber));
            }
            if existing.profile.email.eq_ignore_ascii_case(&profile.email) {
                return Err(StoreError::Conflict(Constraint::StudentEmail));
            }
        }
        Ok(())
    }

    fn purge_competition_registrations(&mut self, competition: CompetitionId) {
        self.event_registrations
            .retain(|_, registration| registration.competition != competition);
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }
}

impl PortalStore for MemoryStore {
    fn insert_student(
        &self,
        profile: StudentProfile,
        password_hash: String,
    ) -> Result<Student, StoreError> {
        let mut tables = self.tables()?;
        tables.check_student_unique(&profile, None)?;
        let id = tables.allocate();
        let student = Student {
            id: StudentId(id),
            profile,
            password_hash,
        };
        tables.students.insert(id, student.clone());
        Ok(student)
    }

    fn update_student(&self, student: Student) -> Result<Student, StoreError> {
        let mut tables = self.tables()?;
        if !tables.students.contains_key(&student.id.0) {
            return Err(StoreError::not_found(EntityKind::Student, student.id.0));
        }
        tables.check_student_unique(&student.profile, Some(student.id))?;
        tables.students.insert(student.id.0, student.clone());
        Ok(student)
    }

    fn student(&self, id: StudentId) -> Result<Option<Student>, StoreError> {
        Ok(self.tables()?.students.get(&id.0).cloned())
    }

    fn student_by_register_number(
        &self,
        register_number: &str,
    ) -> Result<Option<Student>, StoreError> {
        let tables = self.tables()?;
        Ok(tables
            .students
            .values()
            .find(|student| student.profile.register_number == register_number)
            .cloned())
    }

    fn student_by_email(&self, email: &str) -> Result<Option<Student>, StoreError> {
        let tables = self.tables()?;
        Ok(tables
            .students
            .values()
            .find(|student| student.profile.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    fn students(&self) -> Result<Vec<Student>, StoreError> {
        Ok(self.tables()?.students.values().cloned().collect())
    }

    fn delete_student(&self, id: StudentId) -> Result<(), StoreError> {
        let mut tables = self.tables()?;
        if tables.students.remove(&id.0).is_none() {
            return Err(StoreError::not_found(EntityKind::Student, id.0));
        }
        tables
            .placement_registrations
            .retain(|_, registration| registration.student != id);
        tables
            .event_registrations
            .retain(|_, registration| registration.student != id);
        Ok(())
    }

    fn insert_placement(&self, details: PlacementDetails) -> Result<Placement, StoreError> {
        let mut tables = self.tables()?;
        let id = tables.allocate();
        let placement = Placement {
            id: PlacementId(id),
            details,
            created_at: Utc::now(),
        };
        tables.placements.insert(id, placement.clone());
        Ok(placement)
    }

    fn update_placement(
        &self,
        id: PlacementId,
        details: PlacementDetails,
    ) -> Result<Placement, StoreError> {
        let mut tables = self.tables()?;
        let placement = tables
            .placements
            .get_mut(&id.0)
            .ok_or(StoreError::not_found(EntityKind::Placement, id.0))?;
        placement.details = details;
        Ok(placement.clone())
    }

    fn placement(&self, id: PlacementId) -> Result<Option<Placement>, StoreError> {
        Ok(self.tables()?.placements.get(&id.0).cloned())
    }

    fn placements(&self) -> Result<Vec<Placement>, StoreError> {
        Ok(self.tables()?.placements.values().cloned().collect())
    }

    fn placements_on(&self, date: NaiveDate) -> Result<Vec<Placement>, StoreError> {
        let tables = self.tables()?;
        Ok(tables
            .placements
            .values()
            .filter(|placement| placement.details.date == date)
            .cloned()
            .collect())
    }

    fn delete_placement(&self, id: PlacementId) -> Result<(), StoreError> {
        let mut tables = self.tables()?;
        if tables.placements.remove(&id.0).is_none() {
            return Err(StoreError::not_found(EntityKind::Placement, id.0));
        }
        tables
            .placement_registrations
            .retain(|_, registration| registration.placement != id);
        Ok(())
    }

    fn insert_event(&self, details: EventDetails) -> Result<Event, StoreError> {
        let mut tables = self.tables()?;
        let id = tables.allocate();
        let event = Event {
            id: EventId(id),
            details,
            created_at: Utc::now(),
        };
        tables.events.insert(id, event.clone());
        Ok(event)
    }

    fn insert_event_with_competitions(
        &self,
        details: EventDetails,
        competitions: Vec<CompetitionDetails>,
    ) -> Result<(Event, Vec<Competition>), StoreError> {
        let mut tables = self.tables()?;
        let id = tables.allocate();
        let event = Event {
            id: EventId(id),
            details,
            created_at: Utc::now(),
        };
        let competitions: Vec<Competition> = competitions
            .into_iter()
            .map(|details| Competition {
                id: CompetitionId(tables.allocate()),
                event: event.id,
                details,
            })
            .collect();

        tables.events.insert(id, event.clone());
        for competition in &competitions {
            tables
                .competitions
                .insert(competition.id.0, competition.clone());
        }
        Ok((event, competitions))
    }

    fn update_event(&self, id: EventId, details: EventDetails) -> Result<Event, StoreError> {
        let mut tables = self.tables()?;
        let event = tables
            .events
            .get_mut(&id.0)
            .ok_or(StoreError::not_found(EntityKind::Event, id.0))?;
        event.details = details;
        Ok(event.clone())
    }

    fn event(&self, id: EventId) -> Result<Option<Event>, StoreError> {
        Ok(self.tables()?.events.get(&id.0).cloned())
    }

    fn events(&self) -> Result<Vec<Event>, StoreError> {
        Ok(self.tables()?.events.values().cloned().collect())
    }

    fn events_on(&self, date: NaiveDate) -> Result<Vec<Event>, StoreError> {
        let tables = self.tables()?;
        Ok(tables
            .events
            .values()
            .filter(|event| event.details.date == date)
            .cloned()
            .collect())
    }

    fn delete_event(&self, id: EventId) -> Result<(), StoreError> {
        let mut tables = self.tables()?;
        if tables.events.remove(&id.0).is_none() {
            return Err(StoreError::not_found(EntityKind::Event, id.0));
        }
        tables
            .competitions
            .retain(|_, competition| competition.event != id);
        tables
            .event_registrations
            .retain(|_, registration| registration.event != id);
        Ok(())
    }

    fn insert_competition(
        &self,
        event: EventId,
        details: CompetitionDetails,
    ) -> Result<Competition, StoreError> {
        let mut tables = self.tables()?;
        if !tables.events.contains_key(&event.0) {
            return Err(StoreError::not_found(EntityKind::Event, event.0));
        }
        let id = tables.allocate();
        let competition = Competition {
            id: CompetitionId(id),
            event,
            details,
        };
        tables.competitions.insert(id, competition.clone());
        Ok(competition)
    }

    fn update_competition(
        &self,
        id: CompetitionId,
        details: CompetitionDetails,
    ) -> Result<Competition, StoreError> {
        let mut tables = self.tables()?;
        let competition = tables
            .competitions
            .get_mut(&id.0)
            .ok_or(StoreError::not_found(EntityKind::Competition, id.0))?;
        competition.details = details;
        Ok(competition.clone())
    }

    fn competition(&self, id: CompetitionId) -> Result<Option<Competition>, StoreError> {
        Ok(self.tables()?.competitions.get(&id.0).cloned())
    }

    fn competitions(&self) -> Result<Vec<Competition>, StoreError> {
        Ok(self.tables()?.competitions.values().cloned().collect())
    }

    fn competitions_for_event(&self, event: EventId) -> Result<Vec<Competition>, StoreError> {
        let tables = self.tables()?;
        Ok(tables
            .competitions
            .values()
            .filter(|competition| competition.event == event)
            .cloned()
            .collect())
    }

    fn delete_competition(&self, id: CompetitionId) -> Result<(), StoreError> {
        let mut tables = self.tables()?;
        if tables.competitions.remove(&id.0).is_none() {
            return Err(StoreError::not_found(EntityKind::Competition, id.0));
        }
        tables.purge_competition_registrations(id);
        Ok(())
    }

    fn insert_placement_registration(
        &self,
        registration: NewPlacementRegistration,
    ) -> Result<PlacementRegistration, StoreError> {
        let mut tables = self.tables()?;
        if !tables.students.contains_key(&registration.student.0) {
            return Err(StoreError::not_found(
                EntityKind::Student,
                registration.student.0,
            ));
        }
        if !tables.placements.contains_key(&registration.placement.0) {
            return Err(StoreError::not_found(
                EntityKind::Placement,
                registration.placement.0,
            ));
        }
        let duplicate = tables.placement_registrations.values().any(|existing| {
            existing.student == registration.student
                && existing.placement == registration.placement
                && existing.role_name == registration.role_name
        });
        if duplicate {
            return Err(StoreError::Conflict(Constraint::PlacementRegistration));
        }

        let id = tables.allocate();
        let stored = PlacementRegistration {
            id: PlacementRegistrationId(id),
            student: registration.student,
            placement: registration.placement,
            role_name: registration.role_name,
            resume: registration.resume,
            resume_name: registration.resume_name,
            registered_at: Utc::now(),
            status: RegistrationStatus::default(),
        };
        tables.placement_registrations.insert(id, stored.clone());
        Ok(stored)
    }

    fn placement_registration(
        &self,
        id: PlacementRegistrationId,
    ) -> Result<Option<PlacementRegistration>, StoreError> {
        Ok(self.tables()?.placement_registrations.get(&id.0).cloned())
    }

    fn placement_registrations(&self) -> Result<Vec<PlacementRegistration>, StoreError> {
        Ok(self
            .tables()?
            .placement_registrations
            .values()
            .cloned()
            .collect())
    }

    fn placement_registrations_for_placement(
        &self,
        placement: PlacementId,
    ) -> Result<Vec<PlacementRegistration>, StoreError> {
        let tables = self.tables()?;
        Ok(tables
            .placement_registrations
            .values()
            .filter(|registration| registration.placement == placement)
            .cloned()
            .collect())
    }

    fn placement_registrations_for_student(
        &self,
        student: StudentId,
    ) -> Result<Vec<PlacementRegistration>, StoreError> {
        let tables = self.tables()?;
        Ok(tables
            .placement_registrations
            .values()
            .filter(|registration| registration.student == student)
            .cloned()
            .collect())
    }

    fn set_placement_registration_status(
        &self,
        id: PlacementRegistrationId,
        status: RegistrationStatus,
    ) -> Result<PlacementRegistration, StoreError> {
        let mut tables = self.tables()?;
        let registration = tables
            .placement_registrations
            .get_mut(&id.0)
            .ok_or(StoreError::not_found(
                EntityKind::PlacementRegistration,
                id.0,
            ))?;
        registration.status = status;
        Ok(registration.clone())
    }

    fn delete_placement_registration(
        &self,
        id: PlacementRegistrationId,
    ) -> Result<(), StoreError> {
        let mut tables = self.tables()?;
        match tables.placement_registrations.remove(&id.0) {
            Some(_) => Ok(()),
            None => Err(StoreError::not_found(
                EntityKind::PlacementRegistration,
                id.0,
            )),
        }
    }

    fn insert_event_registration(
        &self,
        registration: NewEventRegistration,
    ) -> Result<EventRegistration, StoreError> {
        let mut tables = self.tables()?;
        if !tables.students.contains_key(&registration.student.0) {
            return Err(StoreError::not_found(
                EntityKind::Student,
                registration.student.0,
            ));
        }
        let owning_event = tables
            .competitions
            .get(&registration.competition.0)
            .map(|competition| competition.event)
            .ok_or(StoreError::not_found(
                EntityKind::Competition,
                registration.competition.0,
            ))?;
        if owning_event != registration.event {
            return Err(StoreError::not_found(
                EntityKind::Event,
                registration.event.0,
            ));
        }
        let duplicate = tables.event_registrations.values().any(|existing| {
            existing.student == registration.student
                && existing.competition == registration.competition
        });
        if duplicate {
            return Err(StoreError::Conflict(Constraint::EventRegistration));
        }

        let id = tables.allocate();
        let stored = EventRegistration {
            id: EventRegistrationId(id),
            student: registration.student,
            event: registration.event,
            competition: registration.competition,
            registered_at: Utc::now(),
        };
        tables.event_registrations.insert(id, stored.clone());
        Ok(stored)
    }

    fn event_registration(
        &self,
        id: EventRegistrationId,
    ) -> Result<Option<EventRegistration>, StoreError> {
        Ok(self.tables()?.event_registrations.get(&id.0).cloned())
    }

    fn event_registrations(&self) -> Result<Vec<EventRegistration>, StoreError> {
        Ok(self.tables()?.event_registrations.values().cloned().collect())
    }

    fn event_registrations_for_event(
        &self,
        event: EventId,
    ) -> Result<Vec<EventRegistration>, StoreError> {
        let tables = self.tables()?;
        Ok(tables
            .event_registrations
            .values()
            .filter(|registration| registration.event == event)
            .cloned()
            .collect())
    }

    fn event_registrations_for_student(
        &self,
        student: StudentId,
    ) -> Result<Vec<EventRegistration>, StoreError> {
        let tables = self.tables()?;
        Ok(tables
            .event_registrations
            .values()
            .filter(|registration| registration.student == student)
            .cloned()
            .collect())
    }

    fn delete_event_registration(&self, id: EventRegistrationId) -> Result<(), StoreError> {
        let mut tables = self.tables()?;
        match tables.event_registrations.remove(&id.0) {
            Some(_) => Ok(()),
            None => Err(StoreError::not_found(EntityKind::EventRegistration, id.0)),
        }
    }
}
