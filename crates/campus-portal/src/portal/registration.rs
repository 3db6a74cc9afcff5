use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use super::domain::{
    Competition, EventRegistration, EventRegistrationId, EventRegistrationRequest,
    EventRegistrationView, EventView, NewEventRegistration, NewPlacementRegistration,
    Placement, PlacementRegistration, PlacementRegistrationId, PlacementRegistrationRequest,
    PlacementRegistrationView, RegistrationStatus, Student, StudentId, StudentRegistrations,
};
use super::notify::{DeliveryOutcome, Mailer, NotificationKind, Notifier};
use super::resumes::{self, MemoryResumeStore, ResumeError, ResumeFile, ResumeStore};
use super::store::{Constraint, EntityKind, PortalStore, StoreError};
use super::templates;
use super::validation::{self, ValidationError};

/// Which kind of registration a duplicate was detected for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationKind {
    Placement,
    Event,
}

impl RegistrationKind {
    pub const fn duplicate_message(self) -> &'static str {
        match self {
            RegistrationKind::Placement => "Already registered",
            RegistrationKind::Event => "Already registered for this competition",
        }
    }
}

/// A committed registration plus what happened to its confirmation email.
#[derive(Debug, Clone, Serialize)]
pub struct Registered<T> {
    #[serde(flatten)]
    pub registration: T,
    pub notification: DeliveryOutcome,
}

/// Registration workflow: validate, insert-if-absent, then confirm by email.
///
/// The insert is the commit point. The confirmation is sent afterwards and its
/// outcome is reported but never turned into an error, so a mail outage can
/// not undo or fail a registration.
pub struct RegistrationService<S, M> {
    store: Arc<S>,
    notifier: Notifier<M>,
    resumes: Arc<dyn ResumeStore>,
}

impl<S, M> RegistrationService<S, M>
where
    S: PortalStore + 'static,
    M: Mailer + 'static,
{
    pub fn new(store: Arc<S>, notifier: Notifier<M>) -> Self {
        Self {
            store,
            notifier,
            resumes: Arc::new(MemoryResumeStore::new()),
        }
    }

    pub fn with_resume_store(mut self, resumes: Arc<dyn ResumeStore>) -> Self {
        self.resumes = resumes;
        self
    }

    /// Stores the uploaded resume, then registers with its key attached.
    ///
    /// The stored file is removed again when the registration is rejected.
    pub async fn register_with_resume(
        &self,
        mut request: PlacementRegistrationRequest,
        resume: ResumeFile,
    ) -> Result<Registered<PlacementRegistration>, RegistrationError> {
        let original_name = resume.file_name.trim().to_string();
        let key = self.resumes.save(resume)?;
        request.resume = Some(key.clone());
        if request.resume_name.is_none() && !original_name.is_empty() {
            request.resume_name = Some(original_name);
        }

        let result = self.register_for_placement(request).await;
        if result.is_err() {
            resumes::discard(self.resumes.as_ref(), [key]);
        }
        result
    }

    /// The resume attached to a placement registration.
    pub fn resume(&self, id: PlacementRegistrationId) -> Result<ResumeFile, RegistrationError> {
        let registration = self.store.placement_registration(id)?.ok_or(
            StoreError::not_found(EntityKind::PlacementRegistration, id.0),
        )?;
        let key = registration
            .resume
            .ok_or(RegistrationError::NoResume(id))?;
        self.resumes
            .load(&key)?
            .ok_or(RegistrationError::NoResume(id))
    }

    pub async fn register_for_placement(
        &self,
        request: PlacementRegistrationRequest,
    ) -> Result<Registered<PlacementRegistration>, RegistrationError> {
        validation::require("role_name", &request.role_name)?;
        let student = self.student(request.student)?;
        let placement = self.placement(request.placement)?;

        let role_name = placement
            .details
            .offered_role(&request.role_name)
            .ok_or_else(|| ValidationError::UnknownRole {
                role: request.role_name.trim().to_string(),
                company: placement.details.company_name.clone(),
            })?
            .to_string();

        let registration = self
            .store
            .insert_placement_registration(NewPlacementRegistration {
                student: student.id,
                placement: placement.id,
                role_name,
                resume: request.resume,
                resume_name: request.resume_name,
            })
            .map_err(|err| duplicate_or_store(err, RegistrationKind::Placement))?;

        metrics::counter!("campus_registrations_total", "kind" => "placement").increment(1);
        info!(
            registration_id = %registration.id,
            student_id = %student.id,
            placement_id = %placement.id,
            role = %registration.role_name,
            "placement registration recorded"
        );

        let rendered = templates::placement_confirmation(
            &placement.details.company_name,
            placement.details.date,
            &registration.role_name,
        );
        let notification = self
            .confirm(
                NotificationKind::PlacementConfirmation,
                &student,
                rendered,
            )
            .await;

        Ok(Registered {
            registration,
            notification,
        })
    }

    pub async fn register_for_event(
        &self,
        request: EventRegistrationRequest,
    ) -> Result<Registered<EventRegistration>, RegistrationError> {
        let student = self.student(request.student)?;
        let competition = self.competition(request.competition)?;

        if let Some(event) = request.event {
            if event != competition.event {
                return Err(ValidationError::CompetitionEventMismatch {
                    competition: competition.id.0,
                    event: event.0,
                }
                .into());
            }
        }
        let event = self
            .store
            .event(competition.event)?
            .ok_or(StoreError::not_found(EntityKind::Event, competition.event.0))?;

        let registration = self
            .store
            .insert_event_registration(NewEventRegistration {
                student: student.id,
                event: event.id,
                competition: competition.id,
            })
            .map_err(|err| duplicate_or_store(err, RegistrationKind::Event))?;

        metrics::counter!("campus_registrations_total", "kind" => "event").increment(1);
        info!(
            registration_id = %registration.id,
            student_id = %student.id,
            event_id = %event.id,
            competition_id = %competition.id,
            "event registration recorded"
        );

        let title = format!(
            "{} - {}",
            event.details.event_name, competition.details.name
        );
        let rendered = templates::event_confirmation(&title, event.details.date);
        let notification = self
            .confirm(NotificationKind::EventConfirmation, &student, rendered)
            .await;

        Ok(Registered {
            registration,
            notification,
        })
    }

    async fn confirm(
        &self,
        kind: NotificationKind,
        student: &Student,
        rendered: templates::Rendered,
    ) -> DeliveryOutcome {
        if student.profile.email.trim().is_empty() {
            warn!(student_id = %student.id, kind = kind.label(), "no address for confirmation");
            return DeliveryOutcome::Failed {
                reason: "student has no email address".to_string(),
            };
        }

        let email = self.notifier.compose(
            kind,
            vec![student.profile.email.clone()],
            rendered.subject,
            rendered.body,
        );
        self.notifier.deliver(email).await
    }

    pub fn placement_registration(
        &self,
        id: PlacementRegistrationId,
    ) -> Result<PlacementRegistrationView, RegistrationError> {
        let registration = self.store.placement_registration(id)?.ok_or(
            StoreError::not_found(EntityKind::PlacementRegistration, id.0),
        )?;
        self.placement_view(registration)
    }

    pub fn placement_registrations(
        &self,
    ) -> Result<Vec<PlacementRegistrationView>, RegistrationError> {
        self.store
            .placement_registrations()?
            .into_iter()
            .map(|registration| self.placement_view(registration))
            .collect()
    }

    pub fn update_placement_status(
        &self,
        id: PlacementRegistrationId,
        status: RegistrationStatus,
    ) -> Result<PlacementRegistrationView, RegistrationError> {
        let registration = self.store.set_placement_registration_status(id, status)?;
        info!(registration_id = %id, status = status.label(), "placement registration status updated");
        self.placement_view(registration)
    }

    pub fn withdraw_placement(&self, id: PlacementRegistrationId) -> Result<(), RegistrationError> {
        let attached = resumes::attached(self.store.placement_registration(id)?);
        self.store.delete_placement_registration(id)?;
        resumes::discard(self.resumes.as_ref(), attached);
        info!(registration_id = %id, "placement registration withdrawn");
        Ok(())
    }

    pub fn event_registration(
        &self,
        id: EventRegistrationId,
    ) -> Result<EventRegistrationView, RegistrationError> {
        let registration = self
            .store
            .event_registration(id)?
            .ok_or(StoreError::not_found(EntityKind::EventRegistration, id.0))?;
        self.event_view(registration)
    }

    pub fn event_registrations(&self) -> Result<Vec<EventRegistrationView>, RegistrationError> {
        self.store
            .event_registrations()?
            .into_iter()
            .map(|registration| self.event_view(registration))
            .collect()
    }

    pub fn withdraw_event(&self, id: EventRegistrationId) -> Result<(), RegistrationError> {
        self.store.delete_event_registration(id)?;
        info!(registration_id = %id, "event registration withdrawn");
        Ok(())
    }

    pub fn for_student(&self, id: StudentId) -> Result<StudentRegistrations, RegistrationError> {
        self.student(id)?;
        let placements = self
            .store
            .placement_registrations_for_student(id)?
            .into_iter()
            .map(|registration| self.placement_view(registration))
            .collect::<Result<Vec<_>, _>>()?;
        let events = self
            .store
            .event_registrations_for_student(id)?
            .into_iter()
            .map(|registration| self.event_view(registration))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(StudentRegistrations { placements, events })
    }

    fn placement_view(
        &self,
        registration: PlacementRegistration,
    ) -> Result<PlacementRegistrationView, RegistrationError> {
        let student_details = self.student(registration.student)?;
        let placement_details = self.placement(registration.placement)?;
        Ok(PlacementRegistrationView {
            registration,
            student_details,
            placement_details,
        })
    }

    fn event_view(
        &self,
        registration: EventRegistration,
    ) -> Result<EventRegistrationView, RegistrationError> {
        let student_details = self.student(registration.student)?;
        let competition_details = self.competition(registration.competition)?;
        let event = self
            .store
            .event(registration.event)?
            .ok_or(StoreError::not_found(EntityKind::Event, registration.event.0))?;
        let competitions = self.store.competitions_for_event(event.id)?;
        Ok(EventRegistrationView {
            registration,
            student_details,
            event_details: EventView {
                event,
                competitions,
            },
            competition_details,
        })
    }

    fn student(&self, id: StudentId) -> Result<Student, StoreError> {
        self.store
            .student(id)?
            .ok_or(StoreError::not_found(EntityKind::Student, id.0))
    }

    fn placement(&self, id: super::domain::PlacementId) -> Result<Placement, StoreError> {
        self.store
            .placement(id)?
            .ok_or(StoreError::not_found(EntityKind::Placement, id.0))
    }

    fn competition(&self, id: super::domain::CompetitionId) -> Result<Competition, StoreError> {
        self.store
            .competition(id)?
            .ok_or(StoreError::not_found(EntityKind::Competition, id.0))
    }
}

fn duplicate_or_store(err: StoreError, kind: RegistrationKind) -> RegistrationError {
    match (err, kind) {
        (StoreError::Conflict(Constraint::PlacementRegistration), RegistrationKind::Placement)
        | (StoreError::Conflict(Constraint::EventRegistration), RegistrationKind::Event) => {
            warn!(kind = ?kind, "duplicate registration rejected");
            RegistrationError::DuplicateRegistration(kind)
        }
        (other, _) => RegistrationError::Store(other),
    }
}

/// Error raised by the registration workflow.
#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("{}", .0.duplicate_message())]
    DuplicateRegistration(RegistrationKind),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("placement registration {0} has no resume")]
    NoResume(PlacementRegistrationId),
    #[error(transparent)]
    Resume(#[from] ResumeError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
