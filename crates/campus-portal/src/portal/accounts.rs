use std::sync::Arc;

use tracing::{info, warn};

use super::credentials::{CredentialError, Credentials};
use super::domain::{
    LoginRequest, Student, StudentDraft, StudentId, StudentProfile, StudentUpdate,
};
use super::notify::{DeliveryOutcome, Mailer, NotificationKind, Notifier};
use super::resumes::{self, MemoryResumeStore, ResumeStore};
use super::store::{Constraint, EntityKind, PortalStore, StoreError};
use super::templates;
use super::validation::{self, ValidationError};

/// Student sign-up, login and profile maintenance.
pub struct AccountService<S, M> {
    store: Arc<S>,
    notifier: Notifier<M>,
    credentials: Credentials,
    resumes: Arc<dyn ResumeStore>,
}

impl<S, M> AccountService<S, M>
where
    S: PortalStore + 'static,
    M: Mailer + 'static,
{
    pub fn new(store: Arc<S>, notifier: Notifier<M>, credentials: Credentials) -> Self {
        Self {
            store,
            notifier,
            credentials,
            resumes: Arc::new(MemoryResumeStore::new()),
        }
    }

    /// Resume storage whose files are released when a student is deleted.
    pub fn with_resume_store(mut self, resumes: Arc<dyn ResumeStore>) -> Self {
        self.resumes = resumes;
        self
    }

    /// Create an account and send a best-effort welcome email.
    pub async fn sign_up(
        &self,
        draft: StudentDraft,
    ) -> Result<(Student, DeliveryOutcome), AccountError> {
        let StudentDraft {
            mut profile,
            password,
        } = draft;
        validation::normalize_profile(&mut profile);
        validation::check_profile(&profile)?;
        validation::check_password(&password)?;

        let password_hash = self.credentials.hash(&password)?;
        let student = self
            .store
            .insert_student(profile.clone(), password_hash)
            .map_err(|err| uniqueness_error(err, &profile))?;
        info!(
            student_id = %student.id,
            register_number = %student.profile.register_number,
            "student registered"
        );

        let rendered = templates::welcome(&student.profile.name);
        let email = self.notifier.compose(
            NotificationKind::Welcome,
            vec![student.profile.email.clone()],
            rendered.subject,
            rendered.body,
        );
        let outcome = self.notifier.deliver(email).await;
        Ok((student, outcome))
    }

    pub fn login(&self, request: &LoginRequest) -> Result<Student, AccountError> {
        let register_number = request.register_number.trim();
        let student = self
            .store
            .student_by_register_number(register_number)?
            .ok_or(AccountError::UserNotFound)?;

        if self
            .credentials
            .verify(&request.password, &student.password_hash)?
        {
            Ok(student)
        } else {
            warn!(student_id = %student.id, "login rejected: invalid credentials");
            Err(AccountError::InvalidCredentials)
        }
    }

    pub fn get(&self, id: StudentId) -> Result<Student, AccountError> {
        self.store
            .student(id)?
            .ok_or(StoreError::not_found(EntityKind::Student, id.0))
            .map_err(AccountError::from)
    }

    pub fn list(&self) -> Result<Vec<Student>, AccountError> {
        Ok(self.store.students()?)
    }

    pub fn update(&self, id: StudentId, update: StudentUpdate) -> Result<Student, AccountError> {
        let mut student = self.get(id)?;
        update.apply_to(&mut student.profile);
        validation::normalize_profile(&mut student.profile);
        validation::check_profile(&student.profile)?;

        if let Some(password) = update.password.as_deref() {
            validation::check_password(password)?;
            student.password_hash = self.credentials.hash(password)?;
        }

        let profile = student.profile.clone();
        self.store
            .update_student(student)
            .map_err(|err| uniqueness_error(err, &profile))
    }

    pub fn delete(&self, id: StudentId) -> Result<(), AccountError> {
        let attached = resumes::attached(self.store.placement_registrations_for_student(id)?);
        self.store.delete_student(id)?;
        resumes::discard(self.resumes.as_ref(), attached);
        info!(student_id = %id, "student deleted with registrations");
        Ok(())
    }
}

fn uniqueness_error(err: StoreError, profile: &StudentProfile) -> AccountError {
    match err {
        StoreError::Conflict(Constraint::StudentRegisterNumber) => {
            ValidationError::RegisterNumberTaken(profile.register_number.clone()).into()
        }
        StoreError::Conflict(Constraint::StudentEmail) => {
            ValidationError::EmailTaken(profile.email.clone()).into()
        }
        other => AccountError::Store(other),
    }
}

/// Error raised by the account service.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("User not found")]
    UserNotFound,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Credential(#[from] CredentialError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
