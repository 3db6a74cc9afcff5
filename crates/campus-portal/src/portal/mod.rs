//! Campus placement and event portal: student accounts, the placement and
//! event catalog, registrations with email confirmations, and day-before
//! reminders.

pub mod accounts;
pub mod catalog;
pub mod credentials;
pub mod domain;
pub mod memory;
pub mod notify;
pub mod registration;
pub mod reminders;
pub mod resumes;
pub mod router;
pub mod seed;
pub mod store;
pub mod templates;
pub mod validation;

#[cfg(test)]
mod tests;

use std::sync::Arc;

pub use accounts::{AccountError, AccountService};
pub use catalog::{CatalogError, CatalogService};
pub use credentials::{CredentialError, Credentials};
pub use memory::MemoryStore;
pub use notify::{
    DeliveryOutcome, MailError, Mailer, MemoryMailer, NotificationKind, Notifier, OutboundEmail,
    TracingMailer,
};
pub use registration::{Registered, RegistrationError, RegistrationKind, RegistrationService};
pub use reminders::{ReminderDispatch, ReminderJob, ReminderReport, ReminderTarget};
pub use resumes::{MemoryResumeStore, ResumeError, ResumeFile, ResumeStore};
pub use router::{portal_router, ApiError};
pub use seed::{seed_demo_data, SeedError, SeedSummary};
pub use store::{Constraint, EntityKind, PortalStore, StoreError};
pub use validation::ValidationError;

/// Every portal service wired to one store and one notifier.
pub struct PortalServices<S, M> {
    pub store: Arc<S>,
    pub credentials: Credentials,
    pub accounts: AccountService<S, M>,
    pub catalog: CatalogService<S>,
    pub registrations: RegistrationService<S, M>,
    pub reminders: ReminderJob<S, M>,
    pub resumes: Arc<dyn ResumeStore>,
}

impl<S, M> PortalServices<S, M>
where
    S: PortalStore + 'static,
    M: Mailer + 'static,
{
    pub fn new(store: Arc<S>, notifier: Notifier<M>, credentials: Credentials) -> Self {
        let resumes: Arc<dyn ResumeStore> = Arc::new(MemoryResumeStore::new());
        Self {
            accounts: AccountService::new(
                Arc::clone(&store),
                notifier.clone(),
                credentials.clone(),
            )
            .with_resume_store(Arc::clone(&resumes)),
            catalog: CatalogService::new(Arc::clone(&store))
                .with_resume_store(Arc::clone(&resumes)),
            registrations: RegistrationService::new(Arc::clone(&store), notifier.clone())
                .with_resume_store(Arc::clone(&resumes)),
            reminders: ReminderJob::new(Arc::clone(&store), notifier),
            credentials,
            store,
            resumes,
        }
    }

    /// Reseeds the store and releases every resume the old registrations held.
    pub fn seed_demo(&self) -> Result<SeedSummary, SeedError> {
        let attached = resumes::attached(self.store.placement_registrations()?);
        let summary = seed_demo_data(self.store.as_ref(), &self.credentials)?;
        resumes::discard(self.resumes.as_ref(), attached);
        Ok(summary)
    }
}
