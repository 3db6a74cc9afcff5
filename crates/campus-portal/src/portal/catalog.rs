use std::sync::Arc;

use tracing::info;

use super::domain::{
    Competition, CompetitionDetails, CompetitionDraft, CompetitionId, EventDetails, EventDraft,
    EventId, EventView, Placement, PlacementDetails, PlacementId,
};
use super::resumes::{self, MemoryResumeStore, ResumeStore};
use super::store::{EntityKind, PortalStore, StoreError};
use super::validation::{self, ValidationError};

/// Placement drives, events and their competitions.
pub struct CatalogService<S> {
    store: Arc<S>,
    resumes: Arc<dyn ResumeStore>,
}

impl<S> CatalogService<S>
where
    S: PortalStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            resumes: Arc::new(MemoryResumeStore::new()),
        }
    }

    /// Resume storage whose files are released when a drive is deleted.
    pub fn with_resume_store(mut self, resumes: Arc<dyn ResumeStore>) -> Self {
        self.resumes = resumes;
        self
    }

    pub fn create_placement(&self, details: PlacementDetails) -> Result<Placement, CatalogError> {
        validation::check_placement(&details)?;
        let placement = self.store.insert_placement(details)?;
        info!(
            placement_id = %placement.id,
            company = %placement.details.company_name,
            date = %placement.details.date,
            "placement drive created"
        );
        Ok(placement)
    }

    pub fn update_placement(
        &self,
        id: PlacementId,
        details: PlacementDetails,
    ) -> Result<Placement, CatalogError> {
        validation::check_placement(&details)?;
        Ok(self.store.update_placement(id, details)?)
    }

    pub fn placement(&self, id: PlacementId) -> Result<Placement, CatalogError> {
        self.store
            .placement(id)?
            .ok_or(CatalogError::Store(StoreError::not_found(
                EntityKind::Placement,
                id.0,
            )))
    }

    pub fn placements(&self) -> Result<Vec<Placement>, CatalogError> {
        Ok(self.store.placements()?)
    }

    pub fn delete_placement(&self, id: PlacementId) -> Result<(), CatalogError> {
        let attached = resumes::attached(self.store.placement_registrations_for_placement(id)?);
        self.store.delete_placement(id)?;
        resumes::discard(self.resumes.as_ref(), attached);
        info!(placement_id = %id, "placement drive deleted");
        Ok(())
    }

    /// Create an event together with any inline competitions.
    ///
    /// All competitions are validated before the event is written.
    pub fn create_event(&self, draft: EventDraft) -> Result<EventView, CatalogError> {
        validation::check_event(&draft.details)?;
        for competition in &draft.competitions {
            validation::check_competition(competition)?;
        }

        let (event, competitions) = self
            .store
            .insert_event_with_competitions(draft.details, draft.competitions)?;
        info!(
            event_id = %event.id,
            name = %event.details.event_name,
            competitions = competitions.len(),
            "event created"
        );
        Ok(EventView {
            event,
            competitions,
        })
    }

    pub fn update_event(
        &self,
        id: EventId,
        details: EventDetails,
    ) -> Result<EventView, CatalogError> {
        validation::check_event(&details)?;
        let event = self.store.update_event(id, details)?;
        let competitions = self.store.competitions_for_event(id)?;
        Ok(EventView {
            event,
            competitions,
        })
    }

    pub fn event(&self, id: EventId) -> Result<EventView, CatalogError> {
        let event = self
            .store
            .event(id)?
            .ok_or(StoreError::not_found(EntityKind::Event, id.0))?;
        let competitions = self.store.competitions_for_event(id)?;
        Ok(EventView {
            event,
            competitions,
        })
    }

    pub fn events(&self) -> Result<Vec<EventView>, CatalogError> {
        self.store
            .events()?
            .into_iter()
            .map(|event| -> Result<EventView, CatalogError> {
                let competitions = self.store.competitions_for_event(event.id)?;
                Ok(EventView {
                    event,
                    competitions,
                })
            })
            .collect()
    }

    /// Removes the event, its competitions and every registration for them.
    pub fn delete_event(&self, id: EventId) -> Result<(), CatalogError> {
        self.store.delete_event(id)?;
        info!(event_id = %id, "event deleted");
        Ok(())
    }

    pub fn create_competition(
        &self,
        draft: CompetitionDraft,
    ) -> Result<Competition, CatalogError> {
        validation::check_competition(&draft.details)?;
        Ok(self.store.insert_competition(draft.event, draft.details)?)
    }

    pub fn update_competition(
        &self,
        id: CompetitionId,
        details: CompetitionDetails,
    ) -> Result<Competition, CatalogError> {
        validation::check_competition(&details)?;
        Ok(self.store.update_competition(id, details)?)
    }

    pub fn competition(&self, id: CompetitionId) -> Result<Competition, CatalogError> {
        self.store
            .competition(id)?
            .ok_or(CatalogError::Store(StoreError::not_found(
                EntityKind::Competition,
                id.0,
            )))
    }

    pub fn competitions(&self) -> Result<Vec<Competition>, CatalogError> {
        Ok(self.store.competitions()?)
    }

    pub fn delete_competition(&self, id: CompetitionId) -> Result<(), CatalogError> {
        Ok(self.store.delete_competition(id)?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
