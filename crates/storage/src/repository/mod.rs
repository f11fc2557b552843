use async_trait::async_trait;
use uuid::Uuid;

use crate::dto::event::CreateEventRequest;
use crate::dto::participant::UpdateParticipantRequest;
use crate::error::Result;
use crate::models::{Event, NewParticipant, Participant};

pub mod event;
#[cfg(any(test, feature = "memory"))]
pub mod memory;
pub mod participant;

pub use event::EventRepository;
pub use participant::ParticipantRepository;

#[async_trait]
pub trait EventStore: Send + Sync {
    async fn insert(&self, req: &CreateEventRequest) -> Result<Event>;

    async fn list(&self) -> Result<Vec<Event>>;
}

#[async_trait]
pub trait ParticipantStore: Send + Sync {
    async fn participant_id_exists(&self, participant_id: &str) -> Result<bool>;

    /// Fails with `DuplicateParticipantId` if the short id is already taken.
    async fn insert(&self, participant: &NewParticipant) -> Result<Participant>;

    /// Inserts every row or none of them.
    async fn insert_many(&self, participants: &[NewParticipant]) -> Result<Vec<Participant>>;

    async fn list(&self) -> Result<Vec<Participant>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Participant>;

    /// Participants of one event that have not been archived.
    async fn list_active_by_event(&self, event_id: &str) -> Result<Vec<Participant>>;

    /// Writes only the columns present in `req`.
    async fn update(&self, id: Uuid, req: &UpdateParticipantRequest) -> Result<Participant>;

    async fn archive(&self, id: Uuid) -> Result<Participant>;

    /// Removes the row and hands it back.
    async fn delete(&self, id: Uuid) -> Result<Participant>;
}
