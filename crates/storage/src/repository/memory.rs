//! In-memory stores with the same observable behaviour as the PostgreSQL
//! repositories, including the unique index on `participant_id`.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::dto::event::CreateEventRequest;
use crate::dto::participant::UpdateParticipantRequest;
use crate::error::{Result, StorageError};
use crate::models::{Event, NewParticipant, Participant};

use super::{EventStore, ParticipantStore};

#[derive(Default)]
pub struct InMemoryEventStore {
    events: RwLock<Vec<Event>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn insert(&self, req: &CreateEventRequest) -> Result<Event> {
        let event = Event {
            id: Uuid::new_v4(),
            event_name: req.event_name.clone(),
            address: req.address.clone(),
            date: req.date,
            photo_url: req.photo_url.clone(),
            categories: req.categories.clone(),
            created_at: Utc::now(),
        };

        self.events.write().await.push(event.clone());
        Ok(event)
    }

    async fn list(&self) -> Result<Vec<Event>> {
        let mut events = self.events.read().await.clone();
        events.sort_by(|a, b| (a.date, a.created_at).cmp(&(b.date, b.created_at)));
        Ok(events)
    }
}

#[derive(Default)]
pub struct InMemoryParticipantStore {
    participants: RwLock<Vec<Participant>>,
}

impl InMemoryParticipantStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored rows, archived ones included.
    pub async fn len(&self) -> usize {
        self.participants.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn materialize(new: &NewParticipant) -> Participant {
    Participant {
        id: Uuid::new_v4(),
        participant_id: new.participant_id.clone(),
        first_name: new.first_name.clone(),
        last_name: new.last_name.clone(),
        designation: new.designation.clone(),
        institute: new.institute.clone(),
        id_card_type: new.id_card_type.clone(),
        background_image: new.background_image.clone(),
        profile_picture: new.profile_picture.clone(),
        event_id: new.event_id.clone(),
        event_name: new.event_name.clone(),
        archive: false,
        created_at: Utc::now(),
    }
}

#[async_trait]
impl ParticipantStore for InMemoryParticipantStore {
    async fn participant_id_exists(&self, participant_id: &str) -> Result<bool> {
        Ok(self
            .participants
            .read()
            .await
            .iter()
            .any(|p| p.participant_id == participant_id))
    }

    async fn insert(&self, participant: &NewParticipant) -> Result<Participant> {
        let mut rows = self.participants.write().await;

        if rows
            .iter()
            .any(|p| p.participant_id == participant.participant_id)
        {
            return Err(StorageError::DuplicateParticipantId(
                participant.participant_id.clone(),
            ));
        }

        let stored = materialize(participant);
        rows.push(stored.clone());
        Ok(stored)
    }

    async fn insert_many(&self, participants: &[NewParticipant]) -> Result<Vec<Participant>> {
        let mut rows = self.participants.write().await;

        {
            let mut taken: HashSet<&str> =
                rows.iter().map(|p| p.participant_id.as_str()).collect();
            for participant in participants {
                if !taken.insert(participant.participant_id.as_str()) {
                    return Err(StorageError::DuplicateParticipantId(
                        participant.participant_id.clone(),
                    ));
                }
            }
        }

        let stored: Vec<Participant> = participants.iter().map(materialize).collect();
        rows.extend(stored.iter().cloned());
        Ok(stored)
    }

    async fn list(&self) -> Result<Vec<Participant>> {
        Ok(self.participants.read().await.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Participant> {
        self.participants
            .read()
            .await
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn list_active_by_event(&self, event_id: &str) -> Result<Vec<Participant>> {
        Ok(self
            .participants
            .read()
            .await
            .iter()
            .filter(|p| p.event_id == event_id && !p.archive)
            .cloned()
            .collect())
    }

    async fn update(&self, id: Uuid, req: &UpdateParticipantRequest) -> Result<Participant> {
        let mut rows = self.participants.write().await;
        let row = rows
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(StorageError::NotFound)?;

        req.apply_to(row);
        Ok(row.clone())
    }

    async fn archive(&self, id: Uuid) -> Result<Participant> {
        let mut rows = self.participants.write().await;
        let row = rows
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(StorageError::NotFound)?;

        row.archive = true;
        Ok(row.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<Participant> {
        let mut rows = self.participants.write().await;
        let index = rows
            .iter()
            .position(|p| p.id == id)
            .ok_or(StorageError::NotFound)?;

        Ok(rows.remove(index))
    }
}
