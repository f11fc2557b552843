use serde_json::{Map, Value};
use storage::{
    dto::participant::{CreateParticipantRequest, UpdateParticipantRequest},
    models::Participant,
    repository::ParticipantStore,
    services::participant_id,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::{WebError, WebResult};
use crate::uploads::{StoredUpload, UploadStore};

pub fn parse_id(raw: &str) -> WebResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| WebError::BadRequest(format!("Invalid participant id: {}", raw)))
}

/// List all participants
pub async fn list_participants(store: &dyn ParticipantStore) -> WebResult<Vec<Participant>> {
    Ok(store.list().await?)
}

/// List the non-archived participants of one event
pub async fn list_event_participants(
    store: &dyn ParticipantStore,
    event_id: &str,
) -> WebResult<Vec<Participant>> {
    Ok(store.list_active_by_event(event_id).await?)
}

/// Get participant by id
pub async fn get_participant(store: &dyn ParticipantStore, id: Uuid) -> WebResult<Participant> {
    Ok(store.find_by_id(id).await?)
}

/// Register a participant whose images, if any, are already in the upload store.
///
/// When the participant cannot be saved the staged uploads are deleted.
pub async fn create_participant(
    store: &dyn ParticipantStore,
    uploads: &UploadStore,
    request: &CreateParticipantRequest,
    staged: &[StoredUpload],
) -> WebResult<Participant> {
    let result = match request.validate() {
        Ok(()) => participant_id::register(store, request)
            .await
            .map_err(WebError::from),
        Err(e) => Err(WebError::from(e)),
    };

    match &result {
        Ok(participant) => tracing::info!(
            participant_id = %participant.participant_id,
            event_id = %participant.event_id,
            "registered participant"
        ),
        Err(_) if !staged.is_empty() => uploads.discard(staged).await,
        Err(_) => {}
    }

    result
}

/// Reads a bulk-upload body, `{ "participants": [...] }` or a bare array, one
/// item at a time so that a malformed row is reported by index.
pub fn parse_bulk_body(body: Value) -> WebResult<Vec<CreateParticipantRequest>> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("participants") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(WebError::BadRequest(
                    "Expected a `participants` array".to_string(),
                ));
            }
        },
        _ => {
            return Err(WebError::BadRequest(
                "Expected a `participants` array".to_string(),
            ));
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item)
                .map_err(|e| WebError::BadRequest(format!("participants[{}]: {}", index, e)))
        })
        .collect()
}

/// Register a batch of participants in a single insert
pub async fn bulk_create_participants(
    store: &dyn ParticipantStore,
    requests: &[CreateParticipantRequest],
) -> WebResult<Vec<Participant>> {
    for (index, request) in requests.iter().enumerate() {
        request
            .validate()
            .map_err(|e| WebError::BadRequest(format!("participants[{}]: {}", index, e)))?;
    }

    let saved = participant_id::register_many(store, requests).await?;
    tracing::info!("bulk registered {} participants", saved.len());

    Ok(saved)
}

/// Update the allow-listed fields of a participant.
///
/// The key set is checked before anything is read from storage.
pub async fn update_participant(
    store: &dyn ParticipantStore,
    id: Uuid,
    fields: Map<String, Value>,
) -> WebResult<Participant> {
    let rejected = UpdateParticipantRequest::disallowed_fields(fields.keys());
    if !rejected.is_empty() {
        tracing::debug!(?rejected, "rejected participant update");
        return Err(WebError::BadRequest("Invalid updates!".to_string()));
    }

    let request: UpdateParticipantRequest = serde_json::from_value(Value::Object(fields))
        .map_err(|e| WebError::BadRequest(e.to_string()))?;
    request.validate()?;

    Ok(store.update(id, &request).await?)
}

/// Soft-delete a participant
pub async fn archive_participant(store: &dyn ParticipantStore, id: Uuid) -> WebResult<Participant> {
    Ok(store.archive(id).await?)
}

/// Delete a participant
pub async fn delete_participant(store: &dyn ParticipantStore, id: Uuid) -> WebResult<Participant> {
    let participant = store.delete(id).await?;
    tracing::info!(participant_id = %participant.participant_id, "deleted participant");
    Ok(participant)
}
