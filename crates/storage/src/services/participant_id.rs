//! Allocation of the short public participant id.
//!
//! Candidates are checked against the store before use, and the unique index on
//! `participant_id` catches whatever slips between the check and the insert. A
//! rejected insert is retried with a fresh candidate. Both loops are bounded.

use futures::future::try_join_all;
use rand::{Rng, distributions::Alphanumeric};

use crate::dto::participant::CreateParticipantRequest;
use crate::error::{Result, StorageError};
use crate::models::Participant;
use crate::repository::ParticipantStore;

/// Length of a participant id, drawn from `[A-Za-z0-9]`.
pub const PARTICIPANT_ID_LEN: usize = 5;

/// Candidates tried per allocation before giving up.
pub const MAX_ID_ATTEMPTS: usize = 10;

/// Inserts retried after a duplicate-key rejection.
pub const MAX_INSERT_ATTEMPTS: usize = 5;

pub fn generate_participant_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(PARTICIPANT_ID_LEN)
        .map(char::from)
        .collect()
}

/// Returns a participant id no stored participant currently holds.
pub async fn allocate(store: &dyn ParticipantStore) -> Result<String> {
    allocate_with(store, generate_participant_id).await
}

pub async fn allocate_with<G>(store: &dyn ParticipantStore, mut next_candidate: G) -> Result<String>
where
    G: FnMut() -> String + Send,
{
    for attempt in 1..=MAX_ID_ATTEMPTS {
        let candidate = next_candidate();

        if !store.participant_id_exists(&candidate).await? {
            return Ok(candidate);
        }

        tracing::debug!(attempt, candidate = %candidate, "participant id collision, regenerating");
    }

    Err(StorageError::IdentifierExhausted {
        attempts: MAX_ID_ATTEMPTS,
    })
}

/// Stores one participant under a freshly allocated id.
pub async fn register(
    store: &dyn ParticipantStore,
    req: &CreateParticipantRequest,
) -> Result<Participant> {
    register_with(store, req, generate_participant_id).await
}

pub async fn register_with<G>(
    store: &dyn ParticipantStore,
    req: &CreateParticipantRequest,
    mut next_candidate: G,
) -> Result<Participant>
where
    G: FnMut() -> String + Send,
{
    for attempt in 1..=MAX_INSERT_ATTEMPTS {
        let participant_id = allocate_with(store, &mut next_candidate).await?;

        match store.insert(&req.to_new_participant(participant_id)).await {
            Err(StorageError::DuplicateParticipantId(taken)) => {
                tracing::warn!(attempt, participant_id = %taken, "participant id taken at insert, retrying");
            }
            result => return result,
        }
    }

    Err(StorageError::IdentifierExhausted {
        attempts: MAX_INSERT_ATTEMPTS,
    })
}

/// Stores a batch of participants in one insert, all or nothing.
///
/// Ids for the whole batch are allocated concurrently first. If the insert hits a
/// duplicate (a concurrent writer, or two identical draws within the batch) every
/// id is drawn again.
pub async fn register_many(
    store: &dyn ParticipantStore,
    reqs: &[CreateParticipantRequest],
) -> Result<Vec<Participant>> {
    if reqs.is_empty() {
        return Ok(Vec::new());
    }

    for attempt in 1..=MAX_INSERT_ATTEMPTS {
        let ids = try_join_all(reqs.iter().map(|_| allocate(store))).await?;

        let rows: Vec<_> = reqs
            .iter()
            .zip(ids)
            .map(|(req, id)| req.to_new_participant(id))
            .collect();

        match store.insert_many(&rows).await {
            Err(StorageError::DuplicateParticipantId(taken)) => {
                tracing::warn!(attempt, participant_id = %taken, "duplicate id in bulk insert, redrawing batch");
            }
            result => return result,
        }
    }

    Err(StorageError::IdentifierExhausted {
        attempts: MAX_INSERT_ATTEMPTS,
    })
}
