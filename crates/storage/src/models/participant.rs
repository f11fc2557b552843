use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: Uuid,
    /// Short public identifier printed on badges, e.g. `aZ3k9`.
    pub participant_id: String,
    pub first_name: String,
    pub last_name: String,
    pub designation: String,
    pub institute: String,
    pub id_card_type: String,
    pub background_image: Option<String>,
    pub profile_picture: Option<String>,
    pub event_id: String,
    pub event_name: String,
    pub archive: bool,
    pub created_at: DateTime<Utc>,
}

/// A participant row that has not been written yet.
///
/// `participant_id` is filled in by the allocator right before the insert.
#[derive(Debug, Clone)]
pub struct NewParticipant {
    pub participant_id: String,
    pub first_name: String,
    pub last_name: String,
    pub designation: String,
    pub institute: String,
    pub id_card_type: String,
    pub background_image: Option<String>,
    pub profile_picture: Option<String>,
    pub event_id: String,
    pub event_name: String,
}
