use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub event_name: String,
    pub address: String,
    pub date: DateTime<Utc>,
    pub photo_url: Option<String>,
    pub categories: Vec<String>,
    pub created_at: DateTime<Utc>,
}
