use async_trait::async_trait;
use sqlx::PgPool;

use crate::dto::event::CreateEventRequest;
use crate::error::Result;
use crate::models::Event;

use super::EventStore;

pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventStore for EventRepository {
    /// Create a new event
    async fn insert(&self, req: &CreateEventRequest) -> Result<Event> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (event_name, address, date, photo_url, categories)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, event_name, address, date, photo_url, categories, created_at
            "#,
        )
        .bind(&req.event_name)
        .bind(&req.address)
        .bind(req.date)
        .bind(&req.photo_url)
        .bind(&req.categories)
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    /// List all events
    async fn list(&self) -> Result<Vec<Event>> {
        let events = sqlx::query_as::<_, Event>(
            r#"
            SELECT id, event_name, address, date, photo_url, categories, created_at
            FROM events
            ORDER BY date, created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }
}
