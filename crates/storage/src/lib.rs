use std::sync::Arc;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

pub mod dto;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

use error::Result;
use repository::{EventRepository, EventStore, ParticipantRepository, ParticipantStore};

/// Handle on the PostgreSQL pool backing both collections.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    pub fn event_store(&self) -> Arc<dyn EventStore> {
        Arc::new(EventRepository::new(self.pool.clone()))
    }

    pub fn participant_store(&self) -> Arc<dyn ParticipantStore> {
        Arc::new(ParticipantRepository::new(self.pool.clone()))
    }
}
