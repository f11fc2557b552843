use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::dto::participant::UpdateParticipantRequest;
use crate::error::{Result, StorageError};
use crate::models::{NewParticipant, Participant};

use super::ParticipantStore;

const RETURNING_COLUMNS: &str = "id, participant_id, first_name, last_name, designation, institute, \
     id_card_type, background_image, profile_picture, event_id, event_name, archive, created_at";

/// Bound values per row of a participant INSERT.
const INSERT_BINDS_PER_ROW: usize = 10;

/// PostgreSQL's limit on bind parameters in one statement.
const MAX_BIND_PARAMS: usize = u16::MAX as usize;

/// Rows per statement when inserting a batch.
const MAX_ROWS_PER_INSERT: usize = MAX_BIND_PARAMS / INSERT_BINDS_PER_ROW;

pub struct ParticipantRepository {
    pool: PgPool,
}

impl ParticipantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ParticipantStore for ParticipantRepository {
    async fn participant_id_exists(&self, participant_id: &str) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM participants WHERE participant_id = $1)",
        )
        .bind(participant_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Create a new participant
    async fn insert(&self, participant: &NewParticipant) -> Result<Participant> {
        let sql = format!(
            r#"
            INSERT INTO participants (participant_id, first_name, last_name, designation, institute,
                                      id_card_type, background_image, profile_picture, event_id, event_name)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {RETURNING_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Participant>(&sql)
            .bind(&participant.participant_id)
            .bind(&participant.first_name)
            .bind(&participant.last_name)
            .bind(&participant.designation)
            .bind(&participant.institute)
            .bind(&participant.id_card_type)
            .bind(&participant.background_image)
            .bind(&participant.profile_picture)
            .bind(&participant.event_id)
            .bind(&participant.event_name)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StorageError::from_insert(e, &participant.participant_id))
    }

    /// Multi-row INSERTs of at most [`MAX_ROWS_PER_INSERT`] rows, all in one
    /// transaction so the batch lands atomically.
    async fn insert_many(&self, participants: &[NewParticipant]) -> Result<Vec<Participant>> {
        if participants.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self.pool.begin().await?;
        let mut saved = Vec::with_capacity(participants.len());

        for chunk in participants.chunks(MAX_ROWS_PER_INSERT) {
            let rows = insert_statement(chunk)
                .build_query_as::<Participant>()
                .fetch_all(&mut *tx)
                .await
                .map_err(|e| {
                    StorageError::from_insert(e, &format!("one of {} batch ids", participants.len()))
                })?;
            saved.extend(rows);
        }

        tx.commit().await?;
        Ok(saved)
    }

    /// List all participants, archived ones included
    async fn list(&self) -> Result<Vec<Participant>> {
        let sql = format!("SELECT {RETURNING_COLUMNS} FROM participants ORDER BY created_at");

        let participants = sqlx::query_as::<_, Participant>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(participants)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Participant> {
        let sql = format!("SELECT {RETURNING_COLUMNS} FROM participants WHERE id = $1");

        sqlx::query_as::<_, Participant>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StorageError::NotFound)
    }

    async fn list_active_by_event(&self, event_id: &str) -> Result<Vec<Participant>> {
        let sql = format!(
            "SELECT {RETURNING_COLUMNS} FROM participants \
             WHERE event_id = $1 AND archive = FALSE ORDER BY created_at"
        );

        let participants = sqlx::query_as::<_, Participant>(&sql)
            .bind(event_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(participants)
    }

    /// Update the allow-listed columns present in the request
    async fn update(&self, id: Uuid, req: &UpdateParticipantRequest) -> Result<Participant> {
        let changes = req.changes();
        if changes.is_empty() {
            return self.find_by_id(id).await;
        }

        update_statement(id, &changes)
            .build_query_as::<Participant>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StorageError::NotFound)
    }

    async fn archive(&self, id: Uuid) -> Result<Participant> {
        let sql = format!(
            "UPDATE participants SET archive = TRUE WHERE id = $1 RETURNING {RETURNING_COLUMNS}"
        );

        sqlx::query_as::<_, Participant>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StorageError::NotFound)
    }

    /// Delete a participant by ID
    async fn delete(&self, id: Uuid) -> Result<Participant> {
        let sql = format!("DELETE FROM participants WHERE id = $1 RETURNING {RETURNING_COLUMNS}");

        sqlx::query_as::<_, Participant>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StorageError::NotFound)
    }
}

fn insert_statement(participants: &[NewParticipant]) -> QueryBuilder<'_, Postgres> {
    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
        "INSERT INTO participants (participant_id, first_name, last_name, designation, institute, \
         id_card_type, background_image, profile_picture, event_id, event_name) ",
    );

    builder.push_values(participants, |mut row, p| {
        row.push_bind(&p.participant_id)
            .push_bind(&p.first_name)
            .push_bind(&p.last_name)
            .push_bind(&p.designation)
            .push_bind(&p.institute)
            .push_bind(&p.id_card_type)
            .push_bind(&p.background_image)
            .push_bind(&p.profile_picture)
            .push_bind(&p.event_id)
            .push_bind(&p.event_name);
    });
    builder.push(" RETURNING ");
    builder.push(RETURNING_COLUMNS);

    builder
}

fn update_statement<'a>(
    id: Uuid,
    changes: &[(&'static str, Option<&'a str>)],
) -> QueryBuilder<'a, Postgres> {
    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE participants SET ");

    let mut assignments = builder.separated(", ");
    for (column, value) in changes {
        assignments.push(*column);
        assignments.push_unseparated(" = ");
        assignments.push_bind_unseparated(*value);
    }

    builder.push(" WHERE id = ");
    builder.push_bind(id);
    builder.push(" RETURNING ");
    builder.push(RETURNING_COLUMNS);

    builder
}
