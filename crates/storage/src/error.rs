use thiserror::Error;

/// Name of the unique index guarding `participants.participant_id`.
pub const PARTICIPANT_ID_CONSTRAINT: &str = "participants_participant_id_key";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Not found")]
    NotFound,

    #[error("Participant id already taken: {0}")]
    DuplicateParticipantId(String),

    #[error("Could not allocate a free participant id after {attempts} attempts")]
    IdentifierExhausted { attempts: usize },
}

pub type Result<T> = std::result::Result<T, StorageError>;

impl StorageError {
    /// Rewrites a raw unique-violation on the participant id index into
    /// [`StorageError::DuplicateParticipantId`], leaving every other error as is.
    pub(crate) fn from_insert(error: sqlx::Error, participant_id: &str) -> Self {
        if let sqlx::Error::Database(db) = &error {
            if db.code().as_deref() == Some("23505")
                && db.constraint() == Some(PARTICIPANT_ID_CONSTRAINT)
            {
                return StorageError::DuplicateParticipantId(participant_id.to_string());
            }
        }

        StorageError::Database(error)
    }
}
