use axum::{
    Router,
    routing::{get, patch, post},
};

use super::handlers::{
    archive_participant, bulk_upload_participants, create_participant, delete_participant,
    get_participant, list_event_participants, list_participants, update_participant,
};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_participants).post(create_participant))
        .route("/bulk-upload", post(bulk_upload_participants))
        .route("/event/:event_id", get(list_event_participants))
        .route("/archive/:id", patch(archive_participant))
        .route(
            "/:id",
            get(get_participant)
                .patch(update_participant)
                .delete(delete_participant),
        )
}
