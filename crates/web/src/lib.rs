use std::sync::Arc;

use axum::{Router, extract::DefaultBodyLimit};
use storage::repository::{EventStore, ParticipantStore};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod config;
pub mod error;
pub mod extract;
pub mod features;
pub mod uploads;

use uploads::UploadStore;

/// Shared handles cloned into every request.
#[derive(Clone)]
pub struct AppState {
    pub events: Arc<dyn EventStore>,
    pub participants: Arc<dyn ParticipantStore>,
    pub uploads: UploadStore,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        features::events::handlers::list_events,
        features::events::handlers::create_event,
        features::participants::handlers::list_participants,
        features::participants::handlers::list_event_participants,
        features::participants::handlers::get_participant,
        features::participants::handlers::create_participant,
        features::participants::handlers::bulk_upload_participants,
        features::participants::handlers::update_participant,
        features::participants::handlers::archive_participant,
        features::participants::handlers::delete_participant,
    ),
    components(
        schemas(
            storage::dto::event::CreateEventRequest,
            storage::dto::participant::CreateParticipantRequest,
            storage::dto::participant::BulkUploadRequest,
            storage::dto::participant::UpdateParticipantRequest,
            storage::dto::participant::DeleteParticipantResponse,
            storage::models::Event,
            storage::models::Participant,
        )
    ),
    tags(
        (name = "events", description = "Event endpoints"),
        (name = "participants", description = "Participant registration endpoints"),
    )
)]
pub struct ApiDoc;

/// Builds the API router: `/api/*`, the OpenAPI document and Swagger UI.
pub fn app(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", features::routes())
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
