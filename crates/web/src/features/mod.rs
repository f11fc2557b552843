use axum::Router;

use crate::AppState;

pub mod events;
pub mod participants;

pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/events", events::routes::routes())
        .nest("/participants", participants::routes::routes())
}
