use axum::{Router, routing::get};

use super::handlers::{create_event, list_events};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(list_events).post(create_event))
}
