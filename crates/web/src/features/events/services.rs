use storage::{
    dto::event::CreateEventRequest, error::Result, models::Event, repository::EventStore,
};

/// List all events
pub async fn list_events(store: &dyn EventStore) -> Result<Vec<Event>> {
    store.list().await
}

/// Create a new event
pub async fn create_event(store: &dyn EventStore, request: &CreateEventRequest) -> Result<Event> {
    let event = store.insert(request).await?;
    tracing::info!(event_id = %event.id, "created event {}", event.event_name);
    Ok(event)
}
