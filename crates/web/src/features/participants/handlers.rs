use axum::{
    Json,
    extract::{FromRequest, Multipart, Path, Request, State},
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value};
use storage::{
    dto::participant::{
        BulkUploadRequest, CreateParticipantRequest, DeleteParticipantResponse,
        UpdateParticipantRequest,
    },
    models::Participant,
};

use crate::AppState;
use crate::error::WebError;
use crate::extract::ApiJson;

use super::{form, services};

fn is_multipart(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"))
}

#[utoipa::path(
    get,
    path = "/api/participants",
    responses(
        (status = 200, description = "List all participants, archived ones included", body = Vec<Participant>)
    ),
    tag = "participants"
)]
pub async fn list_participants(
    State(state): State<AppState>,
) -> Result<Json<Vec<Participant>>, WebError> {
    let participants = services::list_participants(state.participants.as_ref()).await?;

    Ok(Json(participants))
}

#[utoipa::path(
    get,
    path = "/api/participants/event/{event_id}",
    params(
        ("event_id" = String, Path, description = "Event id")
    ),
    responses(
        (status = 200, description = "Non-archived participants of the event", body = Vec<Participant>)
    ),
    tag = "participants"
)]
pub async fn list_event_participants(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> Result<Json<Vec<Participant>>, WebError> {
    let participants =
        services::list_event_participants(state.participants.as_ref(), &event_id).await?;

    Ok(Json(participants))
}

#[utoipa::path(
    get,
    path = "/api/participants/{id}",
    params(
        ("id" = String, Path, description = "Participant record id")
    ),
    responses(
        (status = 200, description = "Participant found", body = Participant),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "Participant not found")
    ),
    tag = "participants"
)]
pub async fn get_participant(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Participant>, WebError> {
    let id = services::parse_id(&id)?;
    let participant = services::get_participant(state.participants.as_ref(), id).await?;

    Ok(Json(participant))
}

/// Accepts `multipart/form-data` (text fields plus optional `backgroundImage` and
/// `profilePicture` files) or a JSON body with the same fields.
#[utoipa::path(
    post,
    path = "/api/participants",
    request_body(
        content = CreateParticipantRequest,
        content_type = "multipart/form-data",
        description = "Participant fields, with optional backgroundImage / profilePicture files"
    ),
    responses(
        (status = 201, description = "Participant created successfully", body = Participant),
        (status = 400, description = "Validation error")
    ),
    tag = "participants"
)]
pub async fn create_participant(
    State(state): State<AppState>,
    request: Request,
) -> Result<Response, WebError> {
    let (req, staged) = if is_multipart(request.headers()) {
        let multipart = Multipart::from_request(request, &state).await?;
        form::read_participant_form(multipart, &state.uploads).await?
    } else {
        let ApiJson(req) =
            ApiJson::<CreateParticipantRequest>::from_request(request, &state).await?;
        (req, Vec::new())
    };

    let participant =
        services::create_participant(state.participants.as_ref(), &state.uploads, &req, &staged)
            .await?;

    Ok((StatusCode::CREATED, Json(participant)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/participants/bulk-upload",
    request_body = BulkUploadRequest,
    responses(
        (status = 201, description = "All participants created", body = Vec<Participant>),
        (status = 400, description = "A participant in the batch is invalid"),
        (status = 500, description = "The batch could not be stored")
    ),
    tag = "participants"
)]
pub async fn bulk_upload_participants(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<Value>,
) -> Result<Response, WebError> {
    let requests = services::parse_bulk_body(body)?;
    let saved = services::bulk_create_participants(state.participants.as_ref(), &requests).await?;

    Ok((StatusCode::CREATED, Json(saved)).into_response())
}

#[utoipa::path(
    patch,
    path = "/api/participants/{id}",
    params(
        ("id" = String, Path, description = "Participant record id")
    ),
    request_body = UpdateParticipantRequest,
    responses(
        (status = 200, description = "Participant updated successfully", body = Participant),
        (status = 400, description = "Field outside the allowed set, or invalid value"),
        (status = 404, description = "Participant not found")
    ),
    tag = "participants"
)]
pub async fn update_participant(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(fields): ApiJson<Map<String, Value>>,
) -> Result<Json<Participant>, WebError> {
    let id = services::parse_id(&id)?;
    let updated = services::update_participant(state.participants.as_ref(), id, fields).await?;

    Ok(Json(updated))
}

#[utoipa::path(
    patch,
    path = "/api/participants/archive/{id}",
    params(
        ("id" = String, Path, description = "Participant record id")
    ),
    responses(
        (status = 200, description = "Participant archived", body = Participant),
        (status = 404, description = "Participant not found")
    ),
    tag = "participants"
)]
pub async fn archive_participant(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Participant>, WebError> {
    let id = services::parse_id(&id)?;
    let archived = services::archive_participant(state.participants.as_ref(), id).await?;

    Ok(Json(archived))
}

#[utoipa::path(
    delete,
    path = "/api/participants/{id}",
    params(
        ("id" = String, Path, description = "Participant record id")
    ),
    responses(
        (status = 200, description = "Participant deleted", body = DeleteParticipantResponse),
        (status = 404, description = "Participant not found")
    ),
    tag = "participants"
)]
pub async fn delete_participant(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteParticipantResponse>, WebError> {
    let id = services::parse_id(&id)?;
    let participant = services::delete_participant(state.participants.as_ref(), id).await?;

    Ok(Json(DeleteParticipantResponse {
        message: "Participant successfully deleted".to_string(),
        participant,
    }))
}
