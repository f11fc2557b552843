//! `multipart/form-data` participant registration.

use axum::extract::Multipart;
use serde_json::{Map, Value};
use storage::dto::participant::CreateParticipantRequest;

use crate::error::{WebError, WebResult};
use crate::uploads::{BACKGROUND_IMAGE, FILE_SLOTS, PROFILE_PICTURE, StoredUpload, UploadStore};

/// Reads the text fields into a request and streams at most one file per slot
/// into the upload store.
///
/// On error every file already stored for this form is removed again.
pub async fn read_participant_form(
    mut multipart: Multipart,
    uploads: &UploadStore,
) -> WebResult<(CreateParticipantRequest, Vec<StoredUpload>)> {
    let mut text = Map::new();
    let mut stored = Vec::new();

    if let Err(e) = collect_fields(&mut multipart, uploads, &mut text, &mut stored).await {
        uploads.discard(&stored).await;
        return Err(e);
    }

    let mut req: CreateParticipantRequest = match serde_json::from_value(Value::Object(text)) {
        Ok(req) => req,
        Err(e) => {
            uploads.discard(&stored).await;
            return Err(WebError::BadRequest(e.to_string()));
        }
    };

    for upload in &stored {
        match upload.slot.as_str() {
            BACKGROUND_IMAGE => req.background_image = Some(upload.url.clone()),
            PROFILE_PICTURE => req.profile_picture = Some(upload.url.clone()),
            _ => {}
        }
    }

    Ok((req, stored))
}

async fn collect_fields(
    multipart: &mut Multipart,
    uploads: &UploadStore,
    text: &mut Map<String, Value>,
    stored: &mut Vec<StoredUpload>,
) -> WebResult<()> {
    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        let file_name = field.file_name().map(str::to_string);

        match file_name.as_deref() {
            // Browsers send an empty file part for an untouched file input.
            Some("") => continue,
            Some(_) => {
                if !FILE_SLOTS.contains(&name.as_str()) || stored.iter().any(|u| u.slot == name) {
                    return Err(WebError::BadRequest(format!("Unexpected file field: {}", name)));
                }
                let upload = uploads.store_field(&name, field).await?;
                stored.push(upload);
            }
            None => {
                let value = field.text().await?;
                text.insert(name, Value::String(value));
            }
        }
    }

    Ok(())
}
