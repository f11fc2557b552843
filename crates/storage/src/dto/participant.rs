use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{NewParticipant, Participant};

/// Fields a PATCH request is allowed to touch.
pub const ALLOWED_UPDATES: &[&str] = &[
    "firstName",
    "lastName",
    "designation",
    "idCardType",
    "backgroundImage",
    "profilePicture",
    "eventId",
    "eventName",
];

/// Request payload for registering a participant.
///
/// The spreadsheet export used for bulk uploads names some columns differently
/// (`FirstName`, `last`, `Designation`, `ProfilePicture`), those are accepted too.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateParticipantRequest {
    #[serde(default, alias = "FirstName")]
    #[validate(length(min = 1, max = 255, message = "First name is required"))]
    pub first_name: String,

    #[serde(default, alias = "last")]
    #[validate(length(min = 1, max = 255, message = "Last name is required"))]
    pub last_name: String,

    #[serde(default, alias = "Designation")]
    #[validate(length(min = 1, max = 255, message = "Designation is required"))]
    pub designation: String,

    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "Institute is required"))]
    pub institute: String,

    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "ID card type is required"))]
    pub id_card_type: String,

    #[validate(length(max = 2048))]
    pub background_image: Option<String>,

    #[serde(alias = "ProfilePicture")]
    #[validate(length(max = 2048))]
    pub profile_picture: Option<String>,

    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "Event id is required"))]
    pub event_id: String,

    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "Event name is required"))]
    pub event_name: String,
}

impl CreateParticipantRequest {
    pub fn to_new_participant(&self, participant_id: String) -> NewParticipant {
        NewParticipant {
            participant_id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            designation: self.designation.clone(),
            institute: self.institute.clone(),
            id_card_type: self.id_card_type.clone(),
            background_image: self.background_image.clone(),
            profile_picture: self.profile_picture.clone(),
            event_id: self.event_id.clone(),
            event_name: self.event_name.clone(),
        }
    }
}

/// Body schema of `POST /api/participants/bulk-upload`, either
/// `{ "participants": [...] }` or the bare list.
///
/// The handler reads the items one by one so that a bad row can be reported
/// by index.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum BulkUploadRequest {
    Wrapped {
        participants: Vec<CreateParticipantRequest>,
    },
    List(Vec<CreateParticipantRequest>),
}

/// Partial update of a participant.
///
/// Only the keys in [`ALLOWED_UPDATES`] are accepted; callers should check the raw
/// key set with [`UpdateParticipantRequest::disallowed_fields`] before deserializing.
/// The two image fields distinguish "absent" from an explicit `null` that clears them.
/// The other fields are required on the record, so `null` is rejected for them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateParticipantRequest {
    #[serde(default, deserialize_with = "reject_null")]
    #[validate(length(min = 1, max = 255))]
    pub first_name: Option<String>,

    #[serde(default, deserialize_with = "reject_null")]
    #[validate(length(min = 1, max = 255))]
    pub last_name: Option<String>,

    #[serde(default, deserialize_with = "reject_null")]
    #[validate(length(min = 1, max = 255))]
    pub designation: Option<String>,

    #[serde(default, deserialize_with = "reject_null")]
    #[validate(length(min = 1, max = 255))]
    pub id_card_type: Option<String>,

    #[serde(default, deserialize_with = "explicit_null")]
    #[schema(value_type = Option<String>)]
    pub background_image: Option<Option<String>>,

    #[serde(default, deserialize_with = "explicit_null")]
    #[schema(value_type = Option<String>)]
    pub profile_picture: Option<Option<String>>,

    #[serde(default, deserialize_with = "reject_null")]
    #[validate(length(min = 1, max = 255))]
    pub event_id: Option<String>,

    #[serde(default, deserialize_with = "reject_null")]
    #[validate(length(min = 1, max = 255))]
    pub event_name: Option<String>,
}

fn explicit_null<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

fn reject_null<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(value) => Ok(Some(value)),
        None => Err(serde::de::Error::custom(
            "null is only accepted for backgroundImage and profilePicture",
        )),
    }
}

impl UpdateParticipantRequest {
    /// Returns the keys that are not in [`ALLOWED_UPDATES`], in input order.
    pub fn disallowed_fields<'a, I>(keys: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a String>,
    {
        keys.into_iter()
            .filter(|key| !ALLOWED_UPDATES.contains(&key.as_str()))
            .cloned()
            .collect()
    }

    /// `(column, value)` for every field present in the request, in table order.
    /// A `None` value clears an image column.
    pub fn changes(&self) -> Vec<(&'static str, Option<&str>)> {
        [
            ("first_name", self.first_name.as_deref().map(Some)),
            ("last_name", self.last_name.as_deref().map(Some)),
            ("designation", self.designation.as_deref().map(Some)),
            ("id_card_type", self.id_card_type.as_deref().map(Some)),
            ("background_image", self.background_image.as_ref().map(|v| v.as_deref())),
            ("profile_picture", self.profile_picture.as_ref().map(|v| v.as_deref())),
            ("event_id", self.event_id.as_deref().map(Some)),
            ("event_name", self.event_name.as_deref().map(Some)),
        ]
        .into_iter()
        .filter_map(|(column, value)| value.map(|v| (column, v)))
        .collect()
    }

    /// Copies every present field onto `participant`.
    pub fn apply_to(&self, participant: &mut Participant) {
        if let Some(first_name) = &self.first_name {
            participant.first_name = first_name.clone();
        }
        if let Some(last_name) = &self.last_name {
            participant.last_name = last_name.clone();
        }
        if let Some(designation) = &self.designation {
            participant.designation = designation.clone();
        }
        if let Some(id_card_type) = &self.id_card_type {
            participant.id_card_type = id_card_type.clone();
        }
        if let Some(background_image) = &self.background_image {
            participant.background_image = background_image.clone();
        }
        if let Some(profile_picture) = &self.profile_picture {
            participant.profile_picture = profile_picture.clone();
        }
        if let Some(event_id) = &self.event_id {
            participant.event_id = event_id.clone();
        }
        if let Some(event_name) = &self.event_name {
            participant.event_name = event_name.clone();
        }
    }
}

/// Body returned by `DELETE /api/participants/{id}`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteParticipantResponse {
    pub message: String,
    pub participant: Participant,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;
    use uuid::Uuid;

    fn sample_participant() -> Participant {
        Participant {
            id: Uuid::new_v4(),
            participant_id: "aB3dE".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            designation: "Engineer".to_string(),
            institute: "X".to_string(),
            id_card_type: "Staff".to_string(),
            background_image: Some("https://cdn.example.com/bg.png".to_string()),
            profile_picture: None,
            event_id: "E1".to_string(),
            event_name: "Launch".to_string(),
            archive: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_missing_institute_is_reported() {
        let req: CreateParticipantRequest = serde_json::from_value(json!({
            "firstName": "Ada",
            "lastName": "Lovelace",
            "designation": "Engineer",
            "idCardType": "Staff",
            "eventId": "E1",
            "eventName": "Launch"
        }))
        .unwrap();

        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert_eq!(fields.len(), 1);
        assert!(fields.contains_key("institute"));
    }

    #[test]
    fn test_spreadsheet_aliases() {
        let req: CreateParticipantRequest = serde_json::from_value(json!({
            "FirstName": "Grace",
            "last": "Hopper",
            "Designation": "Admiral",
            "institute": "Navy",
            "idCardType": "Guest",
            "ProfilePicture": "https://cdn.example.com/grace.png",
            "eventId": "E1",
            "eventName": "Launch"
        }))
        .unwrap();

        assert!(req.validate().is_ok());
        assert_eq!(req.first_name, "Grace");
        assert_eq!(req.last_name, "Hopper");
        assert_eq!(req.designation, "Admiral");
        assert_eq!(
            req.profile_picture.as_deref(),
            Some("https://cdn.example.com/grace.png")
        );
    }

    #[test]
    fn test_duplicate_alias_names_the_field() {
        let err = serde_json::from_value::<CreateParticipantRequest>(json!({
            "firstName": "Ada",
            "FirstName": "Grace"
        }))
        .unwrap_err();

        assert!(err.to_string().contains("duplicate field `firstName`"), "{err}");
    }

    #[test]
    fn test_disallowed_fields() {
        let keys = vec![
            "firstName".to_string(),
            "archive".to_string(),
            "participantId".to_string(),
        ];
        assert_eq!(
            UpdateParticipantRequest::disallowed_fields(&keys),
            vec!["archive".to_string(), "participantId".to_string()]
        );

        let allowed: Vec<String> = ALLOWED_UPDATES.iter().map(|s| s.to_string()).collect();
        assert!(UpdateParticipantRequest::disallowed_fields(&allowed).is_empty());
    }

    #[test]
    fn test_apply_keeps_absent_fields() {
        let mut participant = sample_participant();
        let update: UpdateParticipantRequest =
            serde_json::from_value(json!({ "designation": "Director" })).unwrap();

        update.apply_to(&mut participant);

        assert_eq!(participant.designation, "Director");
        assert_eq!(participant.first_name, "Ada");
        assert!(participant.background_image.is_some());
    }

    #[test]
    fn test_explicit_null_clears_image() {
        let mut participant = sample_participant();
        let update: UpdateParticipantRequest =
            serde_json::from_value(json!({ "backgroundImage": null })).unwrap();

        assert_eq!(update.background_image, Some(None));
        update.apply_to(&mut participant);
        assert!(participant.background_image.is_none());
    }

    #[test]
    fn test_null_required_field_is_rejected() {
        let err = serde_json::from_value::<UpdateParticipantRequest>(json!({ "firstName": null }))
            .unwrap_err();
        assert!(err.to_string().contains("null is only accepted"), "{err}");

        let absent: UpdateParticipantRequest = serde_json::from_value(json!({})).unwrap();
        assert!(absent.first_name.is_none());
    }

    #[test]
    fn test_changes_list_only_present_columns() {
        let update: UpdateParticipantRequest = serde_json::from_value(json!({
            "designation": "Director",
            "profilePicture": null
        }))
        .unwrap();

        assert_eq!(
            update.changes(),
            vec![("designation", Some("Director")), ("profile_picture", None)]
        );
        assert!(UpdateParticipantRequest::default().changes().is_empty());
    }

    #[test]
    fn test_empty_name_fails_validation() {
        let update: UpdateParticipantRequest =
            serde_json::from_value(json!({ "firstName": "" })).unwrap();
        assert!(update.validate().is_err());
    }
}
