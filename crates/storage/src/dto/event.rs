use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Request payload for creating a new event
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    #[serde(default)]
    #[validate(length(
        min = 1,
        max = 255,
        message = "Event name must be between 1 and 255 characters"
    ))]
    pub event_name: String,

    #[serde(default)]
    #[validate(length(min = 1, max = 500, message = "Address is required"))]
    pub address: String,

    /// RFC 3339 timestamp, or a plain `YYYY-MM-DD` date taken as midnight UTC.
    #[serde(deserialize_with = "deserialize_event_date")]
    pub date: DateTime<Utc>,

    #[validate(length(max = 2048))]
    pub photo_url: Option<String>,

    #[serde(default)]
    pub categories: Vec<String>,
}

fn deserialize_event_date<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_event_date(&raw).ok_or_else(|| {
        serde::de::Error::custom(format!(
            "invalid date `{raw}`, expected RFC 3339 or YYYY-MM-DD"
        ))
    })
}

fn parse_event_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rfc3339_date() {
        let date = parse_event_date("2024-05-01T10:30:00+02:00").unwrap();
        assert_eq!(date.to_rfc3339(), "2024-05-01T08:30:00+00:00");
    }

    #[test]
    fn test_parse_plain_date() {
        let date = parse_event_date("2024-05-01").unwrap();
        assert_eq!(date.to_rfc3339(), "2024-05-01T00:00:00+00:00");
    }

    #[test]
    fn test_reject_garbage_date() {
        assert!(parse_event_date("next tuesday").is_none());
    }

    #[test]
    fn test_missing_name_fails_validation() {
        let req: CreateEventRequest = serde_json::from_value(serde_json::json!({
            "address": "1 Main St",
            "date": "2024-05-01"
        }))
        .unwrap();

        let errors = req.validate().unwrap_err();
        assert_eq!(errors.field_errors().len(), 1);
        assert!(req.categories.is_empty());
    }
}
