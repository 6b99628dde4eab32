//! Request validation for dispatch requests.
//!
//! Turns an untyped JSON body into a `NotificationRequest`. Required fields are
//! checked in a fixed order and the first missing one stops validation.

use serde_json::Value;

use crate::models::{DataMap, NotificationRequest};

/// Required fields, in the order they are checked
pub const REQUIRED_FIELDS: [&str; 4] = ["recipientUserId", "notificationType", "title", "message"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing required parameters: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Invalid parameter: {field} {reason}")]
    InvalidField {
        field: &'static str,
        reason: &'static str,
    },
}

/// Validates and normalizes a raw dispatch request
pub fn validate(raw: &Value) -> Result<NotificationRequest, ValidationError> {
    let [recipient_key, type_key, title_key, message_key] = REQUIRED_FIELDS;

    let recipient_user_id = required_string(raw, recipient_key)?;
    let notification_type = required_string(raw, type_key)?;
    let title = required_string(raw, title_key)?;
    let message = required_string(raw, message_key)?;

    let data = match raw.get("data") {
        None | Some(Value::Null) => DataMap::new(),
        Some(Value::Object(map)) => map.clone(),
        Some(_) => {
            return Err(ValidationError::InvalidField {
                field: "data",
                reason: "must be an object",
            })
        }
    };

    let baby_profile_id = match raw.get("babyProfileId") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.is_empty() => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            return Err(ValidationError::InvalidField {
                field: "babyProfileId",
                reason: "must be a string",
            })
        }
    };

    let batch = match raw.get("batch") {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(_) => {
            return Err(ValidationError::InvalidField {
                field: "batch",
                reason: "must be a boolean",
            })
        }
    };

    Ok(NotificationRequest {
        recipient_user_id,
        notification_type,
        title,
        message,
        data,
        baby_profile_id,
        batch,
    })
}

/// A required field counts as missing unless it is a non-empty string
fn required_string(raw: &Value, field: &'static str) -> Result<String, ValidationError> {
    match raw.get(field) {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        _ => Err(ValidationError::MissingFields(vec![field])),
    }
}
