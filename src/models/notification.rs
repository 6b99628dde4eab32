//! Notification models for the dispatch pipeline.
//!
//! `NotificationRequest` is the validated caller intent, `NotificationRecord`
//! is the persisted row and `DispatchOutcome` classifies what happened to it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Free-form data mapping attached to a notification
pub type DataMap = serde_json::Map<String, serde_json::Value>;

// =============================================================================
// Request
// =============================================================================

/// A validated dispatch request
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationRequest {
    pub recipient_user_id: String,
    pub notification_type: String,
    pub title: String,
    pub message: String,
    pub data: DataMap,
    /// Related resource the notification is about (e.g. a baby profile)
    pub baby_profile_id: Option<String>,
    pub batch: bool,
}

// =============================================================================
// Record
// =============================================================================

/// Persisted notification row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct NotificationRecord {
    pub id: Uuid,
    pub recipient_user_id: String,
    pub notification_type: String,
    pub title: String,
    pub message: String,
    pub data: sqlx::types::Json<DataMap>,
    pub baby_profile_id: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Insert DTO handed to the store; the store assigns the identifier
#[derive(Debug, Clone, PartialEq)]
pub struct NewNotification {
    pub recipient_user_id: String,
    pub notification_type: String,
    pub title: String,
    pub message: String,
    pub data: DataMap,
    pub baby_profile_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl NewNotification {
    /// Builds the row to insert, stamped with the server clock
    pub fn from_request(request: &NotificationRequest, created_at: DateTime<Utc>) -> Self {
        Self {
            recipient_user_id: request.recipient_user_id.clone(),
            notification_type: request.notification_type.clone(),
            title: request.title.clone(),
            message: request.message.clone(),
            data: request.data.clone(),
            baby_profile_id: request.baby_profile_id.clone(),
            created_at,
        }
    }
}

// =============================================================================
// Outcome
// =============================================================================

/// Result of a dispatch whose record was persisted
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// Record stored; no provider configured so delivery was not attempted
    Stored { record: NotificationRecord },
    /// Record stored and the provider accepted the push
    Delivered {
        record: NotificationRecord,
        provider_delivery_id: Option<String>,
        recipient_count: u64,
    },
    /// Record stored but the single delivery attempt failed
    PersistedDeliveryFailed {
        record: NotificationRecord,
        reason: String,
    },
}

impl DispatchOutcome {
    pub fn record(&self) -> &NotificationRecord {
        match self {
            DispatchOutcome::Stored { record }
            | DispatchOutcome::Delivered { record, .. }
            | DispatchOutcome::PersistedDeliveryFailed { record, .. } => record,
        }
    }

    pub fn push_sent(&self) -> bool {
        matches!(self, DispatchOutcome::Delivered { .. })
    }
}

// =============================================================================
// Wire response
// =============================================================================

/// Informational message for the stored-only path
pub const PUSH_NOT_CONFIGURED_MESSAGE: &str =
    "Notification saved but push not sent (push provider not configured)";

/// 200 response body for a persisted notification
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchResponse {
    pub success: bool,
    pub notification: NotificationRecord,
    pub push_sent: bool,
    #[serde(rename = "oneSignalId", skip_serializing_if = "Option::is_none")]
    pub one_signal_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipients: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<DispatchOutcome> for DispatchResponse {
    fn from(outcome: DispatchOutcome) -> Self {
        match outcome {
            DispatchOutcome::Stored { record } => Self {
                success: true,
                notification: record,
                push_sent: false,
                one_signal_id: None,
                recipients: None,
                error: None,
                message: Some(PUSH_NOT_CONFIGURED_MESSAGE.to_string()),
            },
            DispatchOutcome::Delivered {
                record,
                provider_delivery_id,
                recipient_count,
            } => Self {
                success: true,
                notification: record,
                push_sent: true,
                one_signal_id: provider_delivery_id,
                recipients: Some(recipient_count),
                error: None,
                message: None,
            },
            DispatchOutcome::PersistedDeliveryFailed { record, reason } => Self {
                success: true,
                notification: record,
                push_sent: false,
                one_signal_id: None,
                recipients: None,
                error: Some(reason),
                message: None,
            },
        }
    }
}
