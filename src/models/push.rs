//! Push provider wire models (OneSignal create-notification API).

use serde::{Deserialize, Serialize};

use super::notification::DataMap;

/// Single-locale text block (`{"en": "..."}`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    pub en: String,
}

impl LocalizedText {
    pub fn en(text: impl Into<String>) -> Self {
        Self { en: text.into() }
    }
}

/// Provider-agnostic push payload built by the dispatcher.
///
/// The client adds the application id when it serializes the request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushPayload {
    pub include_external_user_ids: Vec<String>,
    pub headings: LocalizedText,
    pub contents: LocalizedText,
    pub data: DataMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub android_channel_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ios_sound: Option<String>,
}

/// Request body sent to the provider
#[derive(Debug, Serialize)]
pub struct OneSignalRequest<'a> {
    pub app_id: &'a str,
    #[serde(flatten)]
    pub payload: &'a PushPayload,
}

/// Accepted delivery as reported by the provider
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PushReceipt {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub recipients: u64,
}

/// Per-notification platform hints
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatformHints {
    pub android_channel_id: Option<String>,
    pub ios_sound: Option<String>,
}
