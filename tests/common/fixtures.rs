//! Test fixtures for dispatch requests

use serde_json::{json, Value};

/// The photo-upload request used throughout the dispatch tests
pub fn photo_upload_request() -> Value {
    json!({
        "recipientUserId": "u1",
        "notificationType": "photo_upload",
        "title": "New Photo",
        "message": "A new photo was added"
    })
}

/// Builds a request body with optional fields on top of the required ones
pub struct RequestBuilder {
    body: Value,
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self {
            body: photo_upload_request(),
        }
    }
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: Value) -> Self {
        self.body[key] = value;
        self
    }

    pub fn without(mut self, key: &str) -> Self {
        if let Some(map) = self.body.as_object_mut() {
            map.remove(key);
        }
        self
    }

    pub fn with_data(self, data: Value) -> Self {
        self.with("data", data)
    }

    pub fn with_baby_profile(self, id: &str) -> Self {
        self.with("babyProfileId", json!(id))
    }

    pub fn build(self) -> Value {
        self.body
    }
}
