//! OneSignal push provider client.
//!
//! Posts to the create-notification endpoint with the REST API key as a
//! `Basic` credential and the application id in the body.

use async_trait::async_trait;
use serde::Deserialize;

use super::{ProviderError, PushProvider};
use crate::config::PushCredentials;
use crate::models::{OneSignalRequest, PushPayload, PushReceipt};

/// Longest provider error body echoed back to callers
const MAX_ERROR_BODY: usize = 256;

/// OneSignal REST client
pub struct OneSignalClient {
    client: reqwest::Client,
    api_url: String,
    credentials: PushCredentials,
}

/// Error body shape returned by OneSignal on rejected requests
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: serde_json::Value,
}

impl OneSignalClient {
    /// Creates a new OneSignal client
    pub fn new(
        api_url: impl Into<String>,
        credentials: PushCredentials,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().build()?;

        Ok(Self {
            client,
            api_url: api_url.into(),
            credentials,
        })
    }

    /// Builds a readable message from a non-2xx response body
    fn error_message(status: u16, body: &str) -> String {
        let detail = match serde_json::from_str::<ErrorBody>(body) {
            Ok(ErrorBody {
                errors: serde_json::Value::Array(errors),
            }) if !errors.is_empty() => errors
                .iter()
                .map(|e| match e.as_str() {
                    Some(s) => s.to_string(),
                    None => e.to_string(),
                })
                .collect::<Vec<_>>()
                .join("; "),
            _ => body.trim().chars().take(MAX_ERROR_BODY).collect(),
        };

        if detail.is_empty() {
            format!("HTTP {}", status)
        } else {
            format!("HTTP {}: {}", status, detail)
        }
    }
}

#[async_trait]
impl PushProvider for OneSignalClient {
    async fn send(&self, payload: &PushPayload) -> Result<PushReceipt, ProviderError> {
        let body = OneSignalRequest {
            app_id: &self.credentials.app_id,
            payload,
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("Content-Type", "application/json")
            .header(
                "Authorization",
                format!("Basic {}", self.credentials.api_key),
            )
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout
                } else if e.is_connect() {
                    ProviderError::Connect
                } else {
                    ProviderError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(ProviderError::Rejected {
                status: status.as_u16(),
                message: Self::error_message(status.as_u16(), &text),
            });
        }

        serde_json::from_str::<PushReceipt>(&text)
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))
    }
}
