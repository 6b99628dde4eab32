//! Push provider seam.
//!
//! The dispatcher talks to the provider through the `PushProvider` trait so
//! the delivery channel can be swapped (or faked in tests). Any non-success
//! is a `ProviderError`; callers must not branch on provider error codes.

pub mod onesignal;

use async_trait::async_trait;

use crate::models::{PushPayload, PushReceipt};

pub use onesignal::OneSignalClient;

/// Failure of a single delivery attempt
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("Push provider request timed out")]
    Timeout,

    #[error("Connection to push provider failed")]
    Connect,

    #[error("Push provider request failed: {0}")]
    Transport(String),

    #[error("Push provider rejected the notification: {message}")]
    Rejected { status: u16, message: String },

    #[error("Invalid push provider response: {0}")]
    InvalidResponse(String),
}

/// Sends one push notification per call, without retrying
#[async_trait]
pub trait PushProvider: Send + Sync {
    async fn send(&self, payload: &PushPayload) -> Result<PushReceipt, ProviderError>;
}
