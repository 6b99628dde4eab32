//! Notification dispatch pipeline.
//!
//! Sequences validation, persistence and a single best-effort push:
//! 1. Validate the raw request (no side effects on failure)
//! 2. Persist the record; a store failure ends the dispatch
//! 3. Without provider credentials, report the record as stored
//! 4. Otherwise push once, bounded by a timeout, and classify the result
//!
//! Delivery failures never undo or hide the persisted record.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use crate::auth::CallerIdentity;
use crate::config::Config;
use crate::models::{
    DispatchOutcome, LocalizedText, NewNotification, NotificationRecord, NotificationRequest,
    PlatformHints, PushPayload,
};
use crate::services::dedup::{CorrelationDedup, DuplicateGuard};
use crate::services::push::{OneSignalClient, ProviderError, PushProvider};
use crate::services::store::{NotificationStore, StoreError};
use crate::services::validation::{validate, ValidationError};

/// Default upper bound for one provider call
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(5);

/// Dispatches that ended without a usable record
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Duplicate of notification {existing_id}")]
    Duplicate { existing_id: Uuid },

    #[error("Failed to save notification: {0}")]
    Persistence(#[from] StoreError),
}

/// The dispatch orchestrator
pub struct NotificationDispatcher {
    store: Arc<dyn NotificationStore>,
    provider: Option<Arc<dyn PushProvider>>,
    provider_timeout: Duration,
    hints: PlatformHints,
    duplicate_guard: Option<Arc<dyn DuplicateGuard>>,
}

impl NotificationDispatcher {
    /// Creates a dispatcher with no push provider configured
    pub fn new(store: Arc<dyn NotificationStore>) -> Self {
        Self {
            store,
            provider: None,
            provider_timeout: DEFAULT_PROVIDER_TIMEOUT,
            hints: PlatformHints::default(),
            duplicate_guard: None,
        }
    }

    pub fn with_provider(mut self, provider: Arc<dyn PushProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn with_provider_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = timeout;
        self
    }

    pub fn with_platform_hints(mut self, hints: PlatformHints) -> Self {
        self.hints = hints;
        self
    }

    pub fn with_duplicate_guard(mut self, guard: Arc<dyn DuplicateGuard>) -> Self {
        self.duplicate_guard = Some(guard);
        self
    }

    /// Wires the dispatcher from application configuration.
    ///
    /// The OneSignal client is only built when both credentials are present.
    pub fn from_config(
        config: &Config,
        store: Arc<dyn NotificationStore>,
    ) -> Result<Self, reqwest::Error> {
        let mut dispatcher = Self::new(store.clone())
            .with_provider_timeout(config.push.timeout)
            .with_platform_hints(PlatformHints {
                android_channel_id: Some(config.push.android_channel_id.clone()),
                ios_sound: Some(config.push.ios_sound.clone()),
            });

        match config.push.credentials() {
            Some(credentials) => {
                let client = OneSignalClient::new(config.push.api_url.clone(), credentials)?;
                dispatcher = dispatcher.with_provider(Arc::new(client));
            }
            None => {
                log::warn!(
                    "Push provider credentials not configured, notifications will be stored only"
                );
            }
        }

        if let Some(window) = config.dispatch.dedup_window {
            log::info!("Duplicate dispatch guard enabled ({}s window)", window.as_secs());
            dispatcher =
                dispatcher.with_duplicate_guard(Arc::new(CorrelationDedup::new(store, window)));
        }

        Ok(dispatcher)
    }

    pub fn is_push_configured(&self) -> bool {
        self.provider.is_some()
    }

    /// Validates a raw request and dispatches it
    pub async fn handle(
        &self,
        raw: &Value,
        identity: &CallerIdentity,
    ) -> Result<DispatchOutcome, DispatchError> {
        let request = validate(raw)?;
        self.dispatch(request, identity).await
    }

    /// Persists the notification, then attempts delivery once
    pub async fn dispatch(
        &self,
        request: NotificationRequest,
        identity: &CallerIdentity,
    ) -> Result<DispatchOutcome, DispatchError> {
        if let Some(ref guard) = self.duplicate_guard {
            if let Some(existing) = guard.find_duplicate(identity, &request).await? {
                log::info!(
                    "Rejecting duplicate {} notification for {} (existing {})",
                    request.notification_type,
                    request.recipient_user_id,
                    existing.id
                );
                return Err(DispatchError::Duplicate {
                    existing_id: existing.id,
                });
            }
        }

        // 1. Persist
        let new = NewNotification::from_request(&request, Utc::now());
        let record = self.store.insert(identity, new).await.map_err(|e| {
            log::error!("Error saving notification: {}", e);
            DispatchError::Persistence(e)
        })?;

        // 2. Stored-only when the provider is unconfigured
        let provider = match self.provider {
            Some(ref provider) => provider,
            None => {
                log::warn!(
                    "Push provider not configured, notification {} stored without push",
                    record.id
                );
                return Ok(DispatchOutcome::Stored { record });
            }
        };

        // 3. Build the provider payload
        let payload = build_push_payload(&request, &record, &self.hints);

        // 4. Deliver exactly once
        let result = tokio::time::timeout(self.provider_timeout, provider.send(&payload))
            .await
            .unwrap_or(Err(ProviderError::Timeout));

        match result {
            Ok(receipt) => {
                log::info!(
                    "Notification {} pushed ({} recipients)",
                    record.id,
                    receipt.recipients
                );
                Ok(DispatchOutcome::Delivered {
                    record,
                    provider_delivery_id: receipt.id,
                    recipient_count: receipt.recipients,
                })
            }
            Err(e) => {
                log::warn!("Push for notification {} failed: {}", record.id, e);
                Ok(DispatchOutcome::PersistedDeliveryFailed {
                    record,
                    reason: e.to_string(),
                })
            }
        }
    }
}

/// Builds the provider payload for a persisted record.
///
/// Caller data is copied first and the internal keys are written over it, so
/// a caller can never spoof `notificationId`, `babyProfileId` or
/// `notificationType`.
pub fn build_push_payload(
    request: &NotificationRequest,
    record: &NotificationRecord,
    hints: &PlatformHints,
) -> PushPayload {
    let mut data = request.data.clone();
    data.insert(
        "notificationId".to_string(),
        Value::String(record.id.to_string()),
    );
    match record.baby_profile_id {
        Some(ref id) => {
            data.insert("babyProfileId".to_string(), Value::String(id.clone()));
        }
        None => {
            data.remove("babyProfileId");
        }
    }
    data.insert(
        "notificationType".to_string(),
        Value::String(record.notification_type.clone()),
    );

    PushPayload {
        include_external_user_ids: vec![record.recipient_user_id.clone()],
        headings: LocalizedText::en(record.title.clone()),
        contents: LocalizedText::en(record.message.clone()),
        data,
        android_channel_id: hints.android_channel_id.clone(),
        ios_sound: hints.ios_sound.clone(),
    }
}
