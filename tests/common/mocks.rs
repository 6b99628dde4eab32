//! In-memory collaborators for the dispatch pipeline
//!
//! Both mocks count their calls so tests can assert exactly which external
//! effects a dispatch produced.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use nonna_notify::auth::CallerIdentity;
use nonna_notify::models::{NewNotification, NotificationRecord, PushPayload, PushReceipt};
use nonna_notify::services::{NotificationStore, ProviderError, PushProvider, StoreError};

// =============================================================================
// Store
// =============================================================================

/// Notification store backed by a vector
#[derive(Default)]
pub struct InMemoryStore {
    records: Mutex<Vec<NotificationRecord>>,
    identities: Mutex<Vec<CallerIdentity>>,
    inserts: AtomicUsize,
    failure: Option<String>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that rejects every write
    pub fn failing(reason: &str) -> Self {
        Self {
            failure: Some(reason.to_string()),
            ..Self::default()
        }
    }

    /// Number of insert attempts, including rejected ones
    pub fn insert_count(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    pub fn records(&self) -> Vec<NotificationRecord> {
        self.records.lock().expect("store lock poisoned").clone()
    }

    /// Identities forwarded with each insert
    pub fn identities(&self) -> Vec<CallerIdentity> {
        self.identities.lock().expect("store lock poisoned").clone()
    }
}

#[async_trait]
impl NotificationStore for InMemoryStore {
    async fn insert(
        &self,
        identity: &CallerIdentity,
        notification: NewNotification,
    ) -> Result<NotificationRecord, StoreError> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        self.identities
            .lock()
            .expect("store lock poisoned")
            .push(identity.clone());

        if let Some(ref reason) = self.failure {
            return Err(StoreError::Rejected(reason.clone()));
        }

        let record = NotificationRecord {
            id: Uuid::new_v4(),
            recipient_user_id: notification.recipient_user_id,
            notification_type: notification.notification_type,
            title: notification.title,
            message: notification.message,
            data: sqlx::types::Json(notification.data),
            baby_profile_id: notification.baby_profile_id,
            is_read: false,
            created_at: notification.created_at,
        };

        self.records
            .lock()
            .expect("store lock poisoned")
            .push(record.clone());

        Ok(record)
    }

    async fn find_recent(
        &self,
        _identity: &CallerIdentity,
        recipient_user_id: &str,
        notification_type: &str,
        baby_profile_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Option<NotificationRecord>, StoreError> {
        let records = self.records.lock().expect("store lock poisoned");

        Ok(records
            .iter()
            .filter(|r| {
                r.recipient_user_id == recipient_user_id
                    && r.notification_type == notification_type
                    && r.baby_profile_id.as_deref() == Some(baby_profile_id)
                    && r.created_at >= since
            })
            .max_by_key(|r| r.created_at)
            .cloned())
    }
}

// =============================================================================
// Provider
// =============================================================================

/// How the recording provider answers
#[derive(Clone)]
pub enum ProviderBehavior {
    Accept { id: &'static str, recipients: u64 },
    Fail(ProviderError),
    /// Sleeps before accepting, to exercise the dispatcher's timeout
    Hang(Duration),
}

/// Push provider that records every payload it is asked to send
pub struct RecordingProvider {
    behavior: ProviderBehavior,
    calls: AtomicUsize,
    payloads: Mutex<Vec<PushPayload>>,
}

impl RecordingProvider {
    pub fn new(behavior: ProviderBehavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
            payloads: Mutex::new(Vec::new()),
        }
    }

    pub fn accepting(id: &'static str, recipients: u64) -> Self {
        Self::new(ProviderBehavior::Accept { id, recipients })
    }

    pub fn failing(error: ProviderError) -> Self {
        Self::new(ProviderBehavior::Fail(error))
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn payloads(&self) -> Vec<PushPayload> {
        self.payloads.lock().expect("provider lock poisoned").clone()
    }
}

#[async_trait]
impl PushProvider for RecordingProvider {
    async fn send(&self, payload: &PushPayload) -> Result<PushReceipt, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.payloads
            .lock()
            .expect("provider lock poisoned")
            .push(payload.clone());

        match self.behavior {
            ProviderBehavior::Accept { id, recipients } => Ok(PushReceipt {
                id: Some(id.to_string()),
                recipients,
            }),
            ProviderBehavior::Fail(ref error) => Err(error.clone()),
            ProviderBehavior::Hang(delay) => {
                tokio::time::sleep(delay).await;
                Ok(PushReceipt {
                    id: Some("late".to_string()),
                    recipients: 1,
                })
            }
        }
    }
}
