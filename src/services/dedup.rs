//! Optional duplicate-dispatch guard.
//!
//! The pipeline itself is not idempotent: every accepted call creates a record.
//! A `DuplicateGuard` installed on the dispatcher is consulted before
//! persistence and can reject a request that repeats an earlier one.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::auth::CallerIdentity;
use crate::models::{NotificationRecord, NotificationRequest};
use crate::services::store::{NotificationStore, StoreError};

#[async_trait]
pub trait DuplicateGuard: Send + Sync {
    /// Returns the earlier record this request duplicates, if any
    async fn find_duplicate(
        &self,
        identity: &CallerIdentity,
        request: &NotificationRequest,
    ) -> Result<Option<NotificationRecord>, StoreError>;
}

/// Treats a request as a duplicate when a record with the same recipient,
/// type and correlation id was created within the window. Requests without a
/// correlation id are never duplicates.
pub struct CorrelationDedup {
    store: Arc<dyn NotificationStore>,
    window: Duration,
}

impl CorrelationDedup {
    pub fn new(store: Arc<dyn NotificationStore>, window: Duration) -> Self {
        Self { store, window }
    }

    fn window_start(&self) -> DateTime<Utc> {
        chrono::Duration::from_std(self.window)
            .ok()
            .and_then(|window| Utc::now().checked_sub_signed(window))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

#[async_trait]
impl DuplicateGuard for CorrelationDedup {
    async fn find_duplicate(
        &self,
        identity: &CallerIdentity,
        request: &NotificationRequest,
    ) -> Result<Option<NotificationRecord>, StoreError> {
        let Some(ref correlation_id) = request.baby_profile_id else {
            return Ok(None);
        };

        self.store
            .find_recent(
                identity,
                &request.recipient_user_id,
                &request.notification_type,
                correlation_id,
                self.window_start(),
            )
            .await
    }
}
