//! Notification store: durable, append-only notification records.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};

use crate::auth::CallerIdentity;
use crate::models::{NewNotification, NotificationRecord};

const RECORD_COLUMNS: &str = "id, recipient_user_id, notification_type, title, message, data, \
                              baby_profile_id, is_read, created_at";

/// Store failures. All of them are fatal to a dispatch.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Authorization or constraint failure reported by the database
    #[error("write rejected: {0}")]
    Rejected(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = e {
            // 42501 = insufficient_privilege, raised by row-level security
            let rls_violation = db_err.code().as_deref() == Some("42501");
            if rls_violation
                || db_err.is_check_violation()
                || db_err.is_unique_violation()
                || db_err.is_foreign_key_violation()
            {
                return StoreError::Rejected(db_err.message().to_string());
            }
        }

        if matches!(
            e,
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_)
        ) {
            return StoreError::Unavailable(e.to_string());
        }

        StoreError::Database(e)
    }
}

/// Persistence seam for the dispatch pipeline.
///
/// The store, not the caller, enforces who may write on behalf of whom; the
/// caller identity is forwarded for that purpose.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Inserts a record and returns it with its assigned identifier
    async fn insert(
        &self,
        identity: &CallerIdentity,
        notification: NewNotification,
    ) -> Result<NotificationRecord, StoreError>;

    /// Finds the newest record for the same recipient, type and correlation id
    /// created at or after `since`
    async fn find_recent(
        &self,
        identity: &CallerIdentity,
        recipient_user_id: &str,
        notification_type: &str,
        baby_profile_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Option<NotificationRecord>, StoreError>;
}

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgNotificationStore {
    pool: PgPool,
}

impl PgNotificationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a transaction scoped to the caller for row-level security
    async fn begin_as(
        &self,
        identity: &CallerIdentity,
    ) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT set_config('app.caller_id', $1, true)")
            .bind(identity.subject().unwrap_or_default())
            .execute(&mut *tx)
            .await?;

        Ok(tx)
    }
}

#[async_trait]
impl NotificationStore for PgNotificationStore {
    async fn insert(
        &self,
        identity: &CallerIdentity,
        notification: NewNotification,
    ) -> Result<NotificationRecord, StoreError> {
        let mut tx = self.begin_as(identity).await?;

        let record = sqlx::query_as::<_, NotificationRecord>(&format!(
            r#"
            INSERT INTO notifications (
                recipient_user_id, notification_type, title, message,
                data, baby_profile_id, is_read, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, FALSE, $7)
            RETURNING {RECORD_COLUMNS}
            "#
        ))
        .bind(&notification.recipient_user_id)
        .bind(&notification.notification_type)
        .bind(&notification.title)
        .bind(&notification.message)
        .bind(sqlx::types::Json(&notification.data))
        .bind(&notification.baby_profile_id)
        .bind(notification.created_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(record)
    }

    async fn find_recent(
        &self,
        identity: &CallerIdentity,
        recipient_user_id: &str,
        notification_type: &str,
        baby_profile_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Option<NotificationRecord>, StoreError> {
        let mut tx = self.begin_as(identity).await?;

        let record = sqlx::query_as::<_, NotificationRecord>(&format!(
            r#"
            SELECT {RECORD_COLUMNS}
            FROM notifications
            WHERE recipient_user_id = $1
              AND notification_type = $2
              AND baby_profile_id = $3
              AND created_at >= $4
            ORDER BY created_at DESC
            LIMIT 1
            "#
        ))
        .bind(recipient_user_id)
        .bind(notification_type)
        .bind(baby_profile_id)
        .bind(since)
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(record)
    }
}
