pub mod dedup;
pub mod dispatch;
pub mod push;
pub mod store;
pub mod validation;

pub use dedup::{CorrelationDedup, DuplicateGuard};
pub use dispatch::{build_push_payload, DispatchError, NotificationDispatcher};
pub use push::{OneSignalClient, ProviderError, PushProvider};
pub use store::{NotificationStore, PgNotificationStore, StoreError};
pub use validation::{validate, ValidationError};
