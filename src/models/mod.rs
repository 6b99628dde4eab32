pub mod notification;
pub mod push;

pub use notification::{
    DataMap, DispatchOutcome, DispatchResponse, NewNotification, NotificationRecord,
    NotificationRequest, PUSH_NOT_CONFIGURED_MESSAGE,
};
pub use push::{LocalizedText, OneSignalRequest, PlatformHints, PushPayload, PushReceipt};
