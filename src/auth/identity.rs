use actix_web::{dev::Payload, FromRequest, HttpRequest};
use std::future::{ready, Ready};

use crate::error::AppError;

/// Header set by the upstream identity layer once it has verified the caller
pub const CALLER_ID_HEADER: &str = "X-Caller-Id";

/// Verified caller identity attached to a request upstream.
///
/// This service does not authenticate; it only forwards the identity to the
/// store, whose row-level policies decide what the caller may write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallerIdentity {
    subject: Option<String>,
}

impl CallerIdentity {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: Some(subject.into()),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }
}

/// Extractor for the caller identity
///
/// Usage in handlers:
/// ```ignore
/// async fn my_handler(identity: CallerIdentity) -> HttpResponse {
///     // identity.subject() is None for anonymous callers
/// }
/// ```
impl FromRequest for CallerIdentity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let subject = req
            .headers()
            .get(CALLER_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        ready(Ok(CallerIdentity { subject }))
    }
}
