//! Notification dispatch endpoint.
//!
//! - POST /notification-trigger - Record a notification and push it
//! - OPTIONS /notification-trigger - CORS pre-flight
//!
//! Both are also mounted under /functions/v1 for mobile clients that still
//! call the serverless function path.

use actix_web::{http::Method, middleware::DefaultHeaders, web, HttpResponse};
use serde_json::Value;

use crate::auth::CallerIdentity;
use crate::error::{AppError, AppResult};
use crate::models::DispatchResponse;
use crate::services::NotificationDispatcher;

/// Permissive CORS headers sent with every dispatch response
pub const CORS_HEADERS: [(&str, &str); 3] = [
    ("Access-Control-Allow-Origin", "*"),
    (
        "Access-Control-Allow-Headers",
        "authorization, x-client-info, apikey, content-type",
    ),
    ("Access-Control-Allow-Methods", "POST, OPTIONS"),
];

/// POST /notification-trigger
pub async fn dispatch_notification(
    dispatcher: web::Data<NotificationDispatcher>,
    identity: CallerIdentity,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let raw: Value = serde_json::from_slice(&body)
        .map_err(|e| AppError::Internal(format!("Malformed JSON body: {}", e)))?;

    let outcome = dispatcher.handle(&raw, &identity).await?;

    Ok(HttpResponse::Ok().json(DispatchResponse::from(outcome)))
}

/// OPTIONS /notification-trigger
pub async fn preflight() -> HttpResponse {
    HttpResponse::Ok().finish()
}

fn cors_headers() -> DefaultHeaders {
    CORS_HEADERS
        .iter()
        .fold(DefaultHeaders::new(), |headers, &header| headers.add(header))
}

/// Configure notification routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    for path in ["/notification-trigger", "/functions/v1/notification-trigger"] {
        cfg.service(
            web::resource(path)
                .route(web::post().to(dispatch_notification))
                .route(web::method(Method::OPTIONS).to(preflight))
                .wrap(cors_headers()),
        );
    }
}
