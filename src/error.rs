use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;

use crate::services::{DispatchError, StoreError, ValidationError};

/// JSON error response structure
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_fields: Option<Vec<&'static str>>,
}

/// Application errors
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Failed to save notification: {0}")]
    Persistence(#[from] StoreError),

    #[error("{0}")]
    Internal(String),
}

impl From<DispatchError> for AppError {
    fn from(e: DispatchError) -> Self {
        match e {
            DispatchError::Validation(e) => AppError::Validation(e),
            DispatchError::Duplicate { existing_id } => AppError::Conflict(format!(
                "A matching notification was already recorded ({})",
                existing_id
            )),
            DispatchError::Persistence(e) => AppError::Persistence(e),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let response = match self {
            AppError::Validation(ValidationError::MissingFields(fields)) => ErrorResponse {
                error: "Missing required parameters".to_string(),
                message: None,
                missing_fields: Some(fields.clone()),
            },
            AppError::Validation(e) => ErrorResponse {
                error: e.to_string(),
                message: None,
                missing_fields: None,
            },
            AppError::Conflict(message) => ErrorResponse {
                error: "Duplicate notification".to_string(),
                message: Some(message.clone()),
                missing_fields: None,
            },
            AppError::Persistence(_) | AppError::Internal(_) => ErrorResponse {
                error: "Internal server error".to_string(),
                message: Some(self.to_string()),
                missing_fields: None,
            },
        };

        HttpResponse::build(self.status_code()).json(response)
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
