use std::io::Error as IoError;

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use log::error;
use serde_json::json;
use thiserror::Error;

pub mod config;
pub mod service;
pub mod store;

pub use config::ConfigError;
pub use service::ServiceError;
pub use store::StoreError;

pub const ERROR_CANNOT_PARSE_JSON: &str = "cannot parse JSON";
pub const ERROR_RATE_LIMIT_EXCEEDED: &str = "Rate limit exceeded";
pub const ERROR_INVALID_URL: &str = "Invalid URL";
pub const ERROR_INVALID_EXPIRY: &str = "Expiry must be at most 8760 hours";
pub const ERROR_SHORT_CODE_IN_USE: &str = "URL short already in use";
pub const ERROR_UPDATE_RATE_LIMIT_FAILED: &str = "Failed to update rate limit";
pub const ERROR_SHORT_URL_NOT_FOUND: &str = "Short Url not found on database";
pub const ERROR_CANNOT_CONNECT_TO_DB: &str = "Cannot connect to the DB";

#[derive(Debug, Error)]
pub enum AppError {
    // Service-level domain errors
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Conflict error: {0}")]
    Conflict(String),
    #[error("Not found error: {0}")]
    NotFound(String),
    #[error("Rate limit error: {0}")]
    RateLimited(String),
    #[error("Internal error: {0}")]
    Internal(String),
    // Infrastructure/system errors
    #[error("Server error: {0}")]
    Server(#[from] IoError),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Logger error: {0}")]
    Logger(String),
    #[error("Store error: {0}")]
    Store(String),
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        AppError::Config(e.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Store(e.to_string())
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidUrl(msg) => AppError::Validation(msg),
            ServiceError::ShortCodeInUse(msg) => AppError::Conflict(msg),
            ServiceError::NotFound(msg) => AppError::NotFound(msg),
            ServiceError::RateLimitExceeded(msg) => AppError::RateLimited(msg),
            ServiceError::Database(e) => {
                // Store details stay in the log
                error!("Store failure: {}", e);
                AppError::Internal(ERROR_CANNOT_CONNECT_TO_DB.to_string())
            }
            ServiceError::Parse(msg) => AppError::Internal(msg),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        // Flatten field errors into a single string
        let message = errors
            .field_errors()
            .iter()
            .map(|(field, errs)| {
                let reasons = errs
                    .iter()
                    .map(|e| e.message.clone().unwrap_or_else(|| e.code.clone()))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{}: {}", field, reasons)
            })
            .collect::<Vec<_>>()
            .join("; ");
        AppError::Validation(message)
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::Internal(_)
            | AppError::Server(_)
            | AppError::Config(_)
            | AppError::Logger(_)
            | AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error_string = self.to_string();
        let (error_type, message) = error_string
            .split_once(':')
            .map(|(t, m)| (t.trim(), m.trim()))
            .unwrap_or(("Error", "An error occurred"));

        let error_message = if message.is_empty() {
            "An error occurred"
        } else {
            message
        };

        let code = self.status_code().as_u16();
        HttpResponse::build(self.status_code()).json(json!({
            "type": error_type.to_uppercase(),
            "message": error_message,
            "status_code": code,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_errors_map_to_status_codes() {
        let cases = [
            (ServiceError::InvalidUrl("x".into()), StatusCode::BAD_REQUEST),
            (ServiceError::ShortCodeInUse("x".into()), StatusCode::CONFLICT),
            (ServiceError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (
                ServiceError::RateLimitExceeded("x".into()),
                StatusCode::TOO_MANY_REQUESTS,
            ),
            (ServiceError::Parse("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (
                ServiceError::Database(StoreError::Connection("refused".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(err).status_code(), status);
        }
    }

    #[test]
    fn test_database_error_hides_store_details() {
        let err = AppError::from(ServiceError::Database(StoreError::Connection(
            "redis://secret@host refused".into(),
        )));
        assert_eq!(
            err.to_string(),
            format!("Internal error: {}", ERROR_CANNOT_CONNECT_TO_DB)
        );
    }
}
