use thiserror::Error;

use super::StoreError;

/// Failures of the shortener, rate limiter and analytics services
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Malformed URL, or a URL pointing back at this service
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The requested (or generated) short code already has a mapping
    #[error("Short code in use: {0}")]
    ShortCodeInUse(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// The client has no requests left in the current window
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    #[error("Database error: {0}")]
    Database(#[from] StoreError),

    /// A stored counter does not hold an integer
    #[error("Parse error: {0}")]
    Parse(String),
}
