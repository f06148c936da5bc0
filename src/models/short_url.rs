use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validations::validate_short_code;

/// Longest mapping lifetime a client may ask for, one year in hours
pub const MAX_EXPIRY_HOURS: u64 = 8760;

// DTO for creating a new short URL
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ShortenRequest {
    /// The original, long URL to shorten
    pub url: String,

    /// Optional custom short code; empty or absent means "generate one"
    #[serde(default)]
    #[validate(custom(function = "validate_short_code"))]
    pub short: Option<String>,

    /// Lifetime of the mapping in hours; absent or 0 picks the default
    #[serde(default)]
    #[validate(range(max = 8760))]
    pub expiry: Option<u64>,
}

// DTO for response with the created short URL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortenResponse {
    /// The stored URL, always carrying a scheme
    pub url: String,

    /// Full short URL: configured domain + "/" + code
    pub short: String,

    /// Lifetime of the mapping in hours
    pub expiry: u64,

    /// Requests left for the caller in the current window
    pub rate_limit: i64,

    /// Minutes until the caller's window resets
    pub rate_limit_reset: u64,
}

/// Client quota state after a counted request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RateLimitInfo {
    pub remaining: i64,
    pub reset_minutes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_accepts_minimal_body() {
        let req: ShortenRequest = serde_json::from_str(r#"{"url": "example.com"}"#).unwrap();
        assert_eq!(req.url, "example.com");
        assert!(req.short.is_none());
        assert!(req.expiry.is_none());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_request_rejects_unsafe_short_code() {
        let req: ShortenRequest =
            serde_json::from_str(r#"{"url": "example.com", "short": "a/b", "expiry": 2}"#)
                .unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_request_bounds_expiry() {
        let req: ShortenRequest =
            serde_json::from_str(r#"{"url": "example.com", "expiry": 8760}"#).unwrap();
        assert!(req.validate().is_ok());

        let req = ShortenRequest {
            expiry: Some(MAX_EXPIRY_HOURS + 1),
            ..req
        };
        assert!(req.validate().is_err());

        let req: ShortenRequest =
            serde_json::from_str(r#"{"url": "example.com", "expiry": 18446744073709551615}"#)
                .unwrap();
        assert!(req.validate().is_err());
    }
}
