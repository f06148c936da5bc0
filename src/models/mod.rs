mod short_url;

pub use short_url::{RateLimitInfo, MAX_EXPIRY_HOURS, ShortenRequest, ShortenResponse};
