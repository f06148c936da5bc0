mod short_url;

pub use short_url::{enforce_http, is_own_domain, validate_short_code, validate_url};
