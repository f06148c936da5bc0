use url::{Host, Url};
use validator::ValidationError;

/// Longest custom short code accepted from clients
const MAX_SHORT_CODE_LENGTH: usize = 32;

/// Validates that a URL string is well formed: an http(s) scheme and a real host.
///
/// A missing scheme is allowed (`example.com/page`), it is checked as if it
/// were `http://`.
pub fn validate_url(url_str: &str) -> Result<(), ValidationError> {
    if url_str.trim().is_empty() || url_str.chars().any(char::is_whitespace) {
        return Err(ValidationError::new("Invalid URL format"));
    }

    let parsed = if url_str.contains("://") {
        Url::parse(url_str)
    } else {
        Url::parse(&format!("http://{}", url_str))
    };

    match parsed {
        Ok(url) => {
            // Only accept HTTP and HTTPS URLs
            if url.scheme() != "http" && url.scheme() != "https" {
                return Err(ValidationError::new("URL scheme must be http or https"));
            }

            match url.host() {
                Some(host) if is_valid_host(&host) => Ok(()),
                _ => Err(ValidationError::new("URL must have a valid host")),
            }
        }
        Err(_) => Err(ValidationError::new("Invalid URL format")),
    }
}

fn is_valid_host(host: &Host<&str>) -> bool {
    match *host {
        Host::Ipv4(_) | Host::Ipv6(_) => true,
        Host::Domain("localhost") => true,
        Host::Domain(domain) => {
            let labels: Vec<&str> = domain.trim_end_matches('.').split('.').collect();
            let tld_ok = labels.last().is_some_and(|tld| {
                tld.starts_with("xn--") || (tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()))
            });

            labels.len() >= 2
                && tld_ok
                && labels.iter().all(|label| {
                    !label.is_empty()
                        && label.len() <= 63
                        && !label.starts_with('-')
                        && !label.ends_with('-')
                        && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
                })
        }
    }
}

/// Validates a caller supplied short code. Empty means "generate one".
pub fn validate_short_code(code: &str) -> Result<(), ValidationError> {
    if code.len() > MAX_SHORT_CODE_LENGTH {
        let mut err = ValidationError::new("short_code_length");
        err.message = Some("Custom short code must be at most 32 characters".into());
        return Err(err);
    }

    // Ensure it only contains URL-safe characters
    if !code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        let mut err = ValidationError::new("short_code_charset");
        err.message = Some(
            "Custom short code can only contain alphanumeric characters, hyphens, and underscores"
                .into(),
        );
        return Err(err);
    }

    Ok(())
}

/// Prefixes `http://` unless the URL already carries an http or https scheme
pub fn enforce_http(url: &str) -> String {
    let lower = url.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        url.to_string()
    } else {
        format!("http://{}", url)
    }
}

/// True when `url` points at the service itself, which would make the short
/// link redirect to itself.
///
/// Both sides lose a leading `http://` or `https://` and everything from the
/// first `/`, `?` or `#`. `www.` is kept, so `www.example.com` and
/// `example.com` stay distinct hosts.
pub fn is_own_domain(url: &str, domain: &str) -> bool {
    if domain.is_empty() {
        return false;
    }

    if url == domain {
        return true;
    }

    normalize_host(url).eq_ignore_ascii_case(normalize_host(domain))
}

fn normalize_host(url: &str) -> &str {
    let rest = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"))
        .unwrap_or(url);

    match rest.find(['/', '?', '#']) {
        Some(idx) => &rest[..idx],
        None => rest,
    }
}
