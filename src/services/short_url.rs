// src/services/short_url.rs - Shortening and resolution
use std::{sync::Arc, time::Duration};

use log::{debug, info};

use crate::config::ShortenerConfig;
use crate::errors::{
    ServiceError, ERROR_INVALID_EXPIRY, ERROR_INVALID_URL, ERROR_SHORT_CODE_IN_USE,
    ERROR_SHORT_URL_NOT_FOUND,
};
use crate::models::{ShortenRequest, ShortenResponse, MAX_EXPIRY_HOURS};
use crate::store::KeyValueStore;
use crate::utils::id_generator;
use crate::validations::{enforce_http, is_own_domain, validate_url};

type Result<T> = std::result::Result<T, ServiceError>;

const SECONDS_PER_HOUR: u64 = 3600;

pub struct ShortUrlService {
    mappings: Arc<dyn KeyValueStore>,
    domain: String,
    default_expiry_hours: u64,
}

impl ShortUrlService {
    pub fn new(mappings: Arc<dyn KeyValueStore>, domain: &str, config: &ShortenerConfig) -> Self {
        Self {
            mappings,
            domain: domain.to_string(),
            default_expiry_hours: config.default_expiry_hours,
        }
    }

    /// Validates the URL, picks a free short code and stores the mapping.
    ///
    /// The availability check and the save are separate round trips, so two
    /// concurrent requests for the same code can both succeed; the later
    /// write wins. Rate-limit fields in the response are left at 0.
    pub async fn shorten_url(&self, req: ShortenRequest) -> Result<ShortenResponse> {
        if validate_url(&req.url).is_err() {
            return Err(ServiceError::InvalidUrl(ERROR_INVALID_URL.to_string()));
        }

        if is_own_domain(&req.url, &self.domain) {
            debug!("Refusing to shorten the service domain: {}", req.url);
            return Err(ServiceError::InvalidUrl(ERROR_INVALID_URL.to_string()));
        }

        let url = enforce_http(&req.url);

        let short_code = match req.short {
            Some(code) if !code.is_empty() => code,
            _ => id_generator::generate_short_code(),
        };

        if self.mappings.get(&short_code).await?.is_some() {
            return Err(ServiceError::ShortCodeInUse(
                ERROR_SHORT_CODE_IN_USE.to_string(),
            ));
        }

        let expiry = match req.expiry {
            Some(hours) if hours > 0 => hours,
            _ => self.default_expiry_hours,
        };
        let ttl = match expiry.checked_mul(SECONDS_PER_HOUR) {
            Some(secs) if expiry <= MAX_EXPIRY_HOURS => Duration::from_secs(secs),
            _ => return Err(ServiceError::InvalidUrl(ERROR_INVALID_EXPIRY.to_string())),
        };

        self.mappings.set(&short_code, &url, Some(ttl)).await?;
        info!("Shortened {} as '{}' for {}h", url, short_code, expiry);

        Ok(ShortenResponse {
            url,
            short: format!("{}/{}", self.domain, short_code),
            expiry,
            rate_limit: 0,
            rate_limit_reset: 0,
        })
    }

    pub async fn get_original_url(&self, short_code: &str) -> Result<String> {
        self.mappings
            .get(short_code)
            .await?
            .ok_or_else(|| ServiceError::NotFound(ERROR_SHORT_URL_NOT_FOUND.to_string()))
    }
}
