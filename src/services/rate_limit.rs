use std::{sync::Arc, time::Duration};

use log::{debug, warn};

use crate::config::RateLimitConfig;
use crate::errors::{ServiceError, ERROR_RATE_LIMIT_EXCEEDED};
use crate::models::RateLimitInfo;
use crate::store::KeyValueStore;

type Result<T> = std::result::Result<T, ServiceError>;

/// Per-client request quota over a fixed window.
///
/// `check_rate_limit` and `decrement_rate_limit` are separate round trips:
/// concurrent requests from one client may all pass the check before any of
/// them decrements, so enforcement is approximate.
pub struct RateLimitService {
    counters: Arc<dyn KeyValueStore>,
    quota: i64,
    window: Duration,
}

impl RateLimitService {
    pub fn new(counters: Arc<dyn KeyValueStore>, config: &RateLimitConfig) -> Self {
        Self {
            counters,
            quota: config.quota,
            window: config.window,
        }
    }

    /// Fails with `RateLimitExceeded` once the client has no requests left.
    /// The first request of a window creates the entry at the full quota.
    pub async fn check_rate_limit(&self, client_id: &str) -> Result<()> {
        match self.counters.get(client_id).await? {
            None => {
                debug!("New rate limit window for {}", client_id);
                self.counters
                    .set(client_id, &self.quota.to_string(), Some(self.window))
                    .await?;
                Ok(())
            }
            Some(value) => {
                if parse_counter(client_id, &value)? <= 0 {
                    let reset = self.reset_time(client_id).await.unwrap_or_default();
                    debug!("Rate limit exhausted for {}, resets in {}m", client_id, reset);
                    return Err(ServiceError::RateLimitExceeded(format!(
                        "{}, try again in {} minutes",
                        ERROR_RATE_LIMIT_EXCEEDED, reset
                    )));
                }
                Ok(())
            }
        }
    }

    /// Counts one request against the client and reports what is left.
    ///
    /// A failed TTL lookup does not fail the call; the reset is reported as 0.
    pub async fn decrement_rate_limit(&self, client_id: &str) -> Result<RateLimitInfo> {
        self.counters.decr(client_id).await?;

        let value = self.counters.get(client_id).await?.ok_or_else(|| {
            ServiceError::NotFound(format!("no rate limit entry for {}", client_id))
        })?;
        let remaining = parse_counter(client_id, &value)?;

        let reset_minutes = match self.counters.ttl(client_id).await {
            Ok(Some(ttl)) => to_minutes(ttl),
            Ok(None) => self.restore_window(client_id).await,
            Err(e) => {
                warn!("Could not read rate limit TTL for {}: {}", client_id, e);
                0
            }
        };

        Ok(RateLimitInfo {
            remaining,
            reset_minutes,
        })
    }

    /// Minutes until the client's window resets
    pub async fn reset_time(&self, client_id: &str) -> Result<u64> {
        Ok(self
            .counters
            .ttl(client_id)
            .await?
            .map(to_minutes)
            .unwrap_or_default())
    }

    // The entry expired between check and decrement, so DECR recreated it
    // without an expiry. Without a TTL the client would stay blocked forever.
    async fn restore_window(&self, client_id: &str) -> u64 {
        match self.counters.expire(client_id, self.window).await {
            Ok(true) => {
                debug!("Restored rate limit window for {}", client_id);
                to_minutes(self.window)
            }
            Ok(false) => 0,
            Err(e) => {
                warn!("Could not restore rate limit window for {}: {}", client_id, e);
                0
            }
        }
    }
}

fn to_minutes(ttl: Duration) -> u64 {
    ttl.as_secs() / 60
}

fn parse_counter(key: &str, value: &str) -> Result<i64> {
    value.trim().parse::<i64>().map_err(|_| {
        ServiceError::Parse(format!("counter '{}' holds non-numeric value '{}'", key, value))
    })
}
