use std::sync::Arc;

use crate::errors::ServiceError;
use crate::store::KeyValueStore;

type Result<T> = std::result::Result<T, ServiceError>;

/// Key of the global redirect counter
pub const REDIRECT_COUNTER_KEY: &str = "counter";

fn access_key(short_code: &str) -> String {
    format!("access:{}", short_code)
}

/// Monotonic redirect counters
pub struct AnalyticsService {
    counters: Arc<dyn KeyValueStore>,
}

impl AnalyticsService {
    pub fn new(counters: Arc<dyn KeyValueStore>) -> Self {
        Self { counters }
    }

    pub async fn track_redirect_counter(&self) -> Result<()> {
        self.counters.incr(REDIRECT_COUNTER_KEY).await?;
        Ok(())
    }

    pub async fn track_short_url_access(&self, short_code: &str) -> Result<()> {
        self.counters.incr(&access_key(short_code)).await?;
        Ok(())
    }

    pub async fn get_redirect_count(&self) -> Result<i64> {
        self.read_counter(REDIRECT_COUNTER_KEY).await
    }

    pub async fn get_short_url_access_count(&self, short_code: &str) -> Result<i64> {
        self.read_counter(&access_key(short_code)).await
    }

    async fn read_counter(&self, key: &str) -> Result<i64> {
        let value = self
            .counters
            .get(key)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("no analytics recorded for '{}'", key)))?;

        value.trim().parse::<i64>().map_err(|_| {
            ServiceError::Parse(format!("counter '{}' holds non-numeric value '{}'", key, value))
        })
    }
}
