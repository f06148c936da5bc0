use std::{str::FromStr, sync::Arc, time::Duration};

use async_trait::async_trait;
use log::info;
#[cfg(test)]
use mockall::automock;

mod memory;
mod redis_store;

pub use memory::MemoryStore;
pub use redis_store::RedisStore;

use crate::{config::StoreConfig, errors::StoreError};

pub type StoreResult<T> = Result<T, StoreError>;

/// Redis database holding short code -> URL mappings
pub const URL_MAPPINGS_DB: u8 = 0;
/// Redis database holding rate-limit entries and analytics counters
pub const COUNTERS_DB: u8 = 1;

/// Single round-trip key-value operations the services rely on.
///
/// Semantics follow Redis: `incr`/`decr` create a missing key at 0 before
/// applying the delta and keep any existing expiry, and `ttl` yields `None`
/// both for missing keys and for keys without an expiry.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Stores `value`, replacing any previous value and expiry
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> StoreResult<()>;

    async fn incr(&self, key: &str) -> StoreResult<i64>;

    async fn decr(&self, key: &str) -> StoreResult<i64>;

    /// Returns false when the key does not exist
    async fn expire(&self, key: &str, ttl: Duration) -> StoreResult<bool>;

    async fn ttl(&self, key: &str) -> StoreResult<Option<Duration>>;

    async fn ping(&self) -> StoreResult<()>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StoreBackend {
    Redis,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "redis" => Ok(StoreBackend::Redis),
            "memory" | "mem" => Ok(StoreBackend::Memory),
            _ => Err(format!(
                "Invalid store backend: {}. Must be one of: redis, memory",
                s
            )),
        }
    }
}

/// Handles to the two logical keyspaces
#[derive(Clone)]
pub struct Stores {
    pub mappings: Arc<dyn KeyValueStore>,
    pub counters: Arc<dyn KeyValueStore>,
}

impl Stores {
    /// Builds both keyspaces for the configured backend and checks they answer
    pub async fn connect(config: &StoreConfig) -> StoreResult<Self> {
        let stores = match config.backend {
            StoreBackend::Redis => {
                info!("Using redis store at {}", config.addr);
                let password = config.password.as_deref();
                Stores {
                    mappings: Arc::new(RedisStore::new(&config.addr, password, URL_MAPPINGS_DB)?),
                    counters: Arc::new(RedisStore::new(&config.addr, password, COUNTERS_DB)?),
                }
            }
            StoreBackend::Memory => {
                info!("Using in-memory store, data will not survive a restart");
                Stores::in_memory()
            }
        };

        stores.mappings.ping().await?;
        stores.counters.ping().await?;

        Ok(stores)
    }

    pub fn in_memory() -> Self {
        Stores {
            mappings: Arc::new(MemoryStore::new()),
            counters: Arc::new(MemoryStore::new()),
        }
    }

    /// True when both keyspaces answer a ping
    pub async fn is_healthy(&self) -> bool {
        self.mappings.ping().await.is_ok() && self.counters.ping().await.is_ok()
    }
}
