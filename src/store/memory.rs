use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex, MutexGuard,
    },
    time::Duration,
};

use async_trait::async_trait;
use log::debug;
use tokio::time::Instant;

use super::{KeyValueStore, StoreResult};
use crate::errors::StoreError;

/// Writes between two sweeps of expired entries
const PURGE_INTERVAL: usize = 256;

type Entries = HashMap<String, Entry>;

struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|deadline| deadline <= now)
    }
}

/// Fails like redis does on an expiry past the clock's range
fn deadline(now: Instant, ttl: Duration) -> StoreResult<Instant> {
    now.checked_add(ttl)
        .ok_or_else(|| StoreError::Command("invalid expire time".to_string()))
}

/// Process-local store with the same counter and expiry rules as redis
///
/// Keys nobody reads again are dropped by a sweep that runs every
/// `PURGE_INTERVAL` writes.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<Entries>,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Entries>> {
        self.entries
            .lock()
            .map_err(|_| StoreError::Connection("memory store lock poisoned".to_string()))
    }

    /// Counts a write and sweeps expired entries when one is due
    fn record_write(&self, entries: &mut Entries, now: Instant) {
        let writes = self.writes.fetch_add(1, Ordering::Relaxed) + 1;
        if writes % PURGE_INTERVAL == 0 {
            let before = entries.len();
            entries.retain(|_, entry| !entry.is_expired(now));
            debug!("Purged {} expired keys", before - entries.len());
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or_default()
    }

    /// Adds `delta` to the integer at `key`, creating it at 0 first
    fn add(&self, key: &str, delta: i64) -> StoreResult<i64> {
        let now = Instant::now();
        let mut entries = self.lock()?;

        let (current, expires_at) = match entries.get(key) {
            Some(entry) if !entry.is_expired(now) => {
                let current = entry.value.parse::<i64>().map_err(|_| {
                    StoreError::Command("value is not an integer or out of range".to_string())
                })?;
                (current, entry.expires_at)
            }
            _ => (0, None),
        };

        let value = current
            .checked_add(delta)
            .ok_or_else(|| StoreError::Command("increment or decrement would overflow".to_string()))?;

        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at,
            },
        );
        self.record_write(&mut entries, now);
        Ok(value)
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let now = Instant::now();
        let mut entries = self.lock()?;

        let expired = match entries.get(key) {
            Some(entry) if !entry.is_expired(now) => return Ok(Some(entry.value.clone())),
            Some(_) => true,
            None => false,
        };
        if expired {
            entries.remove(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> StoreResult<()> {
        let now = Instant::now();
        let expires_at = ttl.map(|ttl| deadline(now, ttl)).transpose()?;

        let mut entries = self.lock()?;
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at,
            },
        );
        self.record_write(&mut entries, now);
        Ok(())
    }

    async fn incr(&self, key: &str) -> StoreResult<i64> {
        self.add(key, 1)
    }

    async fn decr(&self, key: &str) -> StoreResult<i64> {
        self.add(key, -1)
    }

    async fn expire(&self, key: &str, ttl: Duration) -> StoreResult<bool> {
        let now = Instant::now();
        let mut entries = self.lock()?;

        match entries.get_mut(key) {
            Some(entry) if !entry.is_expired(now) => {
                entry.expires_at = Some(deadline(now, ttl)?);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn ttl(&self, key: &str) -> StoreResult<Option<Duration>> {
        let now = Instant::now();
        let entries = self.lock()?;

        Ok(entries
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .and_then(|entry| entry.expires_at)
            .map(|deadline| deadline - now))
    }

    async fn ping(&self) -> StoreResult<()> {
        self.lock().map(|_| ())
    }
}
