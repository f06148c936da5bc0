use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use redis::{aio::MultiplexedConnection, AsyncCommands, Client};
use url::Url;

use super::{KeyValueStore, StoreResult};
use crate::errors::StoreError;

/// One redis logical database.
///
/// Every operation opens its own connection and drops it when the call
/// returns, on success and on error alike.
pub struct RedisStore {
    client: Client,
    db: u8,
}

impl RedisStore {
    pub fn new(addr: &str, password: Option<&str>, db: u8) -> StoreResult<Self> {
        let url = connection_url(addr, password, db)?;
        let client = Client::open(url.as_str())?;

        debug!("Redis client created for {} (db {})", addr, db);
        Ok(Self { client, db })
    }

    async fn connection(&self) -> StoreResult<MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| {
                warn!("Failed to connect to redis db {}: {}", self.db, e);
                StoreError::Connection(e.to_string())
            })
    }
}

/// Builds `redis://[:password@]addr/db`
fn connection_url(addr: &str, password: Option<&str>, db: u8) -> StoreResult<Url> {
    let mut url = Url::parse(&format!("redis://{}/{}", addr, db))
        .map_err(|e| StoreError::InvalidConfig(format!("bad address '{}': {}", addr, e)))?;

    if let Some(password) = password.filter(|p| !p.is_empty()) {
        url.set_password(Some(password))
            .map_err(|_| StoreError::InvalidConfig("cannot set redis password".to_string()))?;
    }

    Ok(url)
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let mut conn = self.connection().await?;
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> StoreResult<()> {
        let mut conn = self.connection().await?;
        match ttl {
            // SETEX rejects a zero expiry
            Some(ttl) => {
                let _: () = conn.set_ex(key, value, ttl.as_secs().max(1)).await?;
            }
            None => {
                let _: () = conn.set(key, value).await?;
            }
        }
        Ok(())
    }

    async fn incr(&self, key: &str) -> StoreResult<i64> {
        let mut conn = self.connection().await?;
        let value: i64 = conn.incr(key, 1).await?;
        Ok(value)
    }

    async fn decr(&self, key: &str) -> StoreResult<i64> {
        let mut conn = self.connection().await?;
        let value: i64 = conn.decr(key, 1).await?;
        Ok(value)
    }

    async fn expire(&self, key: &str, ttl: Duration) -> StoreResult<bool> {
        let mut conn = self.connection().await?;
        let applied: bool = conn.expire(key, ttl.as_secs().max(1) as i64).await?;
        Ok(applied)
    }

    async fn ttl(&self, key: &str) -> StoreResult<Option<Duration>> {
        let mut conn = self.connection().await?;
        // -2: no such key, -1: key without expiry
        let seconds: i64 = conn.ttl(key).await?;
        Ok(u64::try_from(seconds).ok().map(Duration::from_secs))
    }

    async fn ping(&self) -> StoreResult<()> {
        let mut conn = self.connection().await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_url_without_password() {
        let url = connection_url("localhost:6379", None, 1).unwrap();
        assert_eq!(url.as_str(), "redis://localhost:6379/1");
    }

    #[test]
    fn test_connection_url_with_password() {
        let url = connection_url("cache.internal:6380", Some("s3cret"), 0).unwrap();
        assert_eq!(url.as_str(), "redis://:s3cret@cache.internal:6380/0");
    }

    #[test]
    fn test_empty_password_is_ignored() {
        let url = connection_url("localhost:6379", Some(""), 0).unwrap();
        assert_eq!(url.password(), None);
    }

    #[test]
    fn test_client_is_created_without_connecting() {
        assert!(RedisStore::new("localhost:6379", None, 0).is_ok());
    }
}
