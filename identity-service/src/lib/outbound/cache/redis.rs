use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use redis::RedisError;
use thiserror::Error;

use crate::config::RedisConfig;
use crate::domain::cache::Cache;
use crate::domain::cache::CacheError;

#[derive(Debug, Error)]
pub enum RedisCacheError {
    #[error("Redis command failed: {0}")]
    CommandFailed(#[from] RedisError),

    #[error("Redis command timed out after {0:?}")]
    TimedOut(Duration),
}

impl From<RedisCacheError> for CacheError {
    fn from(err: RedisCacheError) -> Self {
        match err {
            RedisCacheError::CommandFailed(e) if e.kind() == redis::ErrorKind::TypeError => {
                CacheError::InvalidValue(e.to_string())
            }
            other => CacheError::Connection(other.to_string()),
        }
    }
}

/// Cache adapter over a shared Redis connection.
///
/// `ConnectionManager` reconnects on its own; each command gets its own
/// deadline so a stalled server surfaces as `CacheError::Connection`.
#[derive(Clone)]
pub struct RedisCache {
    manager: ConnectionManager,
    operation_timeout: Duration,
}

impl RedisCache {
    /// Open a managed connection to the configured server.
    ///
    /// # Arguments
    /// * `config` - Redis configuration
    ///
    /// # Errors
    /// Returns error if the URL is invalid or the first connection fails
    pub async fn connect(config: &RedisConfig) -> Result<Self, anyhow::Error> {
        tracing::info!(
            operation_timeout_ms = config.operation_timeout_ms,
            "Connecting to redis"
        );

        let client = redis::Client::open(config.url.as_str())?;
        let manager = ConnectionManager::new(client).await?;

        tracing::info!("Redis connection established");

        Ok(Self {
            manager,
            operation_timeout: config.operation_timeout(),
        })
    }

    async fn run<T, F>(&self, command: F) -> Result<T, RedisCacheError>
    where
        F: Future<Output = Result<T, RedisError>>,
    {
        match tokio::time::timeout(self.operation_timeout, command).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(RedisCacheError::TimedOut(self.operation_timeout)),
        }
    }
}

/// Redis expiries have one-second resolution and reject zero.
fn expiry_seconds(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

#[async_trait]
impl Cache for RedisCache {
    async fn get(&self, key: &str) -> Result<Vec<u8>, CacheError> {
        let mut conn = self.manager.clone();

        let value: Option<Vec<u8>> = self
            .run(conn.get(key))
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Redis GET failed");
                CacheError::from(e)
            })?;

        value.ok_or(CacheError::KeyNotFound)
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.manager.clone();

        self.run(conn.set_ex::<_, _, ()>(key, value, expiry_seconds(ttl)))
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Redis SET failed");
                CacheError::from(e)
            })
    }

    async fn delete(&self, keys: &[String]) -> Result<(), CacheError> {
        if keys.is_empty() {
            return Ok(());
        }

        let mut conn = self.manager.clone();

        self.run(conn.del::<_, ()>(keys))
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, keys = keys.len(), "Redis DEL failed");
                CacheError::from(e)
            })
    }

    async fn flush_all(&self) -> Result<(), CacheError> {
        let mut conn = self.manager.clone();

        self.run::<(), _>(redis::cmd("FLUSHALL").query_async(&mut conn))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Redis FLUSHALL failed");
                CacheError::from(e)
            })
    }

    async fn increment(&self, key: &str, ttl: Duration) -> Result<i64, CacheError> {
        let mut conn = self.manager.clone();

        // INCR and EXPIRE run in one MULTI block so concurrent failures are never lost.
        let mut pipe = redis::pipe();
        pipe.atomic()
            .incr(key, 1)
            .expire(key, expiry_seconds(ttl) as i64)
            .ignore();

        let (count,): (i64,) = self
            .run(pipe.query_async(&mut conn))
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Redis INCR failed");
                CacheError::from(e)
            })?;

        Ok(count)
    }
}
