use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Error for key-value cache operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CacheError {
    /// The key does not exist (or has expired). Expected, not a fault.
    #[error("Cache key not found")]
    KeyNotFound,

    #[error("Cache connection failed: {0}")]
    Connection(String),

    #[error("Cache value is invalid: {0}")]
    InvalidValue(String),
}

/// Shared ephemeral key-value store.
///
/// Values are byte strings with a per-key time-to-live.
#[async_trait]
pub trait Cache: Send + Sync + 'static {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    /// * `KeyNotFound` - Key is absent or expired
    /// * `Connection` - Cache could not be reached
    async fn get(&self, key: &str) -> Result<Vec<u8>, CacheError>;

    /// Store `value` under `key`, expiring after `ttl`.
    ///
    /// # Errors
    /// * `Connection` - Cache could not be reached
    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), CacheError>;

    /// Remove keys. Absent keys are ignored.
    ///
    /// # Errors
    /// * `Connection` - Cache could not be reached
    async fn delete(&self, keys: &[String]) -> Result<(), CacheError>;

    /// Remove every key.
    ///
    /// # Errors
    /// * `Connection` - Cache could not be reached
    async fn flush_all(&self) -> Result<(), CacheError>;

    /// Increment the decimal counter under `key` and reset its expiry to `ttl`.
    ///
    /// Returns the new count. The default implementation is a plain
    /// read-modify-write and loses updates under concurrent writers; adapters
    /// backed by a server with atomic counters must override it.
    ///
    /// # Errors
    /// * `Connection` - The write could not be performed
    async fn increment(&self, key: &str, ttl: Duration) -> Result<i64, CacheError> {
        // Unreadable or missing values start a fresh counter.
        let current = match self.get(key).await {
            Ok(bytes) => parse_counter(&bytes).unwrap_or(0),
            Err(_) => 0,
        };
        let next = current + 1;

        self.set(key, next.to_string().as_bytes(), ttl).await?;

        Ok(next)
    }
}

/// Parse a decimal counter value as written by [`Cache::increment`].
pub fn parse_counter(bytes: &[u8]) -> Result<i64, CacheError> {
    std::str::from_utf8(bytes)
        .map_err(|e| CacheError::InvalidValue(e.to_string()))?
        .trim()
        .parse::<i64>()
        .map_err(|e| CacheError::InvalidValue(e.to_string()))
}
