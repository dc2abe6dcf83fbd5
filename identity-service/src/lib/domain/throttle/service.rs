use std::sync::Arc;
use std::time::Duration;

use sha2::Digest;
use sha2::Sha256;

use crate::config::ThrottleConfig;
use crate::domain::cache::parse_counter;
use crate::domain::cache::Cache;
use crate::domain::cache::CacheError;

/// Failed-login limiter keyed by (login identifier, client origin).
///
/// Every failure pushes the counter's expiry a full window into the future,
/// so attempts are only forgotten after the window passes without failures.
pub struct ThrottleService<C>
where
    C: Cache,
{
    cache: Arc<C>,
    max_attempts: i64,
    window: Duration,
}

impl<C> ThrottleService<C>
where
    C: Cache,
{
    pub fn new(config: &ThrottleConfig, cache: Arc<C>) -> Self {
        Self {
            cache,
            max_attempts: config.max_attempts,
            window: config.window(),
        }
    }

    /// Whether further attempts for this pair must be rejected.
    ///
    /// Missing or unreadable counters do not block.
    ///
    /// # Errors
    /// * `Connection` - Cache could not be reached
    pub async fn blocked(&self, identifier: &str, origin: &str) -> Result<bool, CacheError> {
        let key = throttle_key(identifier, origin);

        let bytes = match self.cache.get(&key).await {
            Ok(bytes) => bytes,
            Err(CacheError::KeyNotFound) => return Ok(false),
            Err(CacheError::InvalidValue(e)) => {
                tracing::warn!(error = %e, "Unreadable throttle counter, not blocking");
                return Ok(false);
            }
            Err(e) => return Err(e),
        };

        match parse_counter(&bytes) {
            Ok(count) => Ok(count >= self.max_attempts),
            Err(e) => {
                tracing::warn!(error = %e, "Unreadable throttle counter, not blocking");
                Ok(false)
            }
        }
    }

    /// Record one failed attempt and return the new count.
    ///
    /// # Errors
    /// * `Connection` - Counter could not be written
    pub async fn incr(&self, identifier: &str, origin: &str) -> Result<i64, CacheError> {
        let count = self
            .cache
            .increment(&throttle_key(identifier, origin), self.window)
            .await?;

        if count >= self.max_attempts {
            tracing::warn!(
                origin = %origin,
                attempts = count,
                "Login throttle threshold reached"
            );
        }

        Ok(count)
    }

    /// Forget failed attempts for this pair. Idempotent.
    ///
    /// # Errors
    /// * `Connection` - Cache could not be reached
    pub async fn clear(&self, identifier: &str, origin: &str) -> Result<(), CacheError> {
        self.cache
            .delete(&[throttle_key(identifier, origin)])
            .await
    }
}

fn throttle_key(identifier: &str, origin: &str) -> String {
    let digest = Sha256::new()
        .chain_update(identifier.as_bytes())
        .chain_update(b"|")
        .chain_update(origin.as_bytes())
        .finalize();

    format!("throttle:{:x}", digest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::mocks::MockTestCache;

    fn config() -> ThrottleConfig {
        ThrottleConfig {
            max_attempts: 5,
            window_minutes: 60,
        }
    }

    #[test]
    fn test_key_is_stable_and_opaque() {
        let key = throttle_key("a@b.com", "1.2.3.4");

        assert_eq!(key, throttle_key("a@b.com", "1.2.3.4"));
        assert_ne!(key, throttle_key("a@b.com", "5.6.7.8"));
        assert_ne!(key, throttle_key("c@d.com", "1.2.3.4"));
        assert!(!key.contains("a@b.com"));
        assert_eq!(key.len(), "throttle:".len() + 64);
    }

    #[tokio::test]
    async fn test_blocked_without_counter() {
        let mut cache = MockTestCache::new();
        cache
            .expect_get()
            .times(1)
            .returning(|_| Err(CacheError::KeyNotFound));

        let service = ThrottleService::new(&config(), Arc::new(cache));

        assert_eq!(service.blocked("a@b.com", "1.2.3.4").await, Ok(false));
    }

    #[tokio::test]
    async fn test_blocked_at_threshold() {
        let mut cache = MockTestCache::new();
        cache
            .expect_get()
            .times(2)
            .returning({
                let mut counts = vec![b"5".to_vec(), b"4".to_vec()];
                move |_| Ok(counts.pop().unwrap())
            });

        let service = ThrottleService::new(&config(), Arc::new(cache));

        assert_eq!(service.blocked("a@b.com", "1.2.3.4").await, Ok(false));
        assert_eq!(service.blocked("a@b.com", "1.2.3.4").await, Ok(true));
    }

    #[tokio::test]
    async fn test_blocked_fails_open_on_garbage() {
        let mut cache = MockTestCache::new();
        cache
            .expect_get()
            .times(1)
            .returning(|_| Ok(b"{\"count\":9}".to_vec()));

        let service = ThrottleService::new(&config(), Arc::new(cache));

        assert_eq!(service.blocked("a@b.com", "1.2.3.4").await, Ok(false));
    }

    #[tokio::test]
    async fn test_blocked_propagates_connection_error() {
        let mut cache = MockTestCache::new();
        cache
            .expect_get()
            .times(1)
            .returning(|_| Err(CacheError::Connection("refused".to_string())));

        let service = ThrottleService::new(&config(), Arc::new(cache));

        assert!(matches!(
            service.blocked("a@b.com", "1.2.3.4").await,
            Err(CacheError::Connection(_))
        ));
    }

    #[tokio::test]
    async fn test_incr_resets_window_on_every_failure() {
        let mut cache = MockTestCache::new();
        cache
            .expect_increment()
            .withf(|key, ttl| key.starts_with("throttle:") && *ttl == Duration::from_secs(3600))
            .times(1)
            .returning(|_, _| Ok(3));

        let service = ThrottleService::new(&config(), Arc::new(cache));

        assert_eq!(service.incr("a@b.com", "1.2.3.4").await, Ok(3));
    }

    #[tokio::test]
    async fn test_clear_deletes_counter() {
        let expected = throttle_key("a@b.com", "1.2.3.4");

        let mut cache = MockTestCache::new();
        cache
            .expect_delete()
            .withf(move |keys| keys.len() == 1 && keys[0] == expected)
            .times(1)
            .returning(|_| Ok(()));

        let service = ThrottleService::new(&config(), Arc::new(cache));

        assert_eq!(service.clear("a@b.com", "1.2.3.4").await, Ok(()));
    }
}
