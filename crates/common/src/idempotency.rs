//! Idempotency cache over Redis.
//!
//! Deduplicates retried mutating calls: a workflow operation invoked with an
//! idempotency key first checks this cache and, on a hit, returns the cached
//! result without re-executing side effects. On success it stores the result
//! under the key with a TTL.
//!
//! The cache is a dedup optimization, not a correctness gate: callers must
//! treat any cache failure as a miss and proceed (correctness is guaranteed
//! by the status check inside the workflow transaction).

use fred::clients::Client as RedisClient;
use fred::interfaces::KeysInterface;
use fred::types::Expiration;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Default TTL for cached results: 1 hour.
const DEFAULT_TTL_SECS: i64 = 60 * 60;

/// Redis-backed idempotency cache.
#[derive(Clone)]
pub struct IdempotencyCache {
    redis: Arc<RedisClient>,
    ttl_secs: i64,
}

impl IdempotencyCache {
    /// Create a new idempotency cache with the default TTL.
    #[must_use]
    pub const fn new(redis: Arc<RedisClient>) -> Self {
        Self {
            redis,
            ttl_secs: DEFAULT_TTL_SECS,
        }
    }

    /// Create a new idempotency cache with a custom TTL.
    #[must_use]
    pub const fn with_ttl(redis: Arc<RedisClient>, ttl: Duration) -> Self {
        Self {
            redis,
            ttl_secs: ttl.as_secs() as i64,
        }
    }

    /// Generate the cache key for an idempotency key.
    fn cache_key(key: &str) -> String {
        format!("idempotency:{key}")
    }

    /// Look up a previously stored result.
    ///
    /// Returns `Ok(Some(result))` on a hit, `Ok(None)` on a miss.
    pub async fn check(&self, key: &str) -> Result<Option<serde_json::Value>, IdempotencyCacheError> {
        let cache_key = Self::cache_key(key);

        let result: Option<String> = self
            .redis
            .get(cache_key)
            .await
            .map_err(|e| IdempotencyCacheError::Redis(e.to_string()))?;

        if let Some(json_str) = result {
            let value: serde_json::Value = serde_json::from_str(&json_str)
                .map_err(|e| IdempotencyCacheError::Serialization(e.to_string()))?;

            debug!(key = %key, "Idempotency cache hit");
            Ok(Some(value))
        } else {
            debug!(key = %key, "Idempotency cache miss");
            Ok(None)
        }
    }

    /// Store a result under an idempotency key with the configured TTL.
    pub async fn store(
        &self,
        key: &str,
        result: &serde_json::Value,
    ) -> Result<(), IdempotencyCacheError> {
        let cache_key = Self::cache_key(key);
        let json_str = serde_json::to_string(result)
            .map_err(|e| IdempotencyCacheError::Serialization(e.to_string()))?;

        self.redis
            .set::<(), _, _>(
                cache_key,
                json_str,
                Some(Expiration::EX(self.ttl_secs)),
                None,
                false,
            )
            .await
            .map_err(|e| IdempotencyCacheError::Redis(e.to_string()))?;

        debug!(key = %key, ttl_secs = self.ttl_secs, "Stored idempotency result");

        Ok(())
    }
}

/// Idempotency cache error type.
#[derive(Debug, thiserror::Error)]
pub enum IdempotencyCacheError {
    /// Redis operation failed.
    #[error("Redis error: {0}")]
    Redis(String),

    /// JSON serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}
