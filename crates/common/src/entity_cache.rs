//! Read-through entity caching with Redis.
//!
//! Caches serialized entity snapshots keyed by `{kind}:{id}` so the read
//! path can skip the database for hot rows. Cache coherency is the writing
//! workflow's responsibility: after committing a mutation it must call
//! [`EntityCache::invalidate`] for every entity the transaction touched.

use fred::clients::Client as RedisClient;
use fred::interfaces::KeysInterface;
use fred::types::Expiration;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Default cache TTL: 5 minutes.
const DEFAULT_TTL_SECS: i64 = 5 * 60;

/// Redis-backed entity cache.
#[derive(Clone)]
pub struct EntityCache {
    redis: Arc<RedisClient>,
    ttl_secs: i64,
}

impl EntityCache {
    /// Create a new entity cache with the default TTL.
    #[must_use]
    pub const fn new(redis: Arc<RedisClient>) -> Self {
        Self {
            redis,
            ttl_secs: DEFAULT_TTL_SECS,
        }
    }

    /// Create a new entity cache with a custom TTL.
    #[must_use]
    pub const fn with_ttl(redis: Arc<RedisClient>, ttl: Duration) -> Self {
        Self {
            redis,
            ttl_secs: ttl.as_secs() as i64,
        }
    }

    /// Generate the cache key for an entity.
    fn cache_key(kind: &str, id: &str) -> String {
        format!("entity:{kind}:{id}")
    }

    /// Get a cached entity.
    ///
    /// Returns `Ok(Some(entity))` on a hit, `Ok(None)` on a miss.
    pub async fn get<T: DeserializeOwned>(
        &self,
        kind: &str,
        id: &str,
    ) -> Result<Option<T>, EntityCacheError> {
        let key = Self::cache_key(kind, id);

        let result: Option<String> = self
            .redis
            .get(key)
            .await
            .map_err(|e| EntityCacheError::Redis(e.to_string()))?;

        if let Some(json_str) = result {
            let entity: T = serde_json::from_str(&json_str)
                .map_err(|e| EntityCacheError::Serialization(e.to_string()))?;

            debug!(kind = %kind, id = %id, "Entity cache hit");
            Ok(Some(entity))
        } else {
            debug!(kind = %kind, id = %id, "Entity cache miss");
            Ok(None)
        }
    }

    /// Store an entity snapshot.
    pub async fn set<T: Serialize>(
        &self,
        kind: &str,
        id: &str,
        entity: &T,
    ) -> Result<(), EntityCacheError> {
        let key = Self::cache_key(kind, id);
        let json_str = serde_json::to_string(entity)
            .map_err(|e| EntityCacheError::Serialization(e.to_string()))?;

        self.redis
            .set::<(), _, _>(key, json_str, Some(Expiration::EX(self.ttl_secs)), None, false)
            .await
            .map_err(|e| EntityCacheError::Redis(e.to_string()))?;

        Ok(())
    }

    /// Invalidate a cached entity.
    pub async fn invalidate(&self, kind: &str, id: &str) -> Result<(), EntityCacheError> {
        let key = Self::cache_key(kind, id);

        self.redis
            .del::<(), _>(key)
            .await
            .map_err(|e| EntityCacheError::Redis(e.to_string()))?;

        debug!(kind = %kind, id = %id, "Invalidated cached entity");

        Ok(())
    }
}

/// Entity cache error type.
#[derive(Debug, thiserror::Error)]
pub enum EntityCacheError {
    /// Redis operation failed.
    #[error("Redis error: {0}")]
    Redis(String),

    /// JSON serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_generation() {
        let key = EntityCache::cache_key("payment", "01890000-aaaa-bbbb-cccc-000000000001");
        assert_eq!(key, "entity:payment:01890000-aaaa-bbbb-cccc-000000000001");
    }
}
