use async_trait::async_trait;
use log::{debug, warn};
use rate_model::{HistoryQuery, Series};
use rate_provider::{ProviderError, RateHistoryProvider};
use redis::AsyncCommands;

/// Six hours.
pub const DEFAULT_TTL_SECS: u64 = 21600;

/// Key/value store with per-entry expiry backing [`CachedHistoryProvider`].
#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, ProviderError>;

    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), ProviderError>;
}

pub struct RedisStore {
    redis_client: redis::Client,
}

impl RedisStore {
    pub fn new(redis_client: redis::Client) -> Self {
        RedisStore { redis_client }
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection, ProviderError> {
        self.redis_client
            .get_multiplexed_async_connection()
            .await
            .map_err(cache_error)
    }
}

#[async_trait]
impl HistoryStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, ProviderError> {
        let mut redis_con = self.connection().await?;
        redis_con.get(key).await.map_err(cache_error)
    }

    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), ProviderError> {
        let mut redis_con = self.connection().await?;
        let _: () = redis_con
            .set_ex(key, value, ttl_secs)
            .await
            .map_err(cache_error)?;
        Ok(())
    }
}

/// Serves history from the store when a fresh copy exists, otherwise asks
/// `inner` and keeps the answer for `ttl_secs`.
pub struct CachedHistoryProvider<P, S = RedisStore> {
    inner: P,
    store: S,
    ttl_secs: u64,
}

impl<P: RateHistoryProvider> CachedHistoryProvider<P, RedisStore> {
    pub fn new(inner: P, redis_client: redis::Client) -> Self {
        CachedHistoryProvider::with_store(inner, RedisStore::new(redis_client))
    }
}

impl<P: RateHistoryProvider, S: HistoryStore> CachedHistoryProvider<P, S> {
    pub fn with_store(inner: P, store: S) -> Self {
        CachedHistoryProvider {
            inner,
            store,
            ttl_secs: DEFAULT_TTL_SECS,
        }
    }

    pub fn with_ttl(mut self, ttl_secs: u64) -> Self {
        self.ttl_secs = if ttl_secs == 0 {
            DEFAULT_TTL_SECS
        } else {
            ttl_secs
        };
        self
    }

    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }
}

#[async_trait]
impl<P: RateHistoryProvider, S: HistoryStore> RateHistoryProvider for CachedHistoryProvider<P, S> {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    async fn get_history(&self, query: &HistoryQuery) -> Result<Series, ProviderError> {
        let key = query.cache_key();

        if let Some(cached) = self.store.get(&key).await? {
            match decode_cached(&cached) {
                Ok(series) => {
                    debug!("get_history | cache hit | key: {}", key);
                    return Ok(series);
                }
                Err(e) => warn!("get_history | dropping unreadable cache entry {}: {}", key, e),
            }
        }

        debug!("get_history | cache miss | key: {}", key);

        let series = self.inner.get_history(query).await?;

        debug!("get_history | saving to cache | ttl: {}", self.ttl_secs);
        let serialized = serde_json::to_string(&series)?;
        self.store.set_ex(&key, &serialized, self.ttl_secs).await?;

        Ok(series)
    }
}

/// Cached entries are revalidated on the way out.
pub fn decode_cached(cached: &str) -> Result<Series, ProviderError> {
    Ok(serde_json::from_str(cached)?)
}

fn cache_error(err: redis::RedisError) -> ProviderError {
    ProviderError::Cache(err.to_string())
}
