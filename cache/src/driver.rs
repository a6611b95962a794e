use std::time::Duration;

use serde::{Serialize, de::DeserializeOwned};

use crate::{Backend, CacheConfig, CacheError, CacheKey, TaggedStore, UnsupportedCacheBackend};

/// Tag scoped remember/put/forget on top of a [`TaggedStore`].
///
/// Values are stored as JSON. Every operation validates its [`CacheKey`]
/// before touching the store.
pub struct CacheDriver<S> {
    backend: Backend,
    store: S,
}

impl<S> CacheDriver<S>
where
    S: TaggedStore,
{
    /// Fails for backends that cannot flush a single tag group.
    pub fn new(backend: Backend, store: S) -> Result<Self, UnsupportedCacheBackend> {
        if !backend.supports_tags() {
            return Err(UnsupportedCacheBackend(backend));
        }

        Ok(Self { backend, store })
    }

    pub fn from_config(config: &CacheConfig, store: S) -> Result<Self, UnsupportedCacheBackend> {
        Self::new(config.store, store)
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the value cached under `key`, or awaits `producer`, caches its
    /// output for `ttl` and returns it. The producer is not called on a hit
    /// and its errors are returned without caching anything.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", fields(key = ?key.key_with_tag), skip_all)
    )]
    pub async fn remember<V, E, F, Fut>(
        &self,
        key: &CacheKey,
        ttl: Duration,
        producer: F,
    ) -> Result<V, E>
    where
        V: Serialize + DeserializeOwned,
        E: From<CacheError<S::Error>>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let key = key.validate().map_err(CacheError::<S::Error>::from)?;

        let cached = self
            .store
            .get(key.tags, key.params_key)
            .await
            .map_err(CacheError::Store)?;

        if let Some(json) = cached {
            #[cfg(feature = "tracing")]
            tracing::debug!("hit");

            let value = serde_json::from_str(&json)
                .map_err(CacheError::<S::Error>::from)?;
            return Ok(value);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!("miss");

        let value = producer().await?;
        let json = serde_json::to_string(&value)
            .map_err(CacheError::<S::Error>::from)?;
        self.store
            .set(key.tags, key.params_key, json, ttl)
            .await
            .map_err(CacheError::Store)?;

        Ok(value)
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", fields(key = ?key.key_with_tag, ?ttl), skip_all)
    )]
    pub async fn put<V>(
        &self,
        key: &CacheKey,
        data: &V,
        ttl: Duration,
    ) -> Result<(), CacheError<S::Error>>
    where
        V: Serialize + ?Sized,
    {
        let key = key.validate()?;
        let json = serde_json::to_string(data)?;

        self.store
            .set(key.tags, key.params_key, json, ttl)
            .await
            .map_err(CacheError::Store)
    }

    /// Flushes every entry stored under any of the key's tags, not only the
    /// entry at its params key.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", fields(tags = ?key.tags), skip_all)
    )]
    pub async fn forget(&self, key: &CacheKey) -> Result<(), CacheError<S::Error>> {
        let key = key.validate()?;

        self.store
            .flush_tags(key.tags)
            .await
            .map_err(CacheError::Store)
    }
}
