use std::{sync::Arc, time::Duration};

use cache::{CacheDriver, CacheError, CacheKey, TaggedStore};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    DataAccessError, Deleter, Entity, KeyOrModel, Lister, Lookup, Mutate, Repository,
    RepositoryError, Resolver, Schema, Trashed,
};

/// A [`Repository`] whose reads go through a shared [`CacheDriver`].
///
/// Records are cached under their record tag (`<entity>:<key>`), listings
/// under the collection tag (`<entity>`). Every mutation flushes both groups
/// for the touched record, so other cached records survive.
pub struct CachedRepository<E, P, S> {
    repository: Repository<E, P>,
    cache: Arc<CacheDriver<S>>,
    ttl: Duration,
}

impl<E, P, S> CachedRepository<E, P, S>
where
    E: Entity,
    P: Schema,
    S: TaggedStore,
{
    pub fn new(repository: Repository<E, P>, cache: Arc<CacheDriver<S>>, ttl: Duration) -> Self {
        Self {
            repository,
            cache,
            ttl,
        }
    }

    pub fn repository(&self) -> &Repository<E, P> {
        &self.repository
    }

    pub fn cache(&self) -> &CacheDriver<S> {
        &self.cache
    }

    pub fn collection_tag() -> String {
        E::TYPE.name.to_string()
    }

    pub fn record_tag(key: &E::Key) -> String {
        format!("{}:{}", E::TYPE.name, key)
    }

    fn record_key(key: &E::Key) -> CacheKey {
        CacheKey::new([Self::record_tag(key)], format!("resolve:{}", key))
    }

    fn list_key(trashed: Trashed) -> Result<CacheKey, CacheError<S::Error>> {
        Ok(CacheKey::for_params([Self::collection_tag()], "list", &trashed)?)
    }

    async fn invalidate(&self, key: &E::Key) -> Result<(), CacheError<S::Error>> {
        let tags = [Self::collection_tag(), Self::record_tag(key)];
        self.cache.forget(&CacheKey::new(tags, key)).await
    }

    /// Runs `mutation`, then flushes the record's tags.
    async fn mutate<T, F, Fut>(
        &self,
        key_or_model: KeyOrModel<E::Key>,
        mutation: F,
    ) -> Result<T, DataAccessError<P::Error, S::Error>>
    where
        P: Lookup<E>,
        F: FnOnce(KeyOrModel<E::Key>) -> Fut,
        Fut: Future<Output = Result<T, RepositoryError<P::Error>>>,
    {
        let (key, key_or_model) = match key_or_model {
            KeyOrModel::Key(key) => (key.clone(), KeyOrModel::Key(key)),
            model => {
                let model = self.repository.resolve_model(model).await?;
                (model.key().clone(), KeyOrModel::model(model))
            }
        };

        let value = mutation(key_or_model).await?;
        self.invalidate(&key).await?;

        Ok(value)
    }
}

impl<E, P, S> CachedRepository<E, P, S>
where
    E: Entity + Serialize + DeserializeOwned,
    P: Lookup<E>,
    S: TaggedStore,
{
    /// Cached [`Repository::find`].
    pub async fn find(&self, key: E::Key) -> Result<E, DataAccessError<P::Error, S::Error>> {
        let model = self.resolve_model(KeyOrModel::Key(key)).await?;

        match self.repository.is_instance_of_soft_deletes(None) && model.is_trashed() {
            true => Err(RepositoryError::<P::Error>::NotFound {
                entity: E::TYPE.name,
                key: model.key().to_string(),
            }
            .into()),
            false => Ok(model),
        }
    }
}

impl<E, P, S> Resolver for CachedRepository<E, P, S>
where
    E: Entity + Serialize + DeserializeOwned,
    P: Lookup<E>,
    S: TaggedStore,
{
    type Entity = E;
    type Error = DataAccessError<P::Error, S::Error>;

    /// A model in hand is checked without touching the cache.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", fields(entity = E::TYPE.name), skip_all)
    )]
    async fn resolve_model(&self, key_or_model: KeyOrModel<E::Key>) -> Result<E, Self::Error> {
        let key = match key_or_model {
            KeyOrModel::Key(key) => key,
            model => return Ok(self.repository.resolve_model(model).await?),
        };

        self.cache
            .remember(&Self::record_key(&key), self.ttl, || async {
                Ok::<_, Self::Error>(self.repository.resolve_model(KeyOrModel::Key(key)).await?)
            })
            .await
    }
}

impl<E, P, S> Lister for CachedRepository<E, P, S>
where
    E: Entity + Serialize + DeserializeOwned,
    P: Lookup<E>,
    S: TaggedStore,
{
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", fields(entity = E::TYPE.name, ?trashed), skip_all)
    )]
    async fn list(&self, trashed: Trashed) -> Result<Vec<E>, Self::Error> {
        self.cache
            .remember(&Self::list_key(trashed)?, self.ttl, || async {
                Ok::<_, Self::Error>(self.repository.list(trashed).await?)
            })
            .await
    }
}

impl<E, P, S> Deleter for CachedRepository<E, P, S>
where
    E: Entity + Serialize + DeserializeOwned,
    P: Lookup<E> + Mutate<E>,
    S: TaggedStore,
{
    async fn delete(&self, key_or_model: KeyOrModel<E::Key>) -> Result<(), Self::Error> {
        self.mutate(key_or_model, |key| self.repository.delete(key))
            .await
    }

    async fn restore(&self, key_or_model: KeyOrModel<E::Key>) -> Result<E, Self::Error> {
        self.mutate(key_or_model, |key| self.repository.restore(key))
            .await
    }

    async fn force_delete(&self, key_or_model: KeyOrModel<E::Key>) -> Result<(), Self::Error> {
        self.mutate(key_or_model, |key| self.repository.force_delete(key))
            .await
    }
}

impl<E, P: Clone, S> Clone for CachedRepository<E, P, S> {
    fn clone(&self) -> Self {
        Self {
            repository: self.repository.clone(),
            cache: Arc::clone(&self.cache),
            ttl: self.ttl,
        }
    }
}
