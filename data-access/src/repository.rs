use std::marker::PhantomData;

use time::OffsetDateTime;

use crate::{Entity, KeyOrModel, Lookup, Model, Mutate, RepositoryError, Schema, Trashed};

pub const DELETED_AT: &str = "deleted_at";

/// Turns a key, or a record already in hand, into a record of one entity type.
pub trait Resolver: Send + Sync {
    type Entity: Entity;
    type Error: std::error::Error + Send + Sync + 'static;

    fn resolve_model(
        &self,
        key_or_model: KeyOrModel<<Self::Entity as Entity>::Key>,
    ) -> impl Future<Output = Result<Self::Entity, Self::Error>> + Send;
}

pub trait Lister: Resolver {
    fn list(
        &self,
        trashed: Trashed,
    ) -> impl Future<Output = Result<Vec<Self::Entity>, Self::Error>> + Send;
}

pub trait Deleter: Resolver {
    /// Soft deletes when the entity type supports it, removes otherwise.
    fn delete(
        &self,
        key_or_model: KeyOrModel<<Self::Entity as Entity>::Key>,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    fn restore(
        &self,
        key_or_model: KeyOrModel<<Self::Entity as Entity>::Key>,
    ) -> impl Future<Output = Result<Self::Entity, Self::Error>> + Send;

    fn force_delete(
        &self,
        key_or_model: KeyOrModel<<Self::Entity as Entity>::Key>,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

/// Repository of `E` records backed by persistence `P`.
pub struct Repository<E, P> {
    persistence: P,
    deleted_at_column: &'static str,
    _entity: PhantomData<fn() -> E>,
}

impl<E, P> Repository<E, P>
where
    E: Entity,
    P: Schema,
{
    pub fn new(persistence: P) -> Self {
        Self {
            persistence,
            deleted_at_column: DELETED_AT,
            _entity: PhantomData,
        }
    }

    pub fn with_deleted_at_column(mut self, column: &'static str) -> Self {
        self.deleted_at_column = column;
        self
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    pub fn deleted_at_column(&self) -> &'static str {
        self.deleted_at_column
    }

    /// Whether `model`'s entity type (this repository's when `None`) declares
    /// soft deletes.
    pub fn is_instance_of_soft_deletes(&self, model: Option<&dyn Model>) -> bool {
        model.map_or(E::TYPE, |model| model.entity_type()).soft_deletes
    }

    /// Whether the table of `model`'s entity type (this repository's when
    /// `None`) has the soft delete column. Independent of
    /// [`Self::is_instance_of_soft_deletes`].
    pub async fn is_model_has_soft_delete_column(
        &self,
        model: Option<&dyn Model>,
    ) -> Result<bool, RepositoryError<P::Error>> {
        let table = self
            .persistence
            .table_of(&model.map_or(E::TYPE, |model| model.entity_type()));

        self.persistence
            .has_column(&table, self.deleted_at_column)
            .await
            .map_err(RepositoryError::Persistence)
    }

    /// `None` when the entity type does not soft delete. Declared soft deletes
    /// without the column in the table is an error.
    async fn soft_delete_column(&self) -> Result<Option<&'static str>, RepositoryError<P::Error>> {
        if !self.is_instance_of_soft_deletes(None) {
            return Ok(None);
        }

        if !self.is_model_has_soft_delete_column(None).await? {
            return Err(RepositoryError::MissingSoftDeleteColumn {
                table: self.persistence.table_of(&E::TYPE),
                column: self.deleted_at_column,
            });
        }

        Ok(Some(self.deleted_at_column))
    }

    fn not_found(key: &E::Key) -> RepositoryError<P::Error> {
        RepositoryError::NotFound {
            entity: E::TYPE.name,
            key: key.to_string(),
        }
    }

    fn affected(rows: u64, key: &E::Key) -> Result<(), RepositoryError<P::Error>> {
        match rows {
            0 => Err(Self::not_found(key)),
            _ => Ok(()),
        }
    }
}

impl<E, P> Repository<E, P>
where
    E: Entity,
    P: Lookup<E>,
{
    /// Like [`Resolver::resolve_model`] for a key, but a soft deleted record
    /// is not found.
    pub async fn find(&self, key: E::Key) -> Result<E, RepositoryError<P::Error>> {
        let model = self.resolve_model(KeyOrModel::Key(key)).await?;

        match self.is_instance_of_soft_deletes(None) && model.is_trashed() {
            true => Err(Self::not_found(model.key())),
            false => Ok(model),
        }
    }
}

impl<E, P> Resolver for Repository<E, P>
where
    E: Entity,
    P: Lookup<E>,
{
    type Entity = E;
    type Error = RepositoryError<P::Error>;

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", fields(entity = E::TYPE.name), skip_all)
    )]
    async fn resolve_model(&self, key_or_model: KeyOrModel<E::Key>) -> Result<E, Self::Error> {
        match key_or_model {
            KeyOrModel::Model(model) => {
                let found = model.entity_type().name;

                model
                    .into_any()
                    .downcast::<E>()
                    .map(|model| *model)
                    .map_err(|_| RepositoryError::WrongEntityType {
                        expected: E::TYPE.name,
                        found,
                    })
            }
            KeyOrModel::Key(key) => self
                .persistence
                .find_with_trashed(&key)
                .await
                .map_err(RepositoryError::Persistence)?
                .ok_or_else(|| Self::not_found(&key)),
        }
    }
}

impl<E, P> Lister for Repository<E, P>
where
    E: Entity,
    P: Lookup<E>,
{
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", fields(entity = E::TYPE.name, ?trashed), skip_all)
    )]
    async fn list(&self, trashed: Trashed) -> Result<Vec<E>, Self::Error> {
        let trashed = match trashed {
            Trashed::Include => Trashed::Include,
            filtered => match self.soft_delete_column().await? {
                Some(_) => filtered,
                None if filtered == Trashed::Only => {
                    return Err(RepositoryError::SoftDeletesUnsupported {
                        entity: E::TYPE.name,
                    });
                }
                None => Trashed::Include,
            },
        };

        self.persistence
            .all(trashed, self.deleted_at_column)
            .await
            .map_err(RepositoryError::Persistence)
    }
}

impl<E, P> Deleter for Repository<E, P>
where
    E: Entity,
    P: Lookup<E> + Mutate<E>,
{
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", fields(entity = E::TYPE.name), skip_all)
    )]
    async fn delete(&self, key_or_model: KeyOrModel<E::Key>) -> Result<(), Self::Error> {
        let model = self.resolve_model(key_or_model).await?;

        let rows = match self.soft_delete_column().await? {
            Some(column) => {
                self.persistence
                    .mark_deleted(model.key(), column, Some(OffsetDateTime::now_utc()))
                    .await
            }
            None => self.persistence.remove(model.key()).await,
        }
        .map_err(RepositoryError::Persistence)?;

        Self::affected(rows, model.key())
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", fields(entity = E::TYPE.name), skip_all)
    )]
    async fn restore(&self, key_or_model: KeyOrModel<E::Key>) -> Result<E, Self::Error> {
        let model = self.resolve_model(key_or_model).await?;
        let column = self
            .soft_delete_column()
            .await?
            .ok_or(RepositoryError::SoftDeletesUnsupported {
                entity: E::TYPE.name,
            })?;

        let rows = self
            .persistence
            .mark_deleted(model.key(), column, None)
            .await
            .map_err(RepositoryError::Persistence)?;
        Self::affected(rows, model.key())?;

        let key = model.key().clone();
        self.resolve_model(KeyOrModel::Key(key)).await
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", fields(entity = E::TYPE.name), skip_all)
    )]
    async fn force_delete(&self, key_or_model: KeyOrModel<E::Key>) -> Result<(), Self::Error> {
        let model = self.resolve_model(key_or_model).await?;

        let rows = self
            .persistence
            .remove(model.key())
            .await
            .map_err(RepositoryError::Persistence)?;

        Self::affected(rows, model.key())
    }
}

impl<E, P: Clone> Clone for Repository<E, P> {
    fn clone(&self) -> Self {
        Self {
            persistence: self.persistence.clone(),
            deleted_at_column: self.deleted_at_column,
            _entity: PhantomData,
        }
    }
}
