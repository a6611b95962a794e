use cache::CacheError;

#[derive(thiserror::Error, Debug)]
pub enum RepositoryError<E> {
    #[error("model is not an entity of repository model class :: expected {expected}, found {found}")]
    WrongEntityType {
        expected: &'static str,
        found: &'static str,
    },

    #[error("no {entity} found for key {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("{entity} does not use soft deletes")]
    SoftDeletesUnsupported { entity: &'static str },

    #[error("soft delete column `{column}` is missing from table `{table}`")]
    MissingSoftDeleteColumn { table: String, column: &'static str },

    #[error(transparent)]
    Persistence(E),
}

#[derive(thiserror::Error, Debug)]
pub enum DataAccessError<P, C> {
    #[error(transparent)]
    Repository(#[from] RepositoryError<P>),

    #[error(transparent)]
    Cache(#[from] CacheError<C>),
}
