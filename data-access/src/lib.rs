mod cached;
mod entity;
mod error;
mod persistence;
mod repository;
mod sqlite;

pub use cached::CachedRepository;
pub use entity::{Entity, EntityType, KeyOrModel, Model};
pub use error::{DataAccessError, RepositoryError};
pub use persistence::{Lookup, Mutate, Schema, Trashed};
pub use repository::{DELETED_AT, Deleter, Lister, Repository, Resolver};
pub use sqlite::SqlitePersistence;
