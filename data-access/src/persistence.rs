use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Entity, EntityType};

/// Which soft deleted records a listing includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trashed {
    Exclude,
    Include,
    Only,
}

pub trait Schema: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn table_of(&self, entity: &EntityType) -> String {
        entity.table.to_string()
    }

    fn has_column(
        &self,
        table: &str,
        column: &str,
    ) -> impl Future<Output = Result<bool, Self::Error>> + Send;
}

pub trait Lookup<E: Entity>: Schema {
    /// Soft deleted records included.
    fn find_with_trashed(
        &self,
        key: &E::Key,
    ) -> impl Future<Output = Result<Option<E>, Self::Error>> + Send;

    /// Records ordered by key. `column` is the soft delete marker and is only
    /// read when `trashed` is not [`Trashed::Include`].
    fn all(
        &self,
        trashed: Trashed,
        column: &str,
    ) -> impl Future<Output = Result<Vec<E>, Self::Error>> + Send;
}

pub trait Mutate<E: Entity>: Schema {
    /// Sets the soft delete marker, or clears it when `at` is `None`.
    /// Returns the number of affected records.
    fn mark_deleted(
        &self,
        key: &E::Key,
        column: &str,
        at: Option<OffsetDateTime>,
    ) -> impl Future<Output = Result<u64, Self::Error>> + Send;

    fn remove(&self, key: &E::Key) -> impl Future<Output = Result<u64, Self::Error>> + Send;
}
