use sqlx::{Encode, FromRow, Sqlite, SqlitePool, Type, sqlite::SqliteRow};
use time::OffsetDateTime;

use crate::{Entity, EntityType, Lookup, Mutate, Schema, Trashed};

/// Persistence over a SQLite pool. Entities map to `SELECT *` rows of their
/// table, optionally prefixed.
#[derive(Debug, Clone)]
pub struct SqlitePersistence {
    pool: SqlitePool,
    table_prefix: String,
}

impl SqlitePersistence {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            table_prefix: String::new(),
        }
    }

    pub fn with_table_prefix(mut self, table_prefix: impl Into<String>) -> Self {
        self.table_prefix = table_prefix.into();
        self
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl Schema for SqlitePersistence {
    type Error = sqlx::Error;

    fn table_of(&self, entity: &EntityType) -> String {
        format!("{}{}", self.table_prefix, entity.table)
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", skip(self), ret)
    )]
    async fn has_column(&self, table: &str, column: &str) -> Result<bool, Self::Error> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM pragma_table_info(?) WHERE name = ?",
        )
        .bind(table)
        .bind(column)
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }
}

impl<E> Lookup<E> for SqlitePersistence
where
    E: Entity + for<'r> FromRow<'r, SqliteRow> + Unpin,
    E::Key: for<'q> Encode<'q, Sqlite> + Type<Sqlite>,
{
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", fields(entity = E::TYPE.name, %key), skip_all)
    )]
    async fn find_with_trashed(&self, key: &E::Key) -> Result<Option<E>, Self::Error> {
        let sql = format!(
            r#"SELECT * FROM "{}" WHERE "{}" = ?"#,
            self.table_of(&E::TYPE),
            E::TYPE.key_name
        );

        sqlx::query_as::<_, E>(&sql)
            .bind(key.clone())
            .fetch_optional(&self.pool)
            .await
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", fields(entity = E::TYPE.name, ?trashed), skip_all)
    )]
    async fn all(&self, trashed: Trashed, column: &str) -> Result<Vec<E>, Self::Error> {
        let filter = match trashed {
            Trashed::Include => String::new(),
            Trashed::Exclude => format!(r#" WHERE "{}" IS NULL"#, column),
            Trashed::Only => format!(r#" WHERE "{}" IS NOT NULL"#, column),
        };
        let sql = format!(
            r#"SELECT * FROM "{}"{} ORDER BY "{}""#,
            self.table_of(&E::TYPE),
            filter,
            E::TYPE.key_name
        );

        sqlx::query_as::<_, E>(&sql).fetch_all(&self.pool).await
    }
}

impl<E> Mutate<E> for SqlitePersistence
where
    E: Entity,
    E::Key: for<'q> Encode<'q, Sqlite> + Type<Sqlite>,
{
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", fields(entity = E::TYPE.name, %key, ?at), skip_all)
    )]
    async fn mark_deleted(
        &self,
        key: &E::Key,
        column: &str,
        at: Option<OffsetDateTime>,
    ) -> Result<u64, Self::Error> {
        let sql = format!(
            r#"UPDATE "{}" SET "{}" = ? WHERE "{}" = ?"#,
            self.table_of(&E::TYPE),
            column,
            E::TYPE.key_name
        );

        Ok(sqlx::query(&sql)
            .bind(at)
            .bind(key.clone())
            .execute(&self.pool)
            .await?
            .rows_affected())
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", fields(entity = E::TYPE.name, %key), skip_all)
    )]
    async fn remove(&self, key: &E::Key) -> Result<u64, Self::Error> {
        let sql = format!(
            r#"DELETE FROM "{}" WHERE "{}" = ?"#,
            self.table_of(&E::TYPE),
            E::TYPE.key_name
        );

        Ok(sqlx::query(&sql)
            .bind(key.clone())
            .execute(&self.pool)
            .await?
            .rows_affected())
    }
}
