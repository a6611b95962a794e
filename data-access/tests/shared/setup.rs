use data_access::SqlitePersistence;
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};

const SCHEMA: &[&str] = &[
    "CREATE TABLE posts (id INTEGER PRIMARY KEY, title TEXT NOT NULL, deleted_at TEXT)",
    "CREATE TABLE labels (id INTEGER PRIMARY KEY, name TEXT NOT NULL)",
    "CREATE TABLE drafts (id INTEGER PRIMARY KEY, title TEXT NOT NULL)",
    "CREATE TABLE archives (id INTEGER PRIMARY KEY, title TEXT NOT NULL, deleted_at TEXT)",
    "CREATE TABLE blog_posts (id INTEGER PRIMARY KEY, title TEXT NOT NULL, deleted_at TEXT)",
    "INSERT INTO posts (id, title, deleted_at) VALUES (1, 'live', NULL)",
    "INSERT INTO posts (id, title, deleted_at) VALUES (2, 'trashed', '2024-01-01T00:00:00Z')",
    "INSERT INTO labels (id, name) VALUES (1, 'rust'), (2, 'sqlite')",
    "INSERT INTO drafts (id, title) VALUES (1, 'draft')",
    "INSERT INTO archives (id, title, deleted_at) VALUES (1, 'old', NULL)",
    "INSERT INTO blog_posts (id, title, deleted_at) VALUES (1, 'prefixed', NULL)",
];

pub async fn pool() -> SqlitePool {
    // one connection, every `sqlite::memory:` connection is its own database
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("unable to connect to test db");

    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(&pool)
            .await
            .expect("unable to create test schema");
    }

    pool
}

pub async fn persistence() -> SqlitePersistence {
    SqlitePersistence::new(pool().await)
}
