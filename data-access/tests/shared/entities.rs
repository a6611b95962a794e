use data_access::{Entity, EntityType};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub deleted_at: Option<OffsetDateTime>,
}

impl Entity for Post {
    type Key = i64;

    const TYPE: EntityType = EntityType::new("post", "posts").soft_deletes();

    fn key(&self) -> &i64 {
        &self.id
    }

    fn deleted_at(&self) -> Option<OffsetDateTime> {
        self.deleted_at
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Label {
    pub id: i64,
    pub name: String,
}

impl Entity for Label {
    type Key = i64;

    const TYPE: EntityType = EntityType::new("label", "labels");

    fn key(&self) -> &i64 {
        &self.id
    }
}

/// Declares soft deletes, but its table has no `deleted_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Draft {
    pub id: i64,
    pub title: String,
}

impl Entity for Draft {
    type Key = i64;

    const TYPE: EntityType = EntityType::new("draft", "drafts").soft_deletes();

    fn key(&self) -> &i64 {
        &self.id
    }
}

/// Its table has `deleted_at`, but it does not soft delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Archive {
    pub id: i64,
    pub title: String,
    pub deleted_at: Option<OffsetDateTime>,
}

impl Entity for Archive {
    type Key = i64;

    const TYPE: EntityType = EntityType::new("archive", "archives");

    fn key(&self) -> &i64 {
        &self.id
    }

    fn deleted_at(&self) -> Option<OffsetDateTime> {
        self.deleted_at
    }
}

pub fn post(id: i64, title: &str) -> Post {
    Post {
        id,
        title: title.to_string(),
        deleted_at: None,
    }
}
