use std::{any::Any, fmt::Display};

use time::OffsetDateTime;

/// Static description of a persisted entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityType {
    pub name: &'static str,
    pub table: &'static str,
    pub key_name: &'static str,
    pub soft_deletes: bool,
}

impl EntityType {
    pub const fn new(name: &'static str, table: &'static str) -> Self {
        Self {
            name,
            table,
            key_name: "id",
            soft_deletes: false,
        }
    }

    pub const fn key_name(mut self, key_name: &'static str) -> Self {
        self.key_name = key_name;
        self
    }

    /// Records are marked deleted instead of removed.
    pub const fn soft_deletes(mut self) -> Self {
        self.soft_deletes = true;
        self
    }
}

pub trait Entity: Send + Sync + 'static {
    type Key: Display + Clone + Send + Sync + 'static;

    const TYPE: EntityType;

    fn key(&self) -> &Self::Key;

    fn deleted_at(&self) -> Option<OffsetDateTime> {
        None
    }

    fn is_trashed(&self) -> bool {
        self.deleted_at().is_some()
    }
}

/// Type erased [`Entity`], for callers holding a record whose concrete type
/// is only checked at resolution time.
pub trait Model: Any + Send + Sync {
    fn entity_type(&self) -> EntityType;

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send + Sync>;
}

impl<E: Entity> Model for E {
    fn entity_type(&self) -> EntityType {
        E::TYPE
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send + Sync> {
        self
    }
}

pub enum KeyOrModel<K> {
    Key(K),
    Model(Box<dyn Model>),
}

impl<K> KeyOrModel<K> {
    pub fn model(model: impl Model) -> Self {
        Self::Model(Box::new(model))
    }
}

impl<K> From<K> for KeyOrModel<K> {
    fn from(key: K) -> Self {
        Self::Key(key)
    }
}
