use std::{
    collections::HashSet,
    convert::Infallible,
    time::{Duration, Instant},
};

use cache::TaggedStore;
use dashmap::DashMap;

/// In-process [`TaggedStore`] backing the `array` backend.
///
/// Entries live in one map keyed by their tag scope, and a second map indexes
/// scoped keys by tag so a tag can be flushed without scanning every entry.
pub struct DashStore {
    entries: DashMap<ScopedKey, Entry>,
    tags: DashMap<String, HashSet<ScopedKey>>,
}

/// Tag order and duplicates do not change the scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ScopedKey {
    tags: Vec<String>,
    key: String,
}

struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl ScopedKey {
    fn new(tags: &[String], key: &str) -> Self {
        let mut tags = tags.to_vec();
        tags.sort();
        tags.dedup();

        Self {
            tags,
            key: key.to_string(),
        }
    }
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }
}

impl DashStore {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            tags: DashMap::new(),
        }
    }

    /// Number of stored entries, expired ones included until they are purged
    /// or read.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of tags with at least one indexed entry.
    pub fn tag_count(&self) -> usize {
        self.tags.len()
    }

    /// Drops `scoped` from the index of each of its tags, and tags left with
    /// no entries. A key stored again in the meantime stays indexed.
    fn unindex(&self, scoped: &ScopedKey) {
        for tag in &scoped.tags {
            if let Some(mut keys) = self.tags.get_mut(tag) {
                if !self.entries.contains_key(scoped) {
                    keys.remove(scoped);
                }
            }
            self.tags.remove_if(tag, |_, keys| keys.is_empty());
        }
    }

    /// Drops expired entries and tag index slots pointing at nothing.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip_all))]
    pub fn purge_expired(&self) {
        let now = Instant::now();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        self.tags.retain(|_, keys| {
            keys.retain(|key| self.entries.contains_key(key));
            !keys.is_empty()
        });

        #[cfg(feature = "tracing")]
        tracing::debug!(remaining = self.entries.len(), "purged expired entries");
    }
}

impl Default for DashStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaggedStore for DashStore {
    type Error = Infallible;

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", fields(?tags, ?key), skip_all)
    )]
    async fn get(&self, tags: &[String], key: &str) -> Result<Option<String>, Self::Error> {
        let scoped = ScopedKey::new(tags, key);
        let now = Instant::now();

        if let Some(entry) = self.entries.get(&scoped) {
            if !entry.is_expired(now) {
                return Ok(Some(entry.value.clone()));
            }
        }

        if let Some((scoped, _)) = self
            .entries
            .remove_if(&scoped, |_, entry| entry.is_expired(now))
        {
            self.unindex(&scoped);

            #[cfg(feature = "tracing")]
            tracing::debug!("entry expired");
        }

        Ok(None)
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", fields(?tags, ?key, ?ttl), skip_all)
    )]
    async fn set(
        &self,
        tags: &[String],
        key: &str,
        value: String,
        ttl: Duration,
    ) -> Result<(), Self::Error> {
        let scoped = ScopedKey::new(tags, key);

        if ttl.is_zero() {
            if self.entries.remove(&scoped).is_some() {
                self.unindex(&scoped);
            }
            return Ok(());
        }

        let entry = Entry {
            value,
            expires_at: Instant::now().checked_add(ttl),
        };
        self.entries.insert(scoped.clone(), entry);

        for tag in &scoped.tags {
            self.tags
                .entry(tag.clone())
                .or_default()
                .insert(scoped.clone());
        }

        Ok(())
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", fields(?tags), skip_all)
    )]
    async fn flush_tags(&self, tags: &[String]) -> Result<(), Self::Error> {
        for tag in tags {
            if let Some((_, keys)) = self.tags.remove(tag) {
                #[cfg(feature = "tracing")]
                tracing::debug!(tag, entries = keys.len(), "flushing tag");

                for key in keys {
                    self.entries.remove(&key);
                }
            }
        }

        Ok(())
    }
}
