use std::{
    collections::BTreeMap,
    convert::Infallible,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use data_access::{Lookup, Mutate, Schema, Trashed};
use time::OffsetDateTime;

use super::entities::Post;

/// Post persistence counting the reads that reach it.
#[derive(Clone, Default)]
pub struct MemoryPersistence {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    posts: Mutex<BTreeMap<i64, Post>>,
    finds: AtomicUsize,
    lists: AtomicUsize,
}

impl MemoryPersistence {
    pub fn new(posts: impl IntoIterator<Item = Post>) -> Self {
        let persistence = Self::default();
        persistence
            .inner
            .posts
            .lock()
            .unwrap()
            .extend(posts.into_iter().map(|post| (post.id, post)));
        persistence
    }

    pub fn finds(&self) -> usize {
        self.inner.finds.load(Ordering::SeqCst)
    }

    pub fn lists(&self) -> usize {
        self.inner.lists.load(Ordering::SeqCst)
    }

    pub fn rename(&self, id: i64, title: &str) {
        if let Some(post) = self.inner.posts.lock().unwrap().get_mut(&id) {
            post.title = title.to_string();
        }
    }
}

impl Schema for MemoryPersistence {
    type Error = Infallible;

    async fn has_column(&self, _table: &str, column: &str) -> Result<bool, Self::Error> {
        Ok(column == "deleted_at")
    }
}

impl Lookup<Post> for MemoryPersistence {
    async fn find_with_trashed(&self, key: &i64) -> Result<Option<Post>, Self::Error> {
        self.inner.finds.fetch_add(1, Ordering::SeqCst);
        Ok(self.inner.posts.lock().unwrap().get(key).cloned())
    }

    async fn all(&self, trashed: Trashed, _column: &str) -> Result<Vec<Post>, Self::Error> {
        self.inner.lists.fetch_add(1, Ordering::SeqCst);

        let posts = self.inner.posts.lock().unwrap();
        Ok(posts
            .values()
            .filter(|post| match trashed {
                Trashed::Include => true,
                Trashed::Exclude => post.deleted_at.is_none(),
                Trashed::Only => post.deleted_at.is_some(),
            })
            .cloned()
            .collect())
    }
}

impl Mutate<Post> for MemoryPersistence {
    async fn mark_deleted(
        &self,
        key: &i64,
        _column: &str,
        at: Option<OffsetDateTime>,
    ) -> Result<u64, Self::Error> {
        let mut posts = self.inner.posts.lock().unwrap();
        Ok(posts.get_mut(key).map_or(0, |post| {
            post.deleted_at = at;
            1
        }))
    }

    async fn remove(&self, key: &i64) -> Result<u64, Self::Error> {
        let mut posts = self.inner.posts.lock().unwrap();
        Ok(posts.remove(key).map_or(0, |_| 1))
    }
}
