use std::{
    collections::HashMap,
    convert::Infallible,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use cache::TaggedStore;

/// Keeps entries in a plain map and counts every call that reaches it.
#[derive(Default)]
pub struct RecordingStore {
    entries: Mutex<HashMap<(Vec<String>, String), String>>,
    pub calls: AtomicUsize,
    pub flushed: Mutex<Vec<Vec<String>>>,
}

impl RecordingStore {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TaggedStore for RecordingStore {
    type Error = Infallible;

    async fn get(&self, tags: &[String], key: &str) -> Result<Option<String>, Self::Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .entries
            .lock()
            .unwrap()
            .get(&(tags.to_vec(), key.to_string()))
            .cloned())
    }

    async fn set(
        &self,
        tags: &[String],
        key: &str,
        value: String,
        _ttl: Duration,
    ) -> Result<(), Self::Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.entries
            .lock()
            .unwrap()
            .insert((tags.to_vec(), key.to_string()), value);
        Ok(())
    }

    async fn flush_tags(&self, tags: &[String]) -> Result<(), Self::Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.entries
            .lock()
            .unwrap()
            .retain(|(entry_tags, _), _| !entry_tags.iter().any(|tag| tags.contains(tag)));
        self.flushed.lock().unwrap().push(tags.to_vec());
        Ok(())
    }
}
