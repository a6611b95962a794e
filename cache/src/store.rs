use std::time::Duration;

/// A key/value store able to scope entries by tags and flush a whole tag group
/// at once.
///
/// Entries are addressed by their tag set together with their key. Flushing a
/// tag makes every entry stored under a tag set containing it unreachable.
pub trait TaggedStore: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn get(
        &self,
        tags: &[String],
        key: &str,
    ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send;

    /// A zero `ttl` stores nothing and drops any previous value under the key.
    fn set(
        &self,
        tags: &[String],
        key: &str,
        value: String,
        ttl: Duration,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    fn flush_tags(&self, tags: &[String]) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

impl<S: TaggedStore> TaggedStore for std::sync::Arc<S> {
    type Error = S::Error;

    fn get(
        &self,
        tags: &[String],
        key: &str,
    ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send {
        (**self).get(tags, key)
    }

    fn set(
        &self,
        tags: &[String],
        key: &str,
        value: String,
        ttl: Duration,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send {
        (**self).set(tags, key, value, ttl)
    }

    fn flush_tags(&self, tags: &[String]) -> impl Future<Output = Result<(), Self::Error>> + Send {
        (**self).flush_tags(tags)
    }
}
