use crate::{Backend, KeyField};

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("cache key data is invalid :: missing {0}")]
pub struct InvalidKeyData(pub KeyField);

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("caching is not supported for cache backend `{0}`")]
pub struct UnsupportedCacheBackend(pub Backend);

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown cache backend `{0}`")]
pub struct UnknownCacheBackend(pub String);

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("missing env var `{0}`")]
    Missing(&'static str),

    #[error("cannot parse env var `{name}` :: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Errors raised by [`crate::CacheDriver`] operations. Store failures are
/// carried as the store's own error value. Construction fails separately with
/// [`UnsupportedCacheBackend`].
#[derive(thiserror::Error, Debug)]
pub enum CacheError<E> {
    #[error(transparent)]
    InvalidKeyData(#[from] InvalidKeyData),

    #[error("cannot (de)serialize cached value :: {0}")]
    Serde(#[from] serde_json::Error),

    #[error(transparent)]
    Store(E),
}
