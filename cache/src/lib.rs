mod backend;
mod config;
mod driver;
mod error;
mod key;
mod store;

pub use backend::Backend;
pub use config::{CacheConfig, DEFAULT_TTL};
pub use driver::CacheDriver;
pub use error::{
    CacheError, ConfigError, InvalidKeyData, UnknownCacheBackend, UnsupportedCacheBackend,
};
pub use key::{CacheKey, KeyField, Tag, ValidKey};
pub use store::TaggedStore;
