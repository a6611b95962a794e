use std::{str::FromStr, time::Duration};

use crate::{Backend, ConfigError};

pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    pub store: Backend,
    pub ttl: Duration,
}

impl CacheConfig {
    pub fn new(store: Backend) -> Self {
        Self {
            store,
            ttl: DEFAULT_TTL,
        }
    }

    /// `CACHE_STORE` (or the older `CACHE_DRIVER`) names the backend,
    /// `CACHE_TTL` optionally overrides the default ttl in seconds.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let store = match get_opt_var::<Backend>(&lookup, "CACHE_STORE")? {
            Some(store) => store,
            None => get_opt_var::<Backend>(&lookup, "CACHE_DRIVER")?
                .ok_or(ConfigError::Missing("CACHE_STORE"))?,
        };

        let ttl = get_opt_var::<u64>(&lookup, "CACHE_TTL")?
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TTL);

        Ok(Self { store, ttl })
    }
}

fn get_opt_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T::Err: std::fmt::Display,
{
    lookup(name)
        .map(|value| {
            value.parse::<T>().map_err(|e| ConfigError::Invalid {
                name,
                reason: format!("`{}` as {} :: {}", value, std::any::type_name::<T>(), e),
            })
        })
        .transpose()
}
