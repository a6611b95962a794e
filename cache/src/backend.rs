use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::UnknownCacheBackend;

/// The cache backends a deployment can be configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Array,
    Apc,
    Database,
    DynamoDb,
    File,
    Memcached,
    Null,
    Octane,
    Redis,
}

impl Backend {
    pub const ALL: [Backend; 9] = [
        Backend::Array,
        Backend::Apc,
        Backend::Database,
        Backend::DynamoDb,
        Backend::File,
        Backend::Memcached,
        Backend::Null,
        Backend::Octane,
        Backend::Redis,
    ];

    /// Whether the backend indexes entries by tag, which a tag scoped flush
    /// needs. File, database and dynamodb stores can only flush everything.
    pub fn supports_tags(self) -> bool {
        !matches!(self, Backend::File | Backend::Database | Backend::DynamoDb)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Backend::Array => "array",
            Backend::Apc => "apc",
            Backend::Database => "database",
            Backend::DynamoDb => "dynamodb",
            Backend::File => "file",
            Backend::Memcached => "memcached",
            Backend::Null => "null",
            Backend::Octane => "octane",
            Backend::Redis => "redis",
        }
    }
}

impl FromStr for Backend {
    type Err = UnknownCacheBackend;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Backend::ALL
            .into_iter()
            .find(|backend| backend.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| UnknownCacheBackend(name.to_string()))
    }
}

impl Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
