use std::{borrow::Cow, fmt::Display};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::InvalidKeyData;

/// Names a group of entries that are flushed together.
#[cfg(feature = "tracing")]
pub trait Tag: std::fmt::Debug {
    fn id(&self) -> &str;
}

#[cfg(not(feature = "tracing"))]
pub trait Tag {
    fn id(&self) -> &str;
}

/// Identifies a cached item: the tag groups it belongs to, a human readable
/// tagged key and the canonical key the store is actually queried with.
///
/// Any field may be missing when the descriptor is assembled piecemeal (or
/// deserialized). [`CacheKey::validate`] is the only way to obtain the view
/// the store operates on, so an incomplete descriptor never reaches it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheKey {
    pub tags: Option<Vec<String>>,
    pub key_with_tag: Option<String>,
    pub params_key: Option<String>,
}

/// A validated [`CacheKey`].
#[derive(Debug, Clone, Copy)]
pub struct ValidKey<'a> {
    pub tags: &'a [String],
    pub key_with_tag: &'a str,
    pub params_key: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyField {
    Tags,
    KeyWithTag,
    ParamsKey,
}

impl CacheKey {
    pub fn new<T: Tag>(tags: impl IntoIterator<Item = T>, params: impl Display) -> Self {
        let tags = tag_ids(tags);
        let params_key = params.to_string();

        Self {
            key_with_tag: Some(with_tags(&tags, &params_key)),
            tags: Some(tags),
            params_key: Some(params_key),
        }
    }

    /// Derives the params key from the JSON form of `params` so that equal
    /// parameter sets always land on the same key.
    pub fn for_params<T: Tag, P: Serialize + ?Sized>(
        tags: impl IntoIterator<Item = T>,
        prefix: &str,
        params: &P,
    ) -> Result<Self, serde_json::Error> {
        let tags = tag_ids(tags);
        let json = serde_json::to_string(params)?;
        let digest = Sha256::digest(json.as_bytes());

        Ok(Self {
            key_with_tag: Some(with_tags(&tags, &format!("{}:{}", prefix, json))),
            tags: Some(tags),
            params_key: Some(format!("{}:{:x}", prefix, digest)),
        })
    }

    pub fn validate(&self) -> Result<ValidKey<'_>, InvalidKeyData> {
        let tags = self
            .tags
            .as_deref()
            .filter(|tags| !tags.is_empty())
            .ok_or(InvalidKeyData(KeyField::Tags))?;
        let key_with_tag = self
            .key_with_tag
            .as_deref()
            .ok_or(InvalidKeyData(KeyField::KeyWithTag))?;
        let params_key = self
            .params_key
            .as_deref()
            .ok_or(InvalidKeyData(KeyField::ParamsKey))?;

        Ok(ValidKey {
            tags,
            key_with_tag,
            params_key,
        })
    }
}

fn tag_ids<T: Tag>(tags: impl IntoIterator<Item = T>) -> Vec<String> {
    tags.into_iter().map(|tag| tag.id().to_string()).collect()
}

fn with_tags(tags: &[String], tail: &str) -> String {
    tags.iter()
        .map(String::as_str)
        .chain([tail])
        .collect::<Vec<_>>()
        .join(":")
}

impl Display for KeyField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyField::Tags => write!(f, "tags"),
            KeyField::KeyWithTag => write!(f, "key_with_tag"),
            KeyField::ParamsKey => write!(f, "params_key"),
        }
    }
}

impl Tag for String {
    fn id(&self) -> &str {
        self
    }
}

impl Tag for &String {
    fn id(&self) -> &str {
        self
    }
}

impl Tag for &str {
    fn id(&self) -> &str {
        self
    }
}

impl Tag for Cow<'_, str> {
    fn id(&self) -> &str {
        self
    }
}
