//! Persistence configuration
//!
//! Mirrors the `{ "storageKey": ..., "keysToSave": [...] }` shape so a config
//! can be written in code or loaded from JSON.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{PersistError, Result};

/// Location of a value inside a state tree.
///
/// A `Field` is looked up literally, dots included. Only `Nested` descends.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyPath {
    /// Top-level property, e.g. `"somestate"` or `"dotted.prop"`
    Field(String),
    /// Property reached by descending through each segment in turn
    Nested(Vec<String>),
}

impl KeyPath {
    pub fn field(name: impl Into<String>) -> Self {
        KeyPath::Field(name.into())
    }

    pub fn nested<I, T>(segments: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        KeyPath::Nested(segments.into_iter().map(Into::into).collect())
    }

    /// Split a dotted string into a nested path (`"a.b"` -> `["a", "b"]`).
    ///
    /// Use this when dot-separated addressing is wanted; a plain `&str` stays
    /// a single literal field.
    pub fn dotted(path: &str) -> Self {
        KeyPath::Nested(path.split('.').map(str::to_owned).collect())
    }

    /// Lookup segments in order
    pub fn segments(&self) -> &[String] {
        match self {
            KeyPath::Field(name) => std::slice::from_ref(name),
            KeyPath::Nested(segments) => segments,
        }
    }

    /// Key used for this path in the persisted record
    pub fn canonical(&self) -> String {
        match self {
            KeyPath::Field(name) => name.clone(),
            KeyPath::Nested(segments) => segments.join(","),
        }
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyPath::Field(name) => f.write_str(name),
            KeyPath::Nested(segments) => f.write_str(&segments.join(",")),
        }
    }
}

impl From<&str> for KeyPath {
    fn from(name: &str) -> Self {
        KeyPath::Field(name.to_owned())
    }
}

impl From<String> for KeyPath {
    fn from(name: String) -> Self {
        KeyPath::Field(name)
    }
}

impl From<Vec<&str>> for KeyPath {
    fn from(segments: Vec<&str>) -> Self {
        KeyPath::nested(segments)
    }
}

impl From<Vec<String>> for KeyPath {
    fn from(segments: Vec<String>) -> Self {
        KeyPath::Nested(segments)
    }
}

impl<const N: usize> From<[&str; N]> for KeyPath {
    fn from(segments: [&str; N]) -> Self {
        KeyPath::nested(segments)
    }
}

/// What to persist and where
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistConfig {
    /// Record key in the durable store
    pub storage_key: String,
    /// Paths to persist; `None` persists the whole state
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keys_to_save: Option<Vec<KeyPath>>,
}

impl PersistConfig {
    /// Persist the whole state under `storage_key`
    pub fn new(storage_key: impl Into<String>) -> Self {
        Self {
            storage_key: storage_key.into(),
            keys_to_save: None,
        }
    }

    /// Restrict persistence to the given paths, in order
    pub fn with_keys<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<KeyPath>,
    {
        self.keys_to_save = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| PersistError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configs that cannot address a record or a value
    pub fn validate(&self) -> Result<()> {
        if self.storage_key.is_empty() {
            return Err(PersistError::Config("storageKey must not be empty".into()));
        }
        if let Some(keys) = &self.keys_to_save {
            if let Some(pos) = keys.iter().position(|k| k.segments().is_empty()) {
                return Err(PersistError::Config(format!(
                    "keysToSave[{pos}] is an empty path"
                )));
            }
        }
        Ok(())
    }
}
