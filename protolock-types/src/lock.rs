//! Lock file snapshots.
//!
//! Only the file path of a definition is modeled. Every other key (the
//! definition body, package info, lock metadata) is kept as raw JSON so a
//! snapshot decodes and re-encodes without losing anything.

use crate::path::os_path;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;

/// One schema construct recorded in a lock file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    /// Path relative to the proto root, as recorded in the lock file.
    #[serde(alias = "protopath")]
    pub filepath: String,
    /// Opaque structural fields.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Definition {
    /// Creates a definition with no structural fields.
    pub fn new(filepath: impl Into<String>) -> Self {
        Self {
            filepath: filepath.into(),
            fields: Map::new(),
        }
    }

    /// Adds an opaque structural field.
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.fields.insert(key.into(), value);
        self
    }

    /// Returns the definition's path in native filesystem form.
    #[must_use]
    pub fn os_path(&self) -> PathBuf {
        PathBuf::from(os_path(&self.filepath))
    }
}

/// The state of a lock file at one revision.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Protolock {
    /// Definitions in lock-file order.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub definitions: Vec<Definition>,
    /// Any other lock metadata.
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl Protolock {
    pub fn new(definitions: Vec<Definition>) -> Self {
        Self {
            definitions,
            metadata: Map::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// Hosts written in Go encode empty slices as `null`.
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
