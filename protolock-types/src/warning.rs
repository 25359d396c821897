//! Plugin warnings.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A non-fatal finding tied to a file, reported by a plugin.
///
/// Warnings have no severity or code: whether any warning fails the build is
/// decided by the host. Keys other than `filepath` and `message` (such as
/// protolock's `rulename`) are carried in `extra` untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub filepath: String,
    pub message: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Warning {
    /// Creates a new warning.
    pub fn new(filepath: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            filepath: filepath.into(),
            message: message.into(),
            extra: Map::new(),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.filepath, self.message)
    }
}
