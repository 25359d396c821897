//! The plugin exchange payload.

use crate::lock::{Protolock, null_as_empty};
use crate::warning::Warning;
use crate::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Unit sent from host to plugin and back.
///
/// Each side owns its own decoded copy. `plugin_warnings` is append-only:
/// a plugin returns every warning it received, in order, followed by its own.
///
/// Keys this type does not model are kept in `extra` and written back
/// unchanged. Alias spellings and `null` lists decode fine but are written
/// back in canonical form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Data {
    /// Previously accepted lock state.
    pub current: Protolock,
    /// Proposed lock state.
    pub updated: Protolock,
    /// Warnings accumulated by plugins invoked so far.
    #[serde(
        rename = "pluginWarnings",
        alias = "plugin_warnings",
        default,
        deserialize_with = "null_as_empty"
    )]
    pub plugin_warnings: Vec<Warning>,
    /// The host's own rule findings, passed through as read-only context.
    #[serde(
        rename = "protolockWarnings",
        alias = "protolock_warnings",
        alias = "warnings",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub protolock_warnings: Option<Vec<Warning>>,
    /// Any other top-level keys.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Data {
    pub fn new(current: Protolock, updated: Protolock) -> Self {
        Self {
            current,
            updated,
            ..Self::default()
        }
    }

    /// Seeds the payload with warnings from earlier plugins.
    pub fn with_plugin_warnings(mut self, warnings: Vec<Warning>) -> Self {
        self.plugin_warnings = warnings;
        self
    }

    /// Attaches the host's own findings.
    pub fn with_protolock_warnings(mut self, warnings: Vec<Warning>) -> Self {
        self.protolock_warnings = Some(warnings);
        self
    }

    /// The host's own findings, empty when the host sent none.
    pub fn protolock_warnings(&self) -> &[Warning] {
        self.protolock_warnings.as_deref().unwrap_or_default()
    }

    /// Appends warnings after any already present.
    pub fn append_warnings(&mut self, warnings: impl IntoIterator<Item = Warning>) {
        self.plugin_warnings.extend(warnings);
    }

    /// Returns true if `self.plugin_warnings` begins with every warning in
    /// `earlier`, in the same order.
    pub fn preserves_warnings_of(&self, earlier: &Data) -> bool {
        self.plugin_warnings.starts_with(&earlier.plugin_warnings)
    }

    /// Decodes a payload from its JSON encoding.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Encodes the payload as JSON.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}
