//! Error types for the plugin host.

use std::process::ExitStatus;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PluginHostError {
    #[error("failed to start plugin '{plugin_id}': {source}")]
    Spawn {
        plugin_id: String,
        #[source]
        source: std::io::Error,
    },

    #[error("i/o error talking to plugin '{plugin_id}': {source}")]
    Io {
        plugin_id: String,
        #[source]
        source: std::io::Error,
    },

    #[error("timeout: plugin '{plugin_id}' exceeded {timeout_ms}ms deadline")]
    Timeout { plugin_id: String, timeout_ms: u64 },

    #[error("plugin '{plugin_id}' failed with {status}: {stderr}")]
    PluginFailed {
        plugin_id: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("plugin '{plugin_id}' returned an unreadable payload: {source}")]
    InvalidResponse {
        plugin_id: String,
        #[source]
        source: protolock_types::Error,
    },

    #[error("plugin '{plugin_id}' dropped or reordered earlier plugin warnings")]
    ContractViolation { plugin_id: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] protolock_types::Error),

    #[error("invalid plugin config: {0}")]
    Config(String),
}
