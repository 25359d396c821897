//! Error types for the plugin runtime.

use crate::plugin::Stage;
use thiserror::Error;

/// Transport failures of one plugin exchange.
///
/// Every variant carries the name the plugin was created with so the host
/// can tell which plugin produced a diagnostic.
#[derive(Debug, Error)]
pub enum PluginError {
    #[error("[protolock:plugin:{plugin}] failed to read payload: {source}")]
    Read {
        plugin: String,
        #[source]
        source: std::io::Error,
    },

    #[error("[protolock:plugin:{plugin}] failed to decode payload: {source}")]
    Decode {
        plugin: String,
        #[source]
        source: protolock_types::Error,
    },

    #[error(
        "[protolock:plugin:{plugin}] result must keep the {expected} incoming plugin warning(s) in order"
    )]
    ContractViolation { plugin: String, expected: usize },

    #[error("[protolock:plugin:{plugin}] failed to encode result: {source}")]
    Encode {
        plugin: String,
        #[source]
        source: protolock_types::Error,
    },

    #[error("[protolock:plugin:{plugin}] failed to write result: {source}")]
    Write {
        plugin: String,
        #[source]
        source: std::io::Error,
    },
}

impl PluginError {
    /// Name of the plugin that failed.
    pub fn plugin(&self) -> &str {
        match self {
            Self::Read { plugin, .. }
            | Self::Decode { plugin, .. }
            | Self::ContractViolation { plugin, .. }
            | Self::Encode { plugin, .. }
            | Self::Write { plugin, .. } => plugin,
        }
    }

    /// Stage the exchange was in when it failed.
    pub fn stage(&self) -> Stage {
        match self {
            Self::Read { .. } | Self::Decode { .. } => Stage::Decoding,
            Self::ContractViolation { .. } | Self::Encode { .. } | Self::Write { .. } => {
                Stage::Encoding
            }
        }
    }
}
