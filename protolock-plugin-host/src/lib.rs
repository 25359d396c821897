//! Host side of the protolock plugin exchange.
//!
//! Spawns plugin executables, hands each one the JSON payload on stdin,
//! enforces a per-plugin deadline, and chains plugins so every one sees the
//! warnings of those before it. Whether warnings fail a build is left to the
//! caller via [`Report::passed`].

mod chain;
mod config;
mod error;
mod runner;

pub use chain::{PluginChain, Report};
pub use config::{DEFAULT_CONFIG_FILE, DEFAULT_TIMEOUT_MS, HostConfig, PluginSpec};
pub use error::PluginHostError;
pub use runner::invoke;
