//! Core type definitions for protolock plugins.
//!
//! This crate defines the values exchanged between the protolock host and a
//! plugin process:
//! - Lock snapshots (`Protolock`) and the definitions they record
//! - Plugin warnings (file path + message)
//! - The exchange payload (`Data`) carrying both snapshots and warnings
//!
//! Schema semantics (messages, enums, fields) are deliberately opaque here:
//! anything beyond a definition's file path is carried through untouched.

mod data;
mod lock;
mod path;
mod warning;

pub use data::Data;
pub use lock::{Definition, Protolock};
pub use path::{PROTOPATH_SEPARATOR, os_path};
pub use warning::Warning;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while encoding or decoding exchange payloads.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
