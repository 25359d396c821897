//! Guest SDK for building protolock plugins.
//!
//! A plugin is a standalone executable that protolock spawns once per check.
//! The host writes a JSON [`Data`] payload (the current and updated lock
//! snapshots plus any warnings collected so far) to the plugin's stdin and
//! reads the returned payload from its stdout. This crate owns that exchange
//! so plugin authors only write the inspection logic.
//!
//! # Example
//!
//! ```no_run
//! use protolock_plugin_sdk::prelude::*;
//! use std::process::ExitCode;
//!
//! fn main() -> ExitCode {
//!     Plugin::new("no-deletions").init(|mut data| {
//!         if data.updated.definitions.len() < data.current.definitions.len() {
//!             data.append_warnings([Warning::new("", "a definition was removed")]);
//!         }
//!         data
//!     })
//! }
//! ```
//!
//! Exit status is `0` whenever the payload was decoded and a result written,
//! no matter how many warnings it holds. Transport failures exit non-zero and
//! print one diagnostic line, tagged with the plugin name, to stderr.

mod error;
mod plugin;
pub mod prelude;
mod process;

pub use error::PluginError;
pub use plugin::{Plugin, Stage};
pub use process::{Process, Processed, apply};

pub use protolock_types::{Data, Definition, Protolock, Warning, os_path};
