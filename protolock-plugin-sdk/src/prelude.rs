//! Everything a plugin `main` usually needs.

pub use crate::{Plugin, Process, Processed};
pub use protolock_types::{Data, Definition, Protolock, Warning, os_path};
