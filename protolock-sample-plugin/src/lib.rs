//! Sample protolock plugin.
//!
//! Reports two fixed warnings against the first definition of the updated
//! lock. Useful for checking that a host wires plugins up correctly: a host
//! that fails builds on plugin warnings should always fail with it.

use protolock_plugin_sdk::prelude::*;
use tracing::debug;

pub const FIRST_WARNING: &str = "A sample warning!";
pub const SECOND_WARNING: &str = "Another sample warning.. ah!";
pub const NO_DEFINITIONS: &str = "updated lock has no definitions to inspect";

/// Warnings the sample plugin reports for a pair of snapshots.
pub fn sample_warnings(_current: &Protolock, updated: &Protolock) -> Vec<Warning> {
    let Some(first) = updated.definitions.first() else {
        return vec![Warning::new("", NO_DEFINITIONS)];
    };
    let filepath = os_path(&first.filepath);
    vec![
        Warning::new(filepath.clone(), FIRST_WARNING),
        Warning::new(filepath, SECOND_WARNING),
    ]
}

/// [`Process`] implementation backing the `protolock-sample-plugin` binary.
#[derive(Debug, Default)]
pub struct SampleCheck;

impl Process for SampleCheck {
    fn process(&mut self, current: &Protolock, updated: Protolock) -> Processed {
        let warnings = sample_warnings(current, &updated);
        debug!(count = warnings.len(), "Sample warnings generated");
        Processed::with_warnings(updated, warnings)
    }
}
