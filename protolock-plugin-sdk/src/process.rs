//! Strategy-style plugin logic.

use protolock_types::{Data, Protolock, Warning};

/// Output of one [`Process::process`] call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Processed {
    /// Snapshot to hand back as `updated`.
    pub updated: Protolock,
    /// Warnings to append after the ones already in the payload.
    pub warnings: Vec<Warning>,
}

impl Processed {
    /// Returns `updated` untouched with no warnings.
    pub fn unchanged(updated: Protolock) -> Self {
        Self {
            updated,
            warnings: Vec::new(),
        }
    }

    pub fn with_warnings(updated: Protolock, warnings: Vec<Warning>) -> Self {
        Self { updated, warnings }
    }
}

/// Inspection logic run against a pair of lock snapshots.
///
/// Implementors never see the payload's warning list, so they cannot drop or
/// reorder warnings from earlier plugins; [`apply`] appends theirs at the end.
/// Errors inside the logic should be reported as warnings.
pub trait Process {
    fn process(&mut self, current: &Protolock, updated: Protolock) -> Processed;
}

/// Runs `process` over a decoded payload and folds its output back in.
pub fn apply<P: Process + ?Sized>(process: &mut P, mut data: Data) -> Data {
    let updated = std::mem::take(&mut data.updated);
    let out = process.process(&data.current, updated);
    data.updated = out.updated;
    data.append_warnings(out.warnings);
    data
}
