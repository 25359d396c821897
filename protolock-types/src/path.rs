//! Conversion between lock-recorded paths and native filesystem paths.

use std::path::MAIN_SEPARATOR;

/// Separator protolock writes into lock files in place of the platform
/// separator, so lock files compare equal across operating systems.
pub const PROTOPATH_SEPARATOR: &str = ":/:";

/// Converts a path as recorded in a lock file into the native form for the
/// current operating system.
///
/// Accepts any string. Already-native input passes through unchanged, and
/// the result never contains [`PROTOPATH_SEPARATOR`], so applying it twice
/// gives the same result as applying it once.
#[must_use]
pub fn os_path(path: &str) -> String {
    let mut out = path.to_owned();
    // A single pass can splice a new separator out of the pieces around a
    // replaced one (e.g. "::/::"), so repeat until none remain.
    while out.contains(PROTOPATH_SEPARATOR) {
        out = out.replace(PROTOPATH_SEPARATOR, "/");
    }
    if MAIN_SEPARATOR != '/' {
        out = out.replace('/', &MAIN_SEPARATOR.to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_path_is_empty() {
        assert_eq!(os_path(""), "");
    }

    #[test]
    fn spliced_separator_is_also_replaced() {
        let once = os_path("::/::");
        assert!(!once.contains(PROTOPATH_SEPARATOR));
        assert_eq!(os_path(&once), once);
    }
}
