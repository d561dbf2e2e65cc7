//! Domain primitive types used across the mountkit workspace.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One mounted filesystem, as reported by the mount table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Info {
    /// Device or pseudo-device backing the mount (the mount source).
    pub device: String,
    /// Mount point.
    pub path: String,
    /// Where the mounted tree comes from. For a bind mount this is the
    /// directory that was bound, otherwise it equals `device`.
    pub source: String,
    /// Filesystem type.
    #[serde(rename = "type")]
    pub fs_type: String,
    /// Per-mount options, in table order.
    pub opts: Vec<String>,
}

impl Info {
    /// Returns `true` if `opt` appears among the mount options.
    #[must_use]
    pub fn has_opt(&self, opt: &str) -> bool {
        self.opts.iter().any(|o| o == opt)
    }

    /// Returns `true` if the mount is read-only.
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.has_opt("ro")
    }
}

impl fmt::Display for Info {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} on {} type {} ({})",
            self.device,
            self.path,
            self.fs_type,
            self.opts.join(",")
        )
    }
}
