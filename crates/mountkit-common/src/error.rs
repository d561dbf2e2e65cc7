//! Unified error types for the mountkit workspace.
//!
//! Every fallible operation in the workspace returns [`MountkitError`].
//! Variants are shaped so callers can tell a changing mount table apart from
//! an unreadable one, and a genuine mount failure apart from a device that
//! already carries a different filesystem.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum MountkitError {
    /// An I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The mount table kept changing while it was being read.
    #[error("failed to get a consistent snapshot of {path} after {retries} tries")]
    InconsistentSnapshot {
        /// Mount table that was being read.
        path: PathBuf,
        /// Number of re-reads attempted.
        retries: u32,
    },

    /// A row of the mount table could not be parsed.
    #[error("malformed mount table entry {line:?}: {message}")]
    MountInfo {
        /// The offending row.
        line: String,
        /// What was wrong with it.
        message: String,
    },

    /// An external utility could not be started at all.
    #[error("failed to run {program}: {source}")]
    Spawn {
        /// Program that could not be started.
        program: String,
        /// Underlying I/O error from the spawn.
        source: std::io::Error,
    },

    /// Formatting a device failed.
    #[error("{program} failed on {device}: {message}")]
    Format {
        /// Format utility that was invoked.
        program: String,
        /// Device that was being formatted.
        device: String,
        /// Diagnostic reported by the utility.
        message: String,
    },

    /// The mount utility reported a failure.
    #[error("mount of {device} on {target} failed: {message}")]
    Mount {
        /// Device or directory being mounted.
        device: String,
        /// Mount point.
        target: String,
        /// Diagnostic reported by the utility.
        message: String,
    },

    /// A mount failed on a device that already carries a different filesystem
    /// than the one requested.
    #[error("failed to mount volume as {requested:?}; already contains {existing}: error: {source}")]
    FsTypeMismatch {
        /// Filesystem type the caller asked for.
        requested: String,
        /// Filesystem type found on the device.
        existing: String,
        /// The mount failure that triggered the check.
        source: Box<MountkitError>,
    },

    /// The unmount utility reported a failure.
    #[error("unmount of {target} failed: {message}")]
    Unmount {
        /// Mount point being detached.
        target: String,
        /// Diagnostic reported by the utility.
        message: String,
    },

    /// A configuration value is invalid.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid configuration.
        message: String,
    },

    /// Serialization or deserialization failed.
    #[error("serialization error: {source}")]
    Serialization {
        /// Underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}

impl MountkitError {
    /// Returns `true` if retrying the whole operation later may succeed.
    ///
    /// Only a mount table that changed on every read qualifies; format and
    /// mount failures are left to the caller's own policy.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::InconsistentSnapshot { .. })
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, MountkitError>;
