//! Mount-table reads and consistent snapshots.
//!
//! The kernel rewrites the mount table whenever anything is mounted or
//! unmounted, and a read can straddle such a change. [`Fs::get_mounts`]
//! therefore re-reads the table until two consecutive reads have the same
//! fingerprint, giving up after a bounded number of attempts.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use mountkit_common::error::{MountkitError, Result};
use mountkit_common::types::Info;

use crate::fs::Fs;
use crate::mountinfo;

/// A readable mount table that can be opened and read repeatedly.
pub trait MountTableSource: Send + Sync {
    /// Where the table lives, used in diagnostics.
    fn location(&self) -> &Path;

    /// Opens a fresh stream over the current table contents.
    ///
    /// # Errors
    ///
    /// Returns the I/O error raised while opening the table.
    fn open(&self) -> std::io::Result<Box<dyn Read + Send>>;
}

/// Mount table backed by a file such as `/proc/self/mountinfo`.
#[derive(Debug, Clone)]
pub struct FileMountTable {
    path: PathBuf,
}

impl FileMountTable {
    /// Creates a source reading `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl MountTableSource for FileMountTable {
    fn location(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> std::io::Result<Box<dyn Read + Send>> {
        Ok(Box::new(File::open(&self.path)?))
    }
}

impl Fs {
    /// Returns every mounted filesystem kept by the scan callback, taken from
    /// a mount table that did not change while it was read.
    ///
    /// # Errors
    ///
    /// Returns `MountkitError::Io` if any read fails, a parse or scan error
    /// if a row is rejected, or `MountkitError::InconsistentSnapshot` if the
    /// table changed between every pair of reads.
    pub fn get_mounts(&self) -> Result<Vec<Info>> {
        let retries = self.config.snapshot_retries.max(1);
        let (_, mut previous) = self.read_proc_mounts(false)?;

        for attempt in 1..=retries {
            let (mounts, current) = self.read_proc_mounts(true)?;
            if current == previous {
                tracing::debug!(attempt, count = mounts.len(), "mount table snapshot is consistent");
                return Ok(mounts);
            }
            tracing::debug!(
                attempt,
                previous,
                current,
                "mount table changed during read, retrying"
            );
            previous = current;
        }

        tracing::warn!(
            path = %self.table.location().display(),
            retries,
            "mount table never settled"
        );
        Err(MountkitError::InconsistentSnapshot {
            path: self.table.location().to_path_buf(),
            retries,
        })
    }

    /// Returns the mounts whose device is `device`.
    ///
    /// Symlinked device paths such as `/dev/disk/by-id/...` are resolved
    /// before comparing; a path that cannot be resolved is compared as given.
    ///
    /// # Errors
    ///
    /// Returns any error from [`Fs::get_mounts`].
    pub fn get_dev_mounts(&self, device: &str) -> Result<Vec<Info>> {
        let wanted = resolve_device(device);
        let mounts = self.get_mounts()?;
        Ok(mounts
            .into_iter()
            .filter(|m| m.device == device || resolve_device(&m.device) == wanted)
            .collect())
    }

    /// Returns `true` if something is mounted at `target`.
    ///
    /// # Errors
    ///
    /// Returns any error from [`Fs::get_mounts`].
    pub fn is_mounted(&self, target: &str) -> Result<bool> {
        let target = target.trim_end_matches('/');
        let target = if target.is_empty() { "/" } else { target };
        Ok(self.get_mounts()?.iter().any(|m| m.path == target))
    }

    /// Reads the whole table once, returning its fingerprint and, when
    /// `parse` is set, the entries kept by the scan callback.
    ///
    /// The stream is dropped before returning on every path.
    pub(crate) fn read_proc_mounts(&self, parse: bool) -> Result<(Vec<Info>, u32)> {
        let location = self.table.location();
        let stream = self.table.open().map_err(|source| MountkitError::Io {
            path: location.to_path_buf(),
            source,
        })?;

        mountinfo::read_proc_mounts_from(
            stream,
            !parse,
            self.config.min_fields,
            self.scan_entry.as_ref(),
        )
        .map_err(|err| match err {
            MountkitError::Io { source, .. } => MountkitError::Io {
                path: location.to_path_buf(),
                source,
            },
            other => other,
        })
    }
}

fn resolve_device(device: &str) -> String {
    std::fs::canonicalize(device)
        .map_or_else(|_| device.to_string(), |p| p.to_string_lossy().into_owned())
}
