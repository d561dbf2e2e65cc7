//! The filesystem-operations handle.
//!
//! [`Fs`] holds no mutable state. It bundles configuration with the three
//! seams every operation goes through: the mount-table source, the process
//! runner, and the per-entry scan callback. Operations are implemented in
//! the sibling modules as further `impl Fs` blocks.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use mountkit_common::config::FsConfig;
use mountkit_common::error::Result;
use mountkit_common::types::Info;

use crate::mountinfo::{self, Entry, ScanEntryFn};
use crate::runner::{CommandRunner, SystemRunner};
use crate::table::{FileMountTable, MountTableSource};

/// Handle for mount-table inspection and mount/format operations.
///
/// Cloning is cheap and clones share their runner, table source, and scan
/// callback. The handle may be used from several threads at once; it adds
/// no locking of its own.
#[derive(Clone)]
pub struct Fs {
    pub(crate) config: FsConfig,
    pub(crate) runner: Arc<dyn CommandRunner>,
    pub(crate) table: Arc<dyn MountTableSource>,
    pub(crate) scan_entry: Arc<ScanEntryFn>,
}

impl Fs {
    /// Creates a handle with the default configuration, running real host
    /// utilities against `/proc/self/mountinfo`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(FsConfig::default())
    }

    /// Creates a handle with `config`, running real host utilities.
    #[must_use]
    pub fn with_config(config: FsConfig) -> Self {
        let table = Arc::new(FileMountTable::new(config.mountinfo_path.clone()));
        Self {
            config,
            runner: Arc::new(SystemRunner::new()),
            table,
            scan_entry: Arc::new(mountinfo::default_scan_entry),
        }
    }

    /// Replaces the process runner.
    #[must_use]
    pub fn with_runner(mut self, runner: impl CommandRunner + 'static) -> Self {
        self.runner = Arc::new(runner);
        self
    }

    /// Replaces the mount-table source.
    #[must_use]
    pub fn with_mount_table(mut self, table: impl MountTableSource + 'static) -> Self {
        self.table = Arc::new(table);
        self
    }

    /// Replaces the per-entry scan callback.
    #[must_use]
    pub fn with_scan_entry<F>(mut self, scan: F) -> Self
    where
        F: Fn(&Entry, &mut HashMap<String, Entry>) -> Result<Option<Info>> + Send + Sync + 'static,
    {
        self.scan_entry = Arc::new(scan);
        self
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &FsConfig {
        &self.config
    }
}

impl Default for Fs {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Fs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fs")
            .field("config", &self.config)
            .field("mount_table", &self.table.location())
            .finish_non_exhaustive()
    }
}
