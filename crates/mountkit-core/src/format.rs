//! Format-and-mount of block devices.
//!
//! A device is formatted only when the probe finds no filesystem on it. A
//! device that already carries a filesystem is never reformatted; if it then
//! fails to mount as the requested type, the failure is reported as a type
//! mismatch rather than as a plain mount error.

use mountkit_common::constants::{
    DEFAULT_MOUNT_OPT, FORCE_FORMAT_FLAG, FORCE_FORMAT_FS_TYPES, MKFS_PREFIX,
};
use mountkit_common::error::{MountkitError, Result};

use crate::fs::Fs;

/// Name of the format utility for `fs_type`, e.g. `mkfs.ext4`.
#[must_use]
pub fn mkfs_program(fs_type: &str) -> String {
    format!("{MKFS_PREFIX}{fs_type}")
}

/// Arguments for the format utility. `ext4` and `ext3` need `-F` to format
/// a whole device without prompting.
#[must_use]
pub fn make_format_args(device: &str, fs_type: &str) -> Vec<String> {
    if FORCE_FORMAT_FS_TYPES.contains(&fs_type) {
        vec![FORCE_FORMAT_FLAG.to_string(), device.to_string()]
    } else {
        vec![device.to_string()]
    }
}

impl Fs {
    /// Ensures `source` is mounted on `target`, formatting it first if it
    /// carries no filesystem.
    ///
    /// `fs_type` may be empty: a blank device is then formatted with the
    /// configured default type, and a formatted device is mounted letting
    /// the mount utility detect its type. `defaults` is appended to `opts`.
    ///
    /// # Errors
    ///
    /// - `MountkitError::Spawn` if the probe utility cannot be started.
    /// - `MountkitError::Format` if formatting a blank device fails.
    /// - `MountkitError::FsTypeMismatch` if the device already holds a
    ///   filesystem other than the requested one and the mount fails.
    /// - Otherwise the mount error, unchanged.
    pub fn format_and_mount(
        &self,
        source: &str,
        target: &str,
        fs_type: &str,
        opts: &[String],
    ) -> Result<()> {
        let mut opts = opts.to_vec();
        opts.push(DEFAULT_MOUNT_OPT.to_string());

        let existing = self.get_disk_format(source)?;

        if existing.is_empty() {
            let fs_type = if fs_type.is_empty() {
                self.config.default_fs_type.as_str()
            } else {
                fs_type
            };
            self.format(source, fs_type)?;
            return self.mount(source, target, fs_type, &opts);
        }

        tracing::info!(
            source,
            target,
            fs_type,
            existing_fs_type = %existing,
            ?opts,
            "attempting to mount disk"
        );
        match self.mount(source, target, fs_type, &opts) {
            Ok(()) => Ok(()),
            Err(err) if fs_type.is_empty() || fs_type == existing => Err(err),
            Err(err) => {
                tracing::error!(
                    source,
                    requested = fs_type,
                    existing = %existing,
                    "disk is formatted with an unexpected filesystem"
                );
                Err(MountkitError::FsTypeMismatch {
                    requested: fs_type.to_string(),
                    existing,
                    source: Box::new(err),
                })
            }
        }
    }

    fn format(&self, device: &str, fs_type: &str) -> Result<()> {
        let program = mkfs_program(fs_type);
        let args = make_format_args(device, fs_type);
        tracing::info!(device, fs_type, ?args, "disk appears unformatted, attempting format");

        let failed = |message: String| {
            tracing::error!(device, fs_type, %message, "format of disk failed");
            MountkitError::Format {
                program: program.clone(),
                device: device.to_string(),
                message,
            }
        };

        let output = self
            .runner
            .run(&program, &args)
            .map_err(|e| failed(e.to_string()))?;
        if !output.success() {
            return Err(failed(output.diagnostic()));
        }

        tracing::info!(device, fs_type, "disk successfully formatted");
        Ok(())
    }
}
