//! Filesystem detection on block devices.

use mountkit_common::error::Result;

use crate::fs::Fs;

impl Fs {
    /// Returns the filesystem type on `disk`, or an empty string if the
    /// device carries no recognisable filesystem.
    ///
    /// A probe utility that runs and exits non-zero (blkid exits 2 when it
    /// finds no signature) means "unformatted" and is not an error.
    ///
    /// # Errors
    ///
    /// Returns `MountkitError::Spawn` if the probe utility cannot be started,
    /// for example because it is not installed. That case is deliberately
    /// not reported as an unformatted device.
    pub fn get_disk_format(&self, disk: &str) -> Result<String> {
        let program = self.config.probe_program.as_str();
        let args = probe_args(disk);
        tracing::info!(disk, ?args, "checking if disk is formatted using {program}");

        let output = self.runner.run(program, &args)?;
        tracing::debug!(disk, output = %output.stdout, "{program} output");

        if !output.success() {
            tracing::info!(
                disk,
                exit_code = output.exit_code,
                stderr = %output.stderr.trim(),
                "no filesystem found on disk"
            );
            return Ok(String::new());
        }

        let fs_type = output.stdout.trim();
        if fs_type.is_empty() {
            tracing::info!(disk, "disk is unformatted");
        } else {
            tracing::info!(disk, fs_type, "disk is already formatted");
        }
        Ok(fs_type.to_string())
    }
}

/// Arguments asking the probe for exactly the `TYPE` attribute of `disk`.
#[must_use]
pub fn probe_args(disk: &str) -> Vec<String> {
    ["-s", "TYPE", "-o", "value", disk]
        .iter()
        .map(ToString::to_string)
        .collect()
}
