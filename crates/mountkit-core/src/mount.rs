//! Mount, unmount, and bind-mount through the host utilities.

use mountkit_common::constants::{BIND_OPT, BIND_REMOUNT_OPTS};
use mountkit_common::error::{MountkitError, Result};

use crate::fs::Fs;

/// Builds `mount` arguments: `[-t fs_type] [-o opt,opt] source target`.
///
/// The type flag is omitted when `fs_type` is empty and the option flag when
/// no non-empty option is given.
#[must_use]
pub fn make_mount_args(source: &str, target: &str, fs_type: &str, opts: &[String]) -> Vec<String> {
    let mut args = Vec::with_capacity(6);
    if !fs_type.is_empty() {
        args.push("-t".to_string());
        args.push(fs_type.to_string());
    }
    let joined = opts
        .iter()
        .map(|o| o.trim())
        .filter(|o| !o.is_empty())
        .collect::<Vec<_>>()
        .join(",");
    if !joined.is_empty() {
        args.push("-o".to_string());
        args.push(joined);
    }
    args.push(source.to_string());
    args.push(target.to_string());
    args
}

impl Fs {
    /// Mounts `source` on `target`.
    ///
    /// # Errors
    ///
    /// Returns `MountkitError::Spawn` if the mount utility cannot be started,
    /// or `MountkitError::Mount` carrying its diagnostic if it exits non-zero.
    pub fn mount(&self, source: &str, target: &str, fs_type: &str, opts: &[String]) -> Result<()> {
        let program = self.config.mount_program.as_str();
        let args = make_mount_args(source, target, fs_type, opts);
        tracing::info!(source, target, fs_type, ?opts, "mounting");

        let output = self.runner.run(program, &args)?;
        if !output.success() {
            let message = output.diagnostic();
            tracing::error!(source, target, ?args, %message, "mount failed");
            return Err(MountkitError::Mount {
                device: source.to_string(),
                target: target.to_string(),
                message,
            });
        }
        tracing::debug!(source, target, "mount succeeded");
        Ok(())
    }

    /// Detaches the filesystem mounted at `target`.
    ///
    /// # Errors
    ///
    /// Returns `MountkitError::Spawn` if the unmount utility cannot be
    /// started, or `MountkitError::Unmount` if it exits non-zero.
    pub fn unmount(&self, target: &str) -> Result<()> {
        let program = self.config.unmount_program.as_str();
        tracing::info!(target, "unmounting");

        let output = self.runner.run(program, &[target.to_string()])?;
        if !output.success() {
            let message = output.diagnostic();
            tracing::error!(target, %message, "unmount failed");
            return Err(MountkitError::Unmount {
                target: target.to_string(),
                message,
            });
        }
        Ok(())
    }

    /// Bind-mounts `source` onto `target`, then remounts the bind with `opts`.
    ///
    /// Most options are ignored when a bind mount is created, so they are
    /// applied by a second `bind,remount` call. The remount is only attempted
    /// once the bind itself succeeded.
    ///
    /// # Errors
    ///
    /// Returns the error of whichever of the two mount calls failed first.
    pub fn bind_mount(&self, source: &str, target: &str, opts: &[String]) -> Result<()> {
        self.mount(source, target, "", &[BIND_OPT.to_string()])?;

        let remount_opts: Vec<String> = BIND_REMOUNT_OPTS
            .iter()
            .map(ToString::to_string)
            .chain(opts.iter().cloned())
            .collect();
        self.mount(source, target, "", &remount_opts)
    }
}
