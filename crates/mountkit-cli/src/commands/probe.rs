//! `mountkit probe` — Print the filesystem type on a device.

use clap::Args;
use mountkit_core::Fs;

/// Arguments for the `probe` command.
#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// Device to probe.
    pub device: String,
}

/// Executes the `probe` command.
///
/// Prints the filesystem type, or `unformatted` when none is found.
///
/// # Errors
///
/// Returns an error if the probe utility cannot be started.
pub fn execute(fs: &Fs, args: &ProbeArgs) -> anyhow::Result<()> {
    let fs_type = fs.get_disk_format(&args.device)?;
    if fs_type.is_empty() {
        println!("{}: unformatted", args.device);
    } else {
        println!("{}: {fs_type}", args.device);
    }
    Ok(())
}
