//! `mountkit mounts` and `mountkit dev-mounts` — list mounted filesystems.

use clap::Args;
use mountkit_core::Fs;

use crate::output;

/// Arguments for the `mounts` command.
#[derive(Args, Debug)]
pub struct MountsArgs {
    /// Print JSON instead of a table.
    #[arg(long)]
    pub json: bool,

    /// Only show mounts of this filesystem type.
    #[arg(short = 't', long = "type")]
    pub fs_type: Option<String>,
}

/// Arguments for the `dev-mounts` command.
#[derive(Args, Debug)]
pub struct DevMountsArgs {
    /// Device path, e.g. `/dev/sdb` or a `/dev/disk/by-id/` link.
    pub device: String,

    /// Print JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

/// Executes the `mounts` command.
///
/// # Errors
///
/// Returns an error if no consistent snapshot of the mount table is obtained.
pub fn execute(fs: &Fs, args: &MountsArgs) -> anyhow::Result<()> {
    let mut mounts = fs.get_mounts()?;
    if let Some(fs_type) = &args.fs_type {
        mounts.retain(|m| &m.fs_type == fs_type);
    }
    output::print_mounts(&mounts, args.json)
}

/// Executes the `dev-mounts` command.
///
/// # Errors
///
/// Returns an error if no consistent snapshot of the mount table is obtained.
pub fn execute_dev(fs: &Fs, args: &DevMountsArgs) -> anyhow::Result<()> {
    let mounts = fs.get_dev_mounts(&args.device)?;
    output::print_mounts(&mounts, args.json)
}
