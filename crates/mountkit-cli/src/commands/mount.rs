//! `mountkit mount` and `mountkit unmount`.

use clap::Args;
use mountkit_core::Fs;

/// Arguments for the `mount` command.
#[derive(Args, Debug)]
pub struct MountArgs {
    /// Device or directory to mount.
    pub source: String,

    /// Mount point.
    pub target: String,

    /// Filesystem type; left to the mount utility when omitted.
    #[arg(short = 't', long, default_value = "")]
    pub fs_type: String,

    /// Mount option; repeat for several.
    #[arg(short = 'o', long = "option")]
    pub options: Vec<String>,
}

/// Arguments for the `unmount` command.
#[derive(Args, Debug)]
pub struct UnmountArgs {
    /// Mount point to detach.
    pub target: String,

    /// Succeed without doing anything if nothing is mounted at the target.
    #[arg(long)]
    pub if_mounted: bool,
}

/// Executes the `mount` command.
///
/// # Errors
///
/// Returns an error if the mount utility fails.
pub fn execute(fs: &Fs, args: &MountArgs) -> anyhow::Result<()> {
    fs.mount(&args.source, &args.target, &args.fs_type, &args.options)?;
    Ok(())
}

/// Executes the `unmount` command.
///
/// # Errors
///
/// Returns an error if the mount table cannot be read or the unmount fails.
pub fn execute_unmount(fs: &Fs, args: &UnmountArgs) -> anyhow::Result<()> {
    if args.if_mounted && !fs.is_mounted(&args.target)? {
        tracing::info!(target = %args.target, "nothing mounted, skipping unmount");
        return Ok(());
    }
    fs.unmount(&args.target)?;
    Ok(())
}
