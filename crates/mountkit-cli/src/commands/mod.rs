//! CLI command definitions and dispatch.

pub mod bind;
pub mod format;
pub mod mount;
pub mod mounts;
pub mod probe;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use mountkit_common::config::FsConfig;
use mountkit_common::constants::APP_NAME;
use mountkit_core::Fs;

/// mountkit — inspect mounts and prepare block devices.
#[derive(Parser, Debug)]
#[command(name = APP_NAME, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// JSON configuration file.
    #[arg(long, global = true, env = "MOUNTKIT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Mount table to read instead of the configured one.
    #[arg(long, global = true)]
    pub mountinfo: Option<PathBuf>,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub json_logs: bool,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List mounted filesystems from a consistent mount-table snapshot.
    Mounts(mounts::MountsArgs),
    /// List the mounts of one device.
    DevMounts(mounts::DevMountsArgs),
    /// Print the filesystem type on a device (empty if unformatted).
    Probe(probe::ProbeArgs),
    /// Format a device if it is blank, then mount it.
    FormatAndMount(format::FormatAndMountArgs),
    /// Bind-mount a path, then remount it with the given options.
    BindMount(bind::BindMountArgs),
    /// Mount a device or directory.
    Mount(mount::MountArgs),
    /// Unmount a mount point.
    Unmount(mount::UnmountArgs),
}

/// Builds the filesystem handle from the global flags.
///
/// # Errors
///
/// Returns an error if the configuration file cannot be loaded or the
/// resulting configuration is invalid.
pub fn build_fs(cli: &Cli) -> anyhow::Result<Fs> {
    let mut config = match &cli.config {
        Some(path) => FsConfig::load(path)?,
        None => FsConfig::default(),
    };
    if let Some(path) = &cli.mountinfo {
        config.mountinfo_path.clone_from(path);
    }
    config.validate()?;
    tracing::debug!(?config, "filesystem configuration");
    Ok(Fs::with_config(config))
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    let fs = build_fs(&cli)?;
    match cli.command {
        Command::Mounts(args) => mounts::execute(&fs, &args),
        Command::DevMounts(args) => mounts::execute_dev(&fs, &args),
        Command::Probe(args) => probe::execute(&fs, &args),
        Command::FormatAndMount(args) => format::execute(&fs, &args),
        Command::BindMount(args) => bind::execute(&fs, &args),
        Command::Mount(args) => mount::execute(&fs, &args),
        Command::Unmount(args) => mount::execute_unmount(&fs, &args),
    }
}
