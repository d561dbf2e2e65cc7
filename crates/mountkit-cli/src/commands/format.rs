//! `mountkit format-and-mount` — Format a blank device, then mount it.

use clap::Args;
use mountkit_core::Fs;

/// Arguments for the `format-and-mount` command.
#[derive(Args, Debug)]
pub struct FormatAndMountArgs {
    /// Block device to prepare.
    pub source: String,

    /// Mount point.
    pub target: String,

    /// Filesystem type. Blank devices default to the configured type.
    #[arg(short = 't', long, default_value = "")]
    pub fs_type: String,

    /// Mount option; repeat for several.
    #[arg(short = 'o', long = "option")]
    pub options: Vec<String>,
}

/// Executes the `format-and-mount` command.
///
/// # Errors
///
/// Returns an error if probing, formatting, or mounting fails.
pub fn execute(fs: &Fs, args: &FormatAndMountArgs) -> anyhow::Result<()> {
    fs.format_and_mount(&args.source, &args.target, &args.fs_type, &args.options)?;
    tracing::info!(source = %args.source, target = %args.target, "device ready");
    Ok(())
}
