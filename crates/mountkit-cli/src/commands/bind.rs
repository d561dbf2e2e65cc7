//! `mountkit bind-mount` — Bind-mount a path and apply options.

use clap::Args;
use mountkit_core::Fs;

/// Arguments for the `bind-mount` command.
#[derive(Args, Debug)]
pub struct BindMountArgs {
    /// Existing file or directory to expose.
    pub source: String,

    /// Where to expose it.
    pub target: String,

    /// Option applied by the remount step (e.g. `ro`); repeat for several.
    #[arg(short = 'o', long = "option")]
    pub options: Vec<String>,
}

/// Executes the `bind-mount` command.
///
/// # Errors
///
/// Returns an error if the bind or the remount fails.
pub fn execute(fs: &Fs, args: &BindMountArgs) -> anyhow::Result<()> {
    fs.bind_mount(&args.source, &args.target, &args.options)?;
    Ok(())
}
