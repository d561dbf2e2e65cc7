//! Formatted output helpers for CLI commands.

use mountkit_common::types::Info;

/// Renders mounts as an aligned table.
#[must_use]
pub fn mounts_table(mounts: &[Info]) -> String {
    let mut out = format!(
        "{:<28} {:<36} {:<10} {}\n",
        "DEVICE", "MOUNT POINT", "TYPE", "OPTIONS"
    );
    for m in mounts {
        out.push_str(&format!(
            "{:<28} {:<36} {:<10} {}\n",
            m.device,
            m.path,
            m.fs_type,
            m.opts.join(",")
        ));
    }
    out
}

/// Prints mounts as a table or as pretty JSON.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn print_mounts(mounts: &[Info], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(mounts)?);
    } else if mounts.is_empty() {
        println!("No mounts found.");
    } else {
        print!("{}", mounts_table(mounts));
    }
    Ok(())
}
