//! External process execution.
//!
//! Every utility this crate drives (`blkid`, `mkfs.*`, `mount`, `umount`) is
//! invoked through [`CommandRunner`], so tests can substitute scripted
//! outputs for real system calls.

use std::process::{Command, Stdio};

use mountkit_common::error::{MountkitError, Result};

/// Captured result of a finished external program.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Standard output from the program.
    pub stdout: String,
    /// Standard error from the program.
    pub stderr: String,
    /// Exit code, or `-1` if the program was killed by a signal.
    pub exit_code: i32,
}

impl CommandOutput {
    /// Returns `true` if the program exited with status zero.
    #[must_use]
    pub const fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Best human-readable explanation of a failure: stderr, then stdout,
    /// then the bare exit code.
    #[must_use]
    pub fn diagnostic(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        let stdout = self.stdout.trim();
        if !stdout.is_empty() {
            return stdout.to_string();
        }
        format!("exit status {}", self.exit_code)
    }
}

/// Runs a program to completion and captures its output.
///
/// Implementations must return `Err(MountkitError::Spawn)` only when the
/// program could not be started. A program that ran and exited non-zero is
/// reported as `Ok` with a non-zero [`CommandOutput::exit_code`].
pub trait CommandRunner: Send + Sync {
    /// Runs `program` with `args` and waits for it to exit.
    ///
    /// # Errors
    ///
    /// Returns `MountkitError::Spawn` if the program cannot be started.
    fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput>;
}

/// Runs real processes on the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    /// Creates a runner for host processes.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Returns `true` if `program` resolves on `PATH`.
    #[must_use]
    pub fn is_available(program: &str) -> bool {
        which::which(program).is_ok()
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        let resolved = which::which(program).map_err(|e| MountkitError::Spawn {
            program: program.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, e.to_string()),
        })?;
        tracing::trace!(program, path = %resolved.display(), ?args, "running external program");

        // `output()` waits for the child, so the process handle is reaped on
        // every path out of this function.
        let output = Command::new(&resolved)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| MountkitError::Spawn {
                program: program.to_string(),
                source: e,
            })?;

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code().unwrap_or(-1),
        })
    }
}
