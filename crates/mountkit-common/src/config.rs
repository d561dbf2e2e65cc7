//! Configuration model for filesystem operations.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::{MountkitError, Result};

/// Settings shared by every operation of a filesystem handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FsConfig {
    /// Mount table to read.
    pub mountinfo_path: PathBuf,
    /// Re-reads attempted before giving up on a consistent snapshot.
    pub snapshot_retries: u32,
    /// Minimum number of fields a mount table row must have.
    pub min_fields: usize,
    /// Filesystem created on blank devices when the caller names none.
    pub default_fs_type: String,
    /// Program used to probe a device for its filesystem type.
    pub probe_program: String,
    /// Mount utility.
    pub mount_program: String,
    /// Unmount utility.
    pub unmount_program: String,
}

impl Default for FsConfig {
    fn default() -> Self {
        Self {
            mountinfo_path: PathBuf::from(constants::DEFAULT_MOUNTINFO_PATH),
            snapshot_retries: constants::DEFAULT_SNAPSHOT_RETRIES,
            min_fields: constants::MOUNTINFO_MIN_FIELDS,
            default_fs_type: constants::DEFAULT_FS_TYPE.to_string(),
            probe_program: constants::DEFAULT_PROBE_PROGRAM.to_string(),
            mount_program: constants::DEFAULT_MOUNT_PROGRAM.to_string(),
            unmount_program: constants::DEFAULT_UNMOUNT_PROGRAM.to_string(),
        }
    }
}

impl FsConfig {
    /// Loads a configuration from a JSON file. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// fails [`FsConfig::validate`].
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| MountkitError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the configuration can drive real operations.
    ///
    /// # Errors
    ///
    /// Returns `MountkitError::Config` describing the first invalid value.
    pub fn validate(&self) -> Result<()> {
        if self.snapshot_retries == 0 {
            return Err(MountkitError::Config {
                message: "snapshot_retries must be at least 1".into(),
            });
        }
        if self.min_fields < constants::MOUNTINFO_MIN_FIELDS {
            return Err(MountkitError::Config {
                message: format!(
                    "min_fields must be at least {}, got {}",
                    constants::MOUNTINFO_MIN_FIELDS,
                    self.min_fields
                ),
            });
        }
        for (name, value) in [
            ("default_fs_type", &self.default_fs_type),
            ("probe_program", &self.probe_program),
            ("mount_program", &self.mount_program),
            ("unmount_program", &self.unmount_program),
        ] {
            if value.trim().is_empty() {
                return Err(MountkitError::Config {
                    message: format!("{name} must not be empty"),
                });
            }
        }
        Ok(())
    }
}
