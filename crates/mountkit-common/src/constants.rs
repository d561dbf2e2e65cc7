//! System-wide constants and default values.

/// Kernel-exposed mount table of the calling process.
pub const DEFAULT_MOUNTINFO_PATH: &str = "/proc/self/mountinfo";

/// Number of re-reads attempted when looking for a consistent snapshot of the
/// mount table.
pub const DEFAULT_SNAPSHOT_RETRIES: u32 = 3;

/// Fewest whitespace-separated fields a mountinfo row can have: seven
/// before the `-` separator (with no optional fields) and three after it.
pub const MOUNTINFO_MIN_FIELDS: usize = 10;

/// Separator between the optional fields and the filesystem type in a
/// mountinfo row.
pub const MOUNTINFO_SEPARATOR: &str = "-";

/// Filesystem created when a blank device is formatted without an explicit type.
pub const DEFAULT_FS_TYPE: &str = "ext4";

/// Filesystem types whose `mkfs` refuses to overwrite a whole device without `-F`.
pub const FORCE_FORMAT_FS_TYPES: &[&str] = &["ext4", "ext3"];

/// Flag passed to `mkfs` for the types in [`FORCE_FORMAT_FS_TYPES`].
pub const FORCE_FORMAT_FLAG: &str = "-F";

/// Prefix of the per-type format utility, completed with the filesystem type.
pub const MKFS_PREFIX: &str = "mkfs.";

/// Option appended to every format-and-mount request.
pub const DEFAULT_MOUNT_OPT: &str = "defaults";

/// Option used to create a bind mount.
pub const BIND_OPT: &str = "bind";

/// Options that re-apply caller options on top of an existing bind mount.
pub const BIND_REMOUNT_OPTS: &[&str] = &["bind", "remount"];

/// Default program used to probe a device for its filesystem type.
pub const DEFAULT_PROBE_PROGRAM: &str = "blkid";

/// Default mount utility.
pub const DEFAULT_MOUNT_PROGRAM: &str = "mount";

/// Default unmount utility.
pub const DEFAULT_UNMOUNT_PROGRAM: &str = "umount";

/// Application name, used as the CLI binary name.
pub const APP_NAME: &str = "mountkit";
