//! Parser for the Linux `/proc/<pid>/mountinfo` format.
//!
//! A row looks like:
//!
//! ```text
//! 36 35 98:0 /mnt1 /mnt2 rw,noatime master:1 - ext3 /dev/root rw,errors=continue
//! (1)(2)(3)   (4)   (5)      (6)      (7)   (8) (9)   (10)         (11)
//! ```
//!
//! Fields (7) are optional and variable in number, terminated by the `-`
//! separator (8). Paths escape whitespace and backslashes as three-digit
//! octal sequences (`\040` for a space).

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use mountkit_common::constants::MOUNTINFO_SEPARATOR;
use mountkit_common::error::{MountkitError, Result};
use mountkit_common::types::Info;

/// One raw row of the mount table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entry {
    /// Unique mount id.
    pub mount_id: u32,
    /// Id of the parent mount.
    pub parent_id: u32,
    /// `major:minor` of the backing device.
    pub major_minor: String,
    /// Path within the filesystem that forms the root of this mount.
    pub root: String,
    /// Mount point relative to the process root.
    pub mount_point: String,
    /// Per-mount options.
    pub mount_opts: Vec<String>,
    /// Optional tagged fields such as `shared:1` or `master:2`.
    pub optional_fields: Vec<String>,
    /// Filesystem type.
    pub fs_type: String,
    /// Filesystem-specific source, usually a device path.
    pub mount_source: String,
    /// Per-superblock options.
    pub super_opts: Vec<String>,
}

impl Entry {
    /// Parses one mountinfo row.
    ///
    /// # Errors
    ///
    /// Returns `MountkitError::MountInfo` if the row has fewer than
    /// `min_fields` fields, lacks the `-` separator, is missing fields after
    /// it, or carries non-numeric mount ids.
    pub fn parse(line: &str, min_fields: usize) -> Result<Self> {
        let malformed = |message: String| MountkitError::MountInfo {
            line: line.to_string(),
            message,
        };

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < min_fields {
            return Err(malformed(format!(
                "expected at least {min_fields} fields, found {}",
                fields.len()
            )));
        }

        let separator = fields
            .iter()
            .skip(6)
            .position(|f| *f == MOUNTINFO_SEPARATOR)
            .map(|i| i + 6)
            .ok_or_else(|| malformed("missing '-' separator".into()))?;
        if fields.len() < separator + 4 {
            return Err(malformed("missing fields after '-' separator".into()));
        }

        let parse_id = |raw: &str, what: &str| {
            raw.parse::<u32>()
                .map_err(|e| malformed(format!("invalid {what} {raw:?}: {e}")))
        };

        Ok(Self {
            mount_id: parse_id(fields[0], "mount id")?,
            parent_id: parse_id(fields[1], "parent id")?,
            major_minor: fields[2].to_string(),
            root: unescape(fields[3]),
            mount_point: unescape(fields[4]),
            mount_opts: split_opts(fields[5]),
            optional_fields: fields[6..separator].iter().map(ToString::to_string).collect(),
            fs_type: fields[separator + 1].to_string(),
            mount_source: unescape(fields[separator + 2]),
            super_opts: split_opts(fields[separator + 3]),
        })
    }
}

/// Filter and transform applied to every parsed row.
///
/// The cache lives for one read of the table and is keyed by mount source.
/// Returning `Ok(None)` drops the row; an error aborts the read.
pub type ScanEntryFn =
    dyn Fn(&Entry, &mut HashMap<String, Entry>) -> Result<Option<Info>> + Send + Sync;

/// Keeps rows backed by a real device or by a network/FUSE filesystem and
/// resolves bind mounts to the directory they expose.
///
/// The first row seen for a source is treated as the non-bind mount of that
/// source. Later rows with the same source get an [`Info::source`] of that
/// first mount point joined with their own root.
///
/// # Errors
///
/// Never fails; the signature matches [`ScanEntryFn`].
pub fn default_scan_entry(entry: &Entry, cache: &mut HashMap<String, Entry>) -> Result<Option<Info>> {
    if !(entry.mount_source.starts_with('/') || is_tracked_fs_type(&entry.fs_type)) {
        return Ok(None);
    }

    let source = match cache.get(&entry.mount_source) {
        Some(first) => {
            let relative = entry.root.trim_start_matches('/');
            if relative.is_empty() {
                first.mount_point.clone()
            } else {
                Path::new(&first.mount_point)
                    .join(relative)
                    .to_string_lossy()
                    .into_owned()
            }
        }
        None => {
            let _ = cache.insert(entry.mount_source.clone(), entry.clone());
            entry.mount_source.clone()
        }
    };

    Ok(Some(Info {
        device: entry.mount_source.clone(),
        path: entry.mount_point.clone(),
        source,
        fs_type: entry.fs_type.clone(),
        opts: entry.mount_opts.clone(),
    }))
}

fn is_tracked_fs_type(fs_type: &str) -> bool {
    let lower = fs_type.to_ascii_lowercase();
    lower == "devtmpfs"
        || lower.starts_with("fuse.")
        || lower
            .strip_prefix("nfs")
            .is_some_and(|rest| rest.len() <= 1 && rest.chars().all(|c| c.is_ascii_digit()))
}

/// Parses every non-empty row of `content` and runs it through `scan`.
///
/// # Errors
///
/// Returns the first parse error or the first error raised by `scan`.
pub fn parse_mountinfo(content: &str, min_fields: usize, scan: &ScanEntryFn) -> Result<Vec<Info>> {
    let mut cache = HashMap::new();
    let mut mounts = Vec::new();
    for line in content.lines().filter(|l| !l.trim().is_empty()) {
        let entry = Entry::parse(line, min_fields)?;
        if let Some(info) = scan(&entry, &mut cache)? {
            mounts.push(info);
        }
    }
    Ok(mounts)
}

/// Reads a whole mount table from `r`, returning the entries kept by `scan`
/// and the fingerprint of the raw bytes.
///
/// With `skip_entries` set only the fingerprint is computed and the entry
/// list is empty.
///
/// # Errors
///
/// Returns `MountkitError::Io` with an empty path if reading fails (callers
/// that know where the stream came from fill it in), or the first parse or
/// scan error.
pub fn read_proc_mounts_from(
    mut r: impl Read,
    skip_entries: bool,
    min_fields: usize,
    scan: &ScanEntryFn,
) -> Result<(Vec<Info>, u32)> {
    let mut raw = Vec::new();
    let _ = r.read_to_end(&mut raw).map_err(|source| MountkitError::Io {
        path: PathBuf::new(),
        source,
    })?;

    let hash = fingerprint(&raw);
    if skip_entries {
        return Ok((Vec::new(), hash));
    }

    let content = String::from_utf8_lossy(&raw);
    let mounts = parse_mountinfo(&content, min_fields, scan)?;
    Ok((mounts, hash))
}

/// CRC-32 of the raw table bytes. Only ever compared for equality.
#[must_use]
pub fn fingerprint(raw: &[u8]) -> u32 {
    crc32fast::hash(raw)
}

fn split_opts(raw: &str) -> Vec<String> {
    raw.split(',')
        .filter(|o| !o.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Decodes the kernel's `\ooo` octal escapes.
fn unescape(raw: &str) -> String {
    if !raw.contains('\\') {
        return raw.to_string();
    }
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' {
            if let Some(value) = raw
                .get(i + 1..i + 4)
                .filter(|oct| oct.bytes().all(|b| (b'0'..=b'7').contains(&b)))
                .and_then(|oct| u8::from_str_radix(oct, 8).ok())
            {
                out.push(value);
                i += 4;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOT_ROW: &str = "22 1 8:1 / / rw,relatime shared:1 - ext4 /dev/sda1 rw,errors=remount-ro";

    #[test]
    fn parses_row_with_optional_fields() {
        let entry = Entry::parse(
            "36 35 98:0 /mnt1 /mnt2 rw,noatime master:1 shared:7 - ext3 /dev/root rw,errors=continue",
            10,
        )
        .expect("parse");
        assert_eq!(entry.mount_id, 36);
        assert_eq!(entry.parent_id, 35);
        assert_eq!(entry.major_minor, "98:0");
        assert_eq!(entry.root, "/mnt1");
        assert_eq!(entry.mount_point, "/mnt2");
        assert_eq!(entry.mount_opts, vec!["rw", "noatime"]);
        assert_eq!(entry.optional_fields, vec!["master:1", "shared:7"]);
        assert_eq!(entry.fs_type, "ext3");
        assert_eq!(entry.mount_source, "/dev/root");
        assert_eq!(entry.super_opts, vec!["rw", "errors=continue"]);
    }

    #[test]
    fn parses_row_without_optional_fields() {
        let entry = Entry::parse("40 22 0:5 / /proc rw,nosuid - proc proc rw", 10).expect("parse");
        assert!(entry.optional_fields.is_empty());
        assert_eq!(entry.fs_type, "proc");
    }

    #[test]
    fn decodes_octal_escapes_in_paths() {
        let entry = Entry::parse(
            "50 22 8:2 / /mnt/my\\040disk rw - ext4 /dev/sdb1 rw",
            10,
        )
        .expect("parse");
        assert_eq!(entry.mount_point, "/mnt/my disk");
        assert_eq!(unescape("back\\134slash"), "back\\slash");
        assert_eq!(unescape("not\\9escape"), "not\\9escape");
    }

    #[test]
    fn rejects_short_row() {
        let err = Entry::parse("1 2 3:4 / /", 10).unwrap_err();
        assert!(matches!(err, MountkitError::MountInfo { .. }));
        assert!(err.to_string().contains("at least 10 fields"));
    }

    #[test]
    fn rejects_row_without_separator() {
        let err = Entry::parse("1 2 3:4 / / rw shared:1 x ext4 /dev/sda rw", 10).unwrap_err();
        assert!(err.to_string().contains("separator"));
    }

    #[test]
    fn rejects_non_numeric_id() {
        let err = Entry::parse("x 2 3:4 / / rw - ext4 /dev/sda rw", 10).unwrap_err();
        assert!(err.to_string().contains("mount id"));
    }

    #[test]
    fn default_scan_skips_pseudo_filesystems() {
        let mut cache = HashMap::new();
        let proc = Entry::parse("40 22 0:5 / /proc rw - proc proc rw", 10).unwrap();
        assert_eq!(default_scan_entry(&proc, &mut cache).unwrap(), None);

        let nfs = Entry::parse("41 22 0:50 / /mnt/nfs rw - nfs4 server:/export rw", 10).unwrap();
        assert!(default_scan_entry(&nfs, &mut cache).unwrap().is_some());

        let fuse = Entry::parse("42 22 0:51 / /mnt/s3 rw - fuse.s3fs s3fs rw", 10).unwrap();
        assert!(default_scan_entry(&fuse, &mut cache).unwrap().is_some());

        let dev = Entry::parse("43 22 0:6 / /dev rw - devtmpfs udev rw", 10).unwrap();
        assert!(default_scan_entry(&dev, &mut cache).unwrap().is_some());

        let nfsish = Entry::parse("44 22 0:52 / /x rw - nfsd nfsd rw", 10).unwrap();
        assert_eq!(default_scan_entry(&nfsish, &mut cache).unwrap(), None);
    }

    #[test]
    fn default_scan_resolves_bind_mount_source() {
        let content = format!(
            "{ROOT_ROW}\n\
             60 22 8:16 / /var/lib/volumes/v1 rw - xfs /dev/sdb rw\n\
             61 22 8:16 /data /pods/p1/mnt ro - xfs /dev/sdb rw\n"
        );
        let mounts = parse_mountinfo(&content, 10, &default_scan_entry).expect("parse");
        assert_eq!(mounts.len(), 3);
        assert_eq!(mounts[1].source, "/dev/sdb");
        assert_eq!(mounts[2].device, "/dev/sdb");
        assert_eq!(mounts[2].path, "/pods/p1/mnt");
        assert_eq!(mounts[2].source, "/var/lib/volumes/v1/data");
        assert!(mounts[2].is_read_only());
    }

    #[test]
    fn parse_mountinfo_propagates_scan_error() {
        let failing = |_: &Entry, _: &mut HashMap<String, Entry>| -> Result<Option<Info>> {
            Err(MountkitError::Config {
                message: "scan refused".into(),
            })
        };
        let err = parse_mountinfo(ROOT_ROW, 10, &failing).unwrap_err();
        assert!(err.to_string().contains("scan refused"));
    }

    #[test]
    fn parse_mountinfo_skips_blank_lines() {
        let content = format!("\n{ROOT_ROW}\n\n");
        let mounts = parse_mountinfo(&content, 10, &default_scan_entry).expect("parse");
        assert_eq!(mounts.len(), 1);
        assert_eq!(mounts[0].path, "/");
    }

    #[test]
    fn read_proc_mounts_from_parses_and_fingerprints_stream() {
        let content = format!("{ROOT_ROW}\n40 22 0:5 / /proc rw - proc proc rw\n");
        let (mounts, hash) = read_proc_mounts_from(
            std::io::Cursor::new(content.clone()),
            false,
            10,
            &default_scan_entry,
        )
        .expect("read");
        assert_eq!(mounts.len(), 1);
        assert_eq!(mounts[0].device, "/dev/sda1");
        assert_eq!(hash, fingerprint(content.as_bytes()));
    }

    #[test]
    fn read_proc_mounts_from_skips_entries_on_request() {
        let (mounts, hash) = read_proc_mounts_from(
            std::io::Cursor::new("not a mount table\n"),
            true,
            10,
            &default_scan_entry,
        )
        .expect("read");
        assert!(mounts.is_empty());
        assert_eq!(hash, fingerprint(b"not a mount table\n"));

        let err = read_proc_mounts_from(
            std::io::Cursor::new("not a mount table\n"),
            false,
            10,
            &default_scan_entry,
        )
        .unwrap_err();
        assert!(matches!(err, MountkitError::MountInfo { .. }));
    }

    #[test]
    fn read_proc_mounts_from_reports_read_failure() {
        struct Failing;
        impl Read for Failing {
            fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("device gone"))
            }
        }

        let err = read_proc_mounts_from(Failing, false, 10, &default_scan_entry).unwrap_err();
        match err {
            MountkitError::Io { path, source } => {
                assert_eq!(path, PathBuf::new());
                assert!(source.to_string().contains("device gone"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn fingerprint_tracks_raw_bytes() {
        let a = fingerprint(ROOT_ROW.as_bytes());
        assert_eq!(a, fingerprint(ROOT_ROW.as_bytes()));
        assert_ne!(a, fingerprint(format!("{ROOT_ROW}\n").as_bytes()));
    }
}
