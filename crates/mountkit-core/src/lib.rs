//! # mountkit-core
//!
//! Filesystem-mount plumbing for Linux hosts, meant to sit underneath
//! volume attach/detach logic rather than to be driven by hand.
//!
//! This crate provides:
//! - **Snapshots**: a consistent view of `/proc/self/mountinfo`, re-read until
//!   two consecutive reads fingerprint identically.
//! - **Probing**: the filesystem type already present on a block device.
//! - **Format-and-mount**: format a blank device, then mount it, without ever
//!   formatting a device that already carries a filesystem.
//! - **Bind mounts**: bind, then remount to apply the requested options.
//!
//! External utilities (`blkid`, `mkfs.*`, `mount`, `umount`) are reached
//! through the [`runner::CommandRunner`] trait so tests can script them.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used, clippy::panic))]

pub mod format;
pub mod fs;
pub mod mount;
pub mod mountinfo;
pub mod probe;
pub mod runner;
pub mod table;

pub use fs::Fs;
pub use mountkit_common::types::Info;
