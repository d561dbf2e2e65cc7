//! # mountkit-common
//!
//! Shared error definitions, configuration model, constants, and the
//! mount-table record type used across the mountkit workspace.
//!
//! This crate is the leaf of the dependency graph. It depends on no other
//! internal crate and holds the vocabulary that `mountkit-core` and the CLI
//! speak.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod config;
pub mod constants;
pub mod error;
pub mod types;
