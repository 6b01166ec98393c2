//! Home configuration manager.
//!
//! Mirrors every immediate subdirectory of a source directory into a target
//! directory (usually `~/.config`), installs the packages each one asks for
//! and remembers what it did in a JSON lockfile, so the next run only acts
//! on what changed.
//!
//! The public API is organised into layers:
//!
//! - **[`config`]**: settings resolution and the `INSTALL`/`DEPENDENCIES` formats
//! - **[`lockfile`]**: snapshot building, state carry-over, diffing and persistence
//! - **[`resources`]**: package manager backends and filesystem mirroring
//! - **[`tasks`]**: the ordered steps of `hm apply`
//! - **[`commands`]**: top-level subcommand orchestration (`apply`, `diff`, `status`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod lockfile;
pub mod logging;
pub mod resources;
pub mod tasks;
