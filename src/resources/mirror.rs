//! Mirroring a unit's source directory into the target tree.
use anyhow::{Context as _, Result};
use std::fmt;
use std::path::Path;

use super::fs::{copy_dir_recursive, ensure_parent_dir, remove_path};

/// Creates, replaces and removes mirrored unit targets.
#[cfg_attr(test, mockall::automock)]
pub trait Mirror: fmt::Debug {
    /// Point `to` at `from` with a symlink, replacing whatever is at `to`.
    ///
    /// # Errors
    ///
    /// Returns an error if the existing target cannot be removed or the link
    /// cannot be created.
    fn symlink(&self, from: &Path, to: &Path) -> Result<()>;

    /// Replace `to` with a recursive copy of `from`.
    ///
    /// # Errors
    ///
    /// Returns an error if the existing target cannot be removed or the copy
    /// fails.
    fn copy(&self, from: &Path, to: &Path) -> Result<()>;

    /// Remove `to` recursively. A missing target is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the target exists but cannot be removed.
    fn remove(&self, to: &Path) -> Result<()>;
}

/// [`Mirror`] backed by the real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemMirror;

impl Mirror for SystemMirror {
    fn symlink(&self, from: &Path, to: &Path) -> Result<()> {
        ensure_parent_dir(to)?;
        remove_path(to)?;
        create_symlink(from, to)
            .with_context(|| format!("create link: {} -> {}", to.display(), from.display()))
    }

    fn copy(&self, from: &Path, to: &Path) -> Result<()> {
        ensure_parent_dir(to)?;
        remove_path(to)?;
        copy_dir_recursive(from, to)
            .with_context(|| format!("copy {} to {}", from.display(), to.display()))
    }

    fn remove(&self, to: &Path) -> Result<()> {
        remove_path(to)
    }
}

#[cfg(unix)]
fn create_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn create_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_dir(target, link)
}
