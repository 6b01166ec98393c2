//! Run settings and the per-unit requirement files.
pub mod instruction;
pub mod requirements;
pub mod toml_loader;

use anyhow::{Context as _, Result};
use serde::Deserialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::lockfile::Mode;

/// Optional settings file at the root of the source directory.
pub const SETTINGS_FILE: &str = "hm.toml";

/// Default lockfile name inside the source directory.
pub const LOCKFILE_NAME: &str = "hm-lock.json";

/// Default diff file name inside the source directory.
pub const DIFF_FILE_NAME: &str = "hm-lock.diff.json";

/// Indentation used when none is configured.
pub const DEFAULT_INDENT: &str = "    ";

/// Values given on the command line; `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// `--source-dir`.
    pub source_dir: Option<PathBuf>,
    /// `--target-dir`.
    pub target_dir: Option<PathBuf>,
    /// `--lockfile`.
    pub lockfile: Option<PathBuf>,
    /// `--diff-file`.
    pub diff_file: Option<PathBuf>,
    /// `--copy`.
    pub copy: bool,
}

/// Contents of `hm.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct FileSettings {
    /// Where units are mirrored to.
    pub target_dir: Option<PathBuf>,
    /// JSON indentation unit; empty for compact output.
    pub indent: Option<String>,
    /// Mirror by copying instead of symlinking.
    pub copy: Option<bool>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Root of the configuration repository.
    pub source_dir: PathBuf,
    /// Directory units are mirrored into.
    pub target_dir: PathBuf,
    /// Persisted lockfile.
    pub lockfile: PathBuf,
    /// Persisted diff of the last run.
    pub diff_file: PathBuf,
    /// JSON indentation unit.
    pub indent: String,
    /// Mirroring mode.
    pub mode: Mode,
}

impl Settings {
    /// Resolve settings from the command line, the process environment,
    /// `hm.toml` and built-in defaults, in that order of precedence.
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory is known, the source directory
    /// does not exist, `hm.toml` is malformed, or the target directory is
    /// the source directory.
    pub fn resolve(overrides: &Overrides) -> Result<Self> {
        Self::resolve_with(overrides, |key| std::env::var_os(key))
    }

    /// [`resolve`](Self::resolve) with an injected environment lookup.
    ///
    /// # Errors
    ///
    /// See [`resolve`](Self::resolve).
    pub fn resolve_with(
        overrides: &Overrides,
        env: impl Fn(&str) -> Option<OsString>,
    ) -> Result<Self> {
        let env_path = |key: &str| env(key).filter(|v| !v.is_empty()).map(PathBuf::from);
        let home = || env_path("HOME").context("HOME is not set");

        let source_dir = match overrides.source_dir.clone().or_else(|| env_path("HM_SOURCE_DIR")) {
            Some(dir) => dir,
            None => home()?.join(".config").join("homecfg"),
        };
        let source_dir = dunce::canonicalize(&source_dir)
            .with_context(|| format!("source directory {}", source_dir.display()))?;

        let file: FileSettings = toml_loader::load_config(&source_dir.join(SETTINGS_FILE))?;

        let target_dir = match overrides
            .target_dir
            .clone()
            .or_else(|| env_path("HM_TARGET_DIR"))
            .or(file.target_dir)
        {
            Some(dir) => dir,
            None => home()?.join(".config"),
        };
        let target_dir = absolute(&target_dir)?;
        let same_dir = dunce::canonicalize(&target_dir).is_ok_and(|t| t == source_dir);
        anyhow::ensure!(
            target_dir != source_dir && !same_dir,
            "target directory {} is the source directory",
            target_dir.display()
        );

        let lockfile = overrides
            .lockfile
            .clone()
            .unwrap_or_else(|| source_dir.join(LOCKFILE_NAME));
        let diff_file = overrides
            .diff_file
            .clone()
            .unwrap_or_else(|| source_dir.join(DIFF_FILE_NAME));

        Ok(Self {
            target_dir,
            lockfile: absolute(&lockfile)?,
            diff_file: absolute(&diff_file)?,
            indent: file.indent.unwrap_or_else(|| DEFAULT_INDENT.to_string()),
            mode: Mode::from_copy_flag(overrides.copy || file.copy.unwrap_or(false)),
            source_dir,
        })
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).with_context(|| format!("resolving {}", path.display()))
}
