//! The persisted snapshot of every unit and global dependency.
//!
//! A [`Lockfile`] is rebuilt from the source tree on every run
//! ([`builder`]), takes over the install state of the previous run
//! ([`merge`]), is compared against it ([`diff`]) and finally written back
//! to disk ([`persist`]).
pub mod builder;
pub mod diff;
pub mod merge;
pub mod persist;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::instruction::InstallInstruction;
use crate::config::requirements::Requirements;

pub use diff::{LockfileDiff, diff, newly_hidden};

/// Format version written into new lockfiles.
pub const LOCKFILE_VERSION: &str = "0.1.0";

/// How units are mirrored into the target directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// The target is a symlink to the source directory.
    #[default]
    Symlink,
    /// The target is a recursive copy of the source directory.
    Copy,
}

impl Mode {
    /// `Copy` when `copy` is set, `Symlink` otherwise.
    #[must_use]
    pub const fn from_copy_flag(copy: bool) -> Self {
        if copy { Self::Copy } else { Self::Symlink }
    }
}

/// Install lifecycle of a unit or global dependency.
///
/// `is_installed` and `was_uninstalled` are never both set; the last action
/// decides which one is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InstallInfo {
    /// The unit's instruction ran successfully and has not been undone.
    pub is_installed: bool,
    /// UTC timestamp of the last install.
    pub install_time: String,
    /// The literal command that performed the install.
    pub install_instruction: String,
    /// Every dependency ran before the install.
    pub dependencies_installed: bool,
    /// The unit was explicitly uninstalled.
    pub was_uninstalled: bool,
    /// UTC timestamp of the last uninstall.
    pub uninstall_time: String,
    /// The literal commands that performed the uninstall.
    pub uninstall_instructions: Vec<String>,
}

impl InstallInfo {
    /// Record a successful install, clearing any uninstall record.
    pub fn mark_installed(&mut self, command: String, at: String) {
        *self = Self {
            is_installed: true,
            install_time: at,
            install_instruction: command,
            dependencies_installed: true,
            ..Self::default()
        };
    }

    /// Record a successful uninstall, clearing the install record.
    pub fn mark_uninstalled(&mut self, commands: Vec<String>, at: String) {
        *self = Self {
            was_uninstalled: true,
            uninstall_time: at,
            uninstall_instructions: commands,
            ..Self::default()
        };
    }
}

/// One configuration unit: an immediate subdirectory of the source tree.
///
/// Diffing identifies units by `name` only, so moving the backing
/// directory does not make a unit look new.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Unit name, without the leading dot of a hidden unit.
    pub name: String,
    /// Source directory (dotted for hidden units).
    pub from: PathBuf,
    /// Mirror target (always undotted).
    pub to: PathBuf,
    /// What the unit needs installed.
    #[serde(default)]
    pub requirements: Requirements,
    /// Install lifecycle.
    #[serde(default)]
    pub install_info: InstallInfo,
}

impl Config {
    /// A unit that has never been installed.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        from: impl Into<PathBuf>,
        to: impl Into<PathBuf>,
        requirements: Requirements,
    ) -> Self {
        Self {
            name: name.into(),
            from: from.into(),
            to: to.into(),
            requirements,
            install_info: InstallInfo::default(),
        }
    }
}

/// A package required at the source root, independent of any unit.
///
/// Diffing identifies dependencies by package name only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalDependency {
    /// What to install.
    #[serde(rename = "installInstruction")]
    pub instruction: InstallInstruction,
    /// Install lifecycle.
    #[serde(default)]
    pub install_info: InstallInfo,
}

impl GlobalDependency {
    /// A dependency that has never been installed.
    #[must_use]
    pub fn new(instruction: InstallInstruction) -> Self {
        Self {
            instruction,
            install_info: InstallInfo::default(),
        }
    }

    /// Package name used as the dependency's identity.
    #[must_use]
    pub fn pkg(&self) -> &str {
        &self.instruction.pkg
    }
}

/// Snapshot of the whole configuration repository.
///
/// A name appears in at most one of `configs` and `hidden_configs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lockfile {
    /// Format version.
    pub version: String,
    /// Mirroring mode of the run that wrote the file.
    #[serde(default)]
    pub mode: Mode,
    /// Source-root dependencies.
    #[serde(default)]
    pub global_dependencies: Vec<GlobalDependency>,
    /// Visible units.
    #[serde(default)]
    pub configs: Vec<Config>,
    /// Dot-prefixed units.
    #[serde(default)]
    pub hidden_configs: Vec<Config>,
}

impl Default for Lockfile {
    fn default() -> Self {
        Self {
            version: LOCKFILE_VERSION.to_string(),
            mode: Mode::Symlink,
            global_dependencies: Vec::new(),
            configs: Vec::new(),
            hidden_configs: Vec::new(),
        }
    }
}

impl Lockfile {
    /// Look up a unit by name, visible units first.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Config> {
        self.configs
            .iter()
            .chain(&self.hidden_configs)
            .find(|c| c.name == name)
    }

    /// Mutable [`find`](Self::find).
    pub fn find_mut(&mut self, name: &str) -> Option<&mut Config> {
        self.configs
            .iter_mut()
            .chain(&mut self.hidden_configs)
            .find(|c| c.name == name)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::config::instruction::InstallMethod;

    #[test]
    fn default_lockfile_is_empty_symlink() {
        let l = Lockfile::default();
        assert_eq!(l.version, "0.1.0");
        assert_eq!(l.mode, Mode::Symlink);
        assert!(l.configs.is_empty() && l.hidden_configs.is_empty());
        assert!(l.global_dependencies.is_empty());
    }

    #[test]
    fn mode_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Mode::Copy).unwrap(), "\"copy\"");
        assert_eq!(serde_json::to_string(&Mode::Symlink).unwrap(), "\"symlink\"");
    }

    #[test]
    fn mark_installed_clears_uninstall_record() {
        let mut info = InstallInfo::default();
        info.mark_uninstalled(vec!["sudo pacman -R --noconfirm fish".into()], "t0".into());
        info.mark_installed("sudo pacman -S --noconfirm fish".into(), "t1".into());

        assert!(info.is_installed);
        assert!(!info.was_uninstalled);
        assert!(info.dependencies_installed);
        assert_eq!(info.install_time, "t1");
        assert!(info.uninstall_instructions.is_empty());
        assert!(info.uninstall_time.is_empty());
    }

    #[test]
    fn mark_uninstalled_clears_install_record() {
        let mut info = InstallInfo::default();
        info.mark_installed("cargo install bat".into(), "t0".into());
        info.mark_uninstalled(vec!["cargo uninstall bat".into()], "t1".into());

        assert!(!info.is_installed);
        assert!(info.was_uninstalled);
        assert!(info.install_instruction.is_empty());
        assert_eq!(info.uninstall_instructions, vec!["cargo uninstall bat"]);
    }

    #[test]
    fn find_prefers_visible_units() {
        let mut l = Lockfile::default();
        l.hidden_configs
            .push(Config::new("nvim", "/s/.nvim", "/t/nvim", Requirements::default()));
        l.configs
            .push(Config::new("fish", "/s/fish", "/t/fish", Requirements::default()));

        assert_eq!(l.find("fish").unwrap().from, PathBuf::from("/s/fish"));
        assert_eq!(l.find("nvim").unwrap().from, PathBuf::from("/s/.nvim"));
        assert!(l.find("ghostty").is_none());

        l.find_mut("nvim").unwrap().install_info.is_installed = true;
        assert!(l.hidden_configs[0].install_info.is_installed);
    }

    #[test]
    fn parses_minimal_document() {
        let l: Lockfile = serde_json::from_str(r#"{"version":"0.1.0"}"#).unwrap();
        assert_eq!(l, Lockfile::default());
    }

    #[test]
    fn global_dependency_field_names() {
        let dep = GlobalDependency::new(InstallInstruction::new(InstallMethod::Pacman, "git"));
        let json = serde_json::to_value(&dep).unwrap();
        assert_eq!(json["installInstruction"]["pkg"], "git");
        assert_eq!(json["installInfo"]["isInstalled"], false);
    }
}
