//! `method:package` install instructions.
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigAuthoringError;

/// How a package is installed.
///
/// `System` and `Aur` are *logical* methods: they are resolved at run time to
/// whichever concrete backend the host probe found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InstallMethod {
    /// The host's system package manager (apt, pacman, dnf or brew).
    System,
    /// Debian/Ubuntu `apt`.
    Apt,
    /// Arch Linux `pacman`.
    Pacman,
    /// Fedora `dnf`.
    Dnf,
    /// Homebrew.
    Brew,
    /// The host's AUR helper (paru, yay, pacaur or aurman).
    Aur,
    /// `yay` AUR helper.
    Yay,
    /// `paru` AUR helper.
    Paru,
    /// `pacaur` AUR helper.
    Pacaur,
    /// `aurman` AUR helper.
    Aurman,
    /// `cargo install`.
    Cargo,
    /// `cargo-binstall`.
    CargoBinstall,
    /// A literal shell command; the package field is the command.
    Bash,
}

impl InstallMethod {
    /// Every method, in declaration order.
    pub const ALL: [Self; 13] = [
        Self::System,
        Self::Apt,
        Self::Pacman,
        Self::Dnf,
        Self::Brew,
        Self::Aur,
        Self::Yay,
        Self::Paru,
        Self::Pacaur,
        Self::Aurman,
        Self::Cargo,
        Self::CargoBinstall,
        Self::Bash,
    ];

    /// Name as written in `INSTALL`/`DEPENDENCIES` files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Apt => "apt",
            Self::Pacman => "pacman",
            Self::Dnf => "dnf",
            Self::Brew => "brew",
            Self::Aur => "aur",
            Self::Yay => "yay",
            Self::Paru => "paru",
            Self::Pacaur => "pacaur",
            Self::Aurman => "aurman",
            Self::Cargo => "cargo",
            Self::CargoBinstall => "cargo-binstall",
            Self::Bash => "bash",
        }
    }

    /// Whether the method needs a probed backend to be usable.
    #[must_use]
    pub const fn is_logical(self) -> bool {
        matches!(self, Self::System | Self::Aur)
    }
}

impl fmt::Display for InstallMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a known [`InstallMethod`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown installation method '{0}'")]
pub struct UnknownMethod(pub String);

impl FromStr for InstallMethod {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| UnknownMethod(s.to_string()))
    }
}

/// A single `method:package` instruction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstallInstruction {
    /// How to install.
    pub method: InstallMethod,
    /// Package name, or the literal command for [`InstallMethod::Bash`].
    pub pkg: String,
}

impl InstallInstruction {
    /// Create an instruction.
    #[must_use]
    pub fn new(method: InstallMethod, pkg: impl Into<String>) -> Self {
        Self {
            method,
            pkg: pkg.into(),
        }
    }
}

impl fmt::Display for InstallInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.method, self.pkg)
    }
}

/// Parse one instruction line.
///
/// Returns `Ok(None)` for blank lines and lines commented out with `//`.
/// `file` and `line` only feed the error location.
///
/// # Errors
///
/// Returns a [`ConfigAuthoringError`] if the line has no `:`, names an
/// unknown method, or has an empty package.
pub fn parse_line(
    text: &str,
    file: &Path,
    line: usize,
) -> Result<Option<InstallInstruction>, ConfigAuthoringError> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.starts_with("//") {
        return Ok(None);
    }

    let Some((method, pkg)) = trimmed.split_once(':') else {
        return Err(ConfigAuthoringError::MissingSeparator {
            file: file.to_path_buf(),
            line,
            text: trimmed.to_string(),
        });
    };

    let method: InstallMethod =
        method
            .trim()
            .parse()
            .map_err(|UnknownMethod(method)| ConfigAuthoringError::InvalidMethod {
                file: file.to_path_buf(),
                line,
                method,
            })?;

    let pkg = pkg.trim();
    if pkg.is_empty() {
        return Err(ConfigAuthoringError::EmptyPackage {
            file: file.to_path_buf(),
            line,
            method: method.to_string(),
        });
    }

    Ok(Some(InstallInstruction::new(method, pkg)))
}
