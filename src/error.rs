//! Domain-specific error types for the hm engine.
//!
//! Internal modules return typed errors (e.g., [`InstructionError`],
//! [`ConfigAuthoringError`]) while command handlers at the CLI boundary
//! convert them to [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! HmError
//! ├── Instruction(InstructionError)          : command resolution
//! ├── ConfigAuthoring(ConfigAuthoringError)  : malformed INSTALL/DEPENDENCIES
//! ├── Lockfile(LockfileError)                : lockfile and diff persistence
//! └── Io                                     : unreadable source tree
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the hm engine.
#[derive(Error, Debug)]
pub enum HmError {
    /// An install or uninstall command could not be resolved.
    #[error("Instruction error: {0}")]
    Instruction(#[from] InstructionError),

    /// A unit's `INSTALL` or `DEPENDENCIES` file is malformed.
    #[error("Configuration authoring error: {0}")]
    ConfigAuthoring(#[from] ConfigAuthoringError),

    /// The lockfile or diff could not be read or written.
    #[error("Lockfile error: {0}")]
    Lockfile(#[from] LockfileError),

    /// A source directory or unit file could not be read.
    #[error("IO error reading {}: {source}", path.display())]
    Io {
        /// Path that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors that arise while turning an install instruction into a command line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InstructionError {
    /// The method has no command for the requested action.
    #[error("method '{method}' does not support {action}")]
    UnsupportedMethod {
        /// Method name as written in the instruction.
        method: String,
        /// `"install"` or `"uninstall"`.
        action: &'static str,
    },

    /// A logical method was used but the host probe found no backend for it.
    #[error("couldn't detect {kind} package manager")]
    NoBackendDetected {
        /// `"system"` or `"aur"`.
        kind: &'static str,
    },
}

/// Defects in the user's configuration repository.
///
/// These are reported with file and line context so the author can fix the
/// offending file; they abort the run before anything is mirrored or installed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigAuthoringError {
    /// The method part of a `method:package` line is not a known method.
    #[error("{}:{line}: invalid installation method '{method}'", file.display())]
    InvalidMethod {
        /// File containing the instruction.
        file: PathBuf,
        /// 1-based line number.
        line: usize,
        /// The offending method name.
        method: String,
    },

    /// The line has no `:` separating method and package.
    #[error("{}:{line}: expected 'method:package', got '{text}'", file.display())]
    MissingSeparator {
        /// File containing the instruction.
        file: PathBuf,
        /// 1-based line number.
        line: usize,
        /// The offending line.
        text: String,
    },

    /// The package part of a `method:package` line is empty.
    #[error("{}:{line}: missing package after '{method}:'", file.display())]
    EmptyPackage {
        /// File containing the instruction.
        file: PathBuf,
        /// 1-based line number.
        line: usize,
        /// Method named on the line.
        method: String,
    },

    /// An `INSTALL` file holds more than one instruction.
    #[error("{}: INSTALL must contain a single instruction, found {count}", file.display())]
    MultipleInstallInstructions {
        /// The `INSTALL` file.
        file: PathBuf,
        /// Number of non-empty lines found.
        count: usize,
    },

    /// A unit exists both as `<name>` and as `.<name>` in the source tree.
    #[error(
        "unit '{name}' is both visible and hidden: {} and {}",
        visible.display(),
        hidden.display()
    )]
    VisibleAndHidden {
        /// Unit name without the leading dot.
        name: String,
        /// The visible unit directory.
        visible: PathBuf,
        /// The dot-prefixed unit directory.
        hidden: PathBuf,
    },
}

/// Errors that arise when reading or writing persisted state.
#[derive(Error, Debug)]
pub enum LockfileError {
    /// The file exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// Path of the file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The file was read but is not a valid lockfile.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        /// Path of the file.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// The value could not be serialized.
    #[error("failed to serialize {}: {source}", path.display())]
    Serialize {
        /// Destination path.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// The file could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        /// Path of the file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}
