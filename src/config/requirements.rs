//! Per-unit `INSTALL` and `DEPENDENCIES` files.
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::instruction::{InstallInstruction, parse_line};
use crate::error::{ConfigAuthoringError, HmError};

/// File holding a unit's own install instruction.
pub const INSTALL_FILE: &str = "INSTALL";

/// File holding a list of instructions, one per line.
pub const DEPENDENCIES_FILE: &str = "DEPENDENCIES";

/// What a unit needs installed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Requirements {
    /// The unit's own instruction; `None` when there is nothing to install.
    pub install: Option<InstallInstruction>,
    /// Instructions run before `install`, in file order.
    pub dependencies: Vec<InstallInstruction>,
}

impl Requirements {
    /// Read `INSTALL` and `DEPENDENCIES` from a unit directory.
    ///
    /// Missing files are not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if a file exists but cannot be read, or if its
    /// content is malformed.
    pub fn parse(dir: &Path) -> Result<Self, HmError> {
        Ok(Self {
            install: parse_install_file(&dir.join(INSTALL_FILE))?,
            dependencies: parse_dependencies_file(&dir.join(DEPENDENCIES_FILE))?,
        })
    }
}

/// Parse an `INSTALL` file.
///
/// A file whose content starts with `//` is commented out as a whole.
///
/// # Errors
///
/// Returns an error if the file cannot be read, holds more than one
/// non-empty line, or its single line is malformed.
pub fn parse_install_file(path: &Path) -> Result<Option<InstallInstruction>, HmError> {
    let Some(content) = read_optional(path)? else {
        return Ok(None);
    };

    if content.trim_start().starts_with("//") {
        tracing::debug!("skipping commented out install instruction in {}", path.display());
        return Ok(None);
    }

    let mut lines = content
        .lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty());
    let Some((idx, first)) = lines.next() else {
        return Ok(None);
    };
    let extra = lines.count();
    if extra > 0 {
        return Err(ConfigAuthoringError::MultipleInstallInstructions {
            file: path.to_path_buf(),
            count: extra + 1,
        }
        .into());
    }

    Ok(parse_line(first, path, idx + 1)?)
}

/// Parse a `DEPENDENCIES` file into an ordered list.
///
/// Blank and commented-out lines are skipped.
///
/// # Errors
///
/// Returns an error if the file cannot be read or any line is malformed.
pub fn parse_dependencies_file(path: &Path) -> Result<Vec<InstallInstruction>, HmError> {
    let Some(content) = read_optional(path)? else {
        return Ok(Vec::new());
    };

    let mut deps = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        if let Some(inst) = parse_line(line, path, idx + 1)? {
            deps.push(inst);
        }
    }
    Ok(deps)
}

fn read_optional(path: &Path) -> Result<Option<String>, HmError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(HmError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}
