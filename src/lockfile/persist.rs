//! Reading and writing the lockfile and diff as JSON.
use std::path::Path;

use serde::Serialize;

use super::Lockfile;
use crate::error::LockfileError;

/// Read the persisted lockfile, or an empty default when none exists yet.
///
/// The default is not written to disk.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn read_or_default(path: &Path) -> Result<Lockfile, LockfileError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("no lockfile at {}, starting empty", path.display());
            return Ok(Lockfile::default());
        }
        Err(source) => {
            return Err(LockfileError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    serde_json::from_str(&content).map_err(|source| LockfileError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize `value`; compact when `indent` is empty, otherwise pretty
/// printed with `indent` as the indentation unit.
///
/// # Errors
///
/// Returns an error if `value` cannot be serialized.
pub fn to_json<T: Serialize>(value: &T, indent: &str) -> Result<String, serde_json::Error> {
    if indent.is_empty() {
        return serde_json::to_string(value);
    }
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    // serde_json only ever emits UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write `value` to `path` as JSON, replacing the file.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn save<T: Serialize>(value: &T, path: &Path, indent: &str) -> Result<(), LockfileError> {
    let json = to_json(value, indent).map_err(|source| LockfileError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, json).map_err(|source| LockfileError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!("wrote {}", path.display());
    Ok(())
}
