//! Settings document persistence: load, backup, atomic write-back.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::InstallError;
use super::merge::HooksDocument;

/// The settings.json document. Only the `hooks` field is interpreted;
/// every other top-level field is carried through untouched.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub hooks: HooksDocument,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Loads the settings document, or None when no file exists.
///
/// A file that exists but does not parse is a fatal error: merging into a
/// document we cannot represent would risk destroying user data, so the
/// caller must abort without writing anything (fail closed).
pub fn load(path: &Path) -> Result<Option<Settings>, InstallError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(InstallError::Read {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };

    serde_json::from_str(&content)
        .map(Some)
        .map_err(|e| InstallError::InvalidSettings {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

/// Copies the settings file to a timestamped sibling before mutation.
///
/// Returns the backup path, or None when the copy failed. Backup failure
/// only degrades to a warning; the install proceeds without rollback
/// capability rather than failing outright.
pub fn backup(path: &Path) -> Option<PathBuf> {
    let backup_path = backup_path_for(path, &Local::now().format("%Y%m%d_%H%M%S").to_string());
    match fs::copy(path, &backup_path) {
        Ok(_) => Some(backup_path),
        Err(e) => {
            eprintln!("[WARN] Failed to back up {}: {e}", path.display());
            None
        }
    }
}

/// `settings.json` → `settings.json.backup_<timestamp>` next to the original.
/// Second-resolution timestamps sort lexicographically.
fn backup_path_for(path: &Path, timestamp: &str) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "settings.json".to_string());
    path.with_file_name(format!("{file_name}.backup_{timestamp}"))
}

/// Writes the document atomically: serialize to a temporary file in the
/// same directory, then rename over the destination. An interrupted run
/// never leaves a half-written settings file behind.
pub fn write_atomic(path: &Path, settings: &Settings) -> Result<(), InstallError> {
    let io_err = |e: std::io::Error| InstallError::Write {
        path: path.to_path_buf(),
        source: e,
    };

    let dir = path.parent().ok_or_else(|| {
        io_err(std::io::Error::other("settings path has no parent directory"))
    })?;
    fs::create_dir_all(dir).map_err(io_err)?;

    let json = serde_json::to_string_pretty(settings).map_err(|e| InstallError::Write {
        path: path.to_path_buf(),
        source: std::io::Error::other(e),
    })?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
    tmp.write_all(json.as_bytes()).map_err(io_err)?;
    tmp.write_all(b"\n").map_err(io_err)?;
    tmp.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}
