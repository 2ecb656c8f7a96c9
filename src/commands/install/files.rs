//! Filesystem side of an install: directories, the hook binary, cleanup
//! of previous generations, and the VERSION metadata file.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;

use super::error::InstallError;
use crate::shared::layout::{ClaudeLayout, HOOK_BINARY, VERSION_FILE};

/// Files removed from the old flat hooks directory during migration.
const OLD_LAYOUT_FILES: &[&str] = &[HOOK_BINARY, "debug.log"];

/// Creates the hook subdirectory and the cache directory.
pub fn create_directories(layout: &ClaudeLayout) -> Result<(), InstallError> {
    for dir in [layout.hook_dir(), layout.cache_dir()] {
        fs::create_dir_all(&dir).map_err(|e| InstallError::Write {
            path: dir.clone(),
            source: e,
        })?;
    }
    Ok(())
}

/// Copies the running executable into the new-layout hook path and marks
/// it executable.
pub fn install_hook_binary(layout: &ClaudeLayout) -> Result<PathBuf, InstallError> {
    let source = std::env::current_exe().map_err(InstallError::CurrentExe)?;
    let dest = layout.hook_binary_path();

    fs::copy(&source, &dest).map_err(|e| InstallError::InstallBinary {
        path: dest.clone(),
        source: e,
    })?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&dest, fs::Permissions::from_mode(0o755)).map_err(|e| {
            InstallError::InstallBinary {
                path: dest.clone(),
                source: e,
            }
        })?;
    }

    Ok(dest)
}

/// Removes leftovers from previous generations: the flat-layout hook
/// files and the legacy disable flag. Failures are warnings; an install
/// never fails because an old file would not go away.
pub fn cleanup_old_files(layout: &ClaudeLayout) -> Vec<PathBuf> {
    let mut candidates: Vec<PathBuf> = OLD_LAYOUT_FILES
        .iter()
        .map(|name| layout.hooks_dir().join(name))
        .collect();
    candidates.push(layout.legacy_disable_flag());

    let mut removed = Vec::new();
    for path in candidates {
        if !path.exists() {
            continue;
        }
        match fs::remove_file(&path) {
            Ok(()) => removed.push(path),
            Err(e) => eprintln!("[WARN] Failed to remove {}: {e}", path.display()),
        }
    }
    removed
}

/// Removes files in the hook subdirectory that this version no longer
/// ships, keeping only the binary and the VERSION file.
pub fn cleanup_obsolete_files(layout: &ClaudeLayout) -> Vec<PathBuf> {
    let expected = [HOOK_BINARY, VERSION_FILE];
    let Ok(entries) = fs::read_dir(layout.hook_dir()) else {
        return Vec::new();
    };

    let mut removed = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let keep = path
            .file_name()
            .is_some_and(|name| expected.iter().any(|e| name == *e));
        if keep {
            continue;
        }
        match fs::remove_file(&path) {
            Ok(()) => removed.push(path),
            Err(e) => eprintln!("[WARN] Failed to remove {}: {e}", path.display()),
        }
    }
    removed
}

/// Writes the VERSION metadata file next to the installed binary.
pub fn write_version_file(
    layout: &ClaudeLayout,
    version: &str,
    git_commit: Option<&str>,
) -> Result<(), InstallError> {
    let installed_at = Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
    let commit = git_commit.unwrap_or("unknown");
    let content = format!("version={version}\ninstalled_at={installed_at}\ngit_commit={commit}\n");

    write_file(&layout.version_path(), &content)
}

fn write_file(path: &Path, content: &str) -> Result<(), InstallError> {
    fs::write(path, content).map_err(|e| InstallError::Write {
        path: path.to_path_buf(),
        source: e,
    })
}
