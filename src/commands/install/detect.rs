//! Pure detection of any existing installation in a target directory.
//!
//! Probes are existence checks only. An unreadable or malformed file is
//! treated the same as an absent one, so detection can never fail.

use std::fs;
use std::path::Path;

use crate::shared::layout::ClaudeLayout;

/// What already exists in the target, computed once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallationState {
    /// `.claude/settings.json` exists.
    pub has_settings: bool,
    /// Hook binary in the old flat layout (`.claude/hooks/`).
    pub has_old_layout_hook: bool,
    /// Hook binary in the current subdirectory layout.
    pub has_new_layout_hook: bool,
    /// Version recorded by a previous install, if readable.
    pub installed_version: Option<String>,
}

pub fn detect(layout: &ClaudeLayout) -> InstallationState {
    InstallationState {
        has_settings: layout.settings_path().exists(),
        has_old_layout_hook: layout.old_hook_path().exists(),
        has_new_layout_hook: layout.hook_binary_path().exists(),
        installed_version: installed_version(&layout.version_path()),
    }
}

/// Reads the installed version from a VERSION metadata file.
///
/// Format is `key=value` per line; the first `version=` line wins.
/// Missing or malformed files yield None, never an error.
fn installed_version(version_path: &Path) -> Option<String> {
    let content = fs::read_to_string(version_path).ok()?;
    content
        .lines()
        .find_map(|line| line.strip_prefix("version="))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
