//! On-disk layout of a Claude Code project directory.
//!
//! Two hook layout generations exist:
//! - old (flat): `.claude/hooks/pushover-notify`
//! - new: `.claude/hooks/pushover-hook/pushover-notify` plus a `VERSION`
//!   metadata file next to the binary.
//!
//! All path construction goes through [`ClaudeLayout`] so the installer,
//! the detector, and `doctor` agree on where things live.

use std::path::{Path, PathBuf};

/// Settings file name under `.claude/`.
pub const SETTINGS_FILE: &str = "settings.json";

/// Name of the installed hook binary. Also the legacy ownership marker:
/// a hook command mentioning this name is treated as ours (see merge).
pub const HOOK_BINARY: &str = "pushover-notify";

/// Subdirectory holding the current-generation installation.
pub const HOOK_SUBDIR: &str = "pushover-hook";

/// Metadata file written next to the hook binary on install.
pub const VERSION_FILE: &str = "VERSION";

/// Resolved paths under a target project's `.claude` directory.
#[derive(Debug, Clone)]
pub struct ClaudeLayout {
    claude_dir: PathBuf,
}

impl ClaudeLayout {
    pub fn new(target_dir: &Path) -> Self {
        Self {
            claude_dir: target_dir.join(".claude"),
        }
    }

    pub fn claude_dir(&self) -> &Path {
        &self.claude_dir
    }

    pub fn settings_path(&self) -> PathBuf {
        self.claude_dir.join(SETTINGS_FILE)
    }

    pub fn hooks_dir(&self) -> PathBuf {
        self.claude_dir.join("hooks")
    }

    /// Old flat-layout hook path (pre-subdirectory installs).
    pub fn old_hook_path(&self) -> PathBuf {
        self.hooks_dir().join(HOOK_BINARY)
    }

    /// Directory holding the current-generation installation.
    pub fn hook_dir(&self) -> PathBuf {
        self.hooks_dir().join(HOOK_SUBDIR)
    }

    pub fn hook_binary_path(&self) -> PathBuf {
        self.hook_dir().join(HOOK_BINARY)
    }

    pub fn version_path(&self) -> PathBuf {
        self.hook_dir().join(VERSION_FILE)
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.claude_dir.join("cache")
    }

    /// Legacy opt-out flag file removed during cleanup.
    pub fn legacy_disable_flag(&self) -> PathBuf {
        self.claude_dir.join(".no-pushover")
    }
}

/// Command string written into settings. Uses CLAUDE_PROJECT_DIR so the
/// settings file stays portable when the project directory moves.
pub fn hook_command(event: &str) -> String {
    format!("\"$CLAUDE_PROJECT_DIR/.claude/hooks/{HOOK_SUBDIR}/{HOOK_BINARY}\" hook {event}")
}
