//! Version identifier resolution.
//!
//! A single resolution function with an explicit priority list:
//! `git describe` output, then a short commit hash, then the compiled-in
//! crate version. No mutable global state; callers resolve once per run.

use std::process::{Command, Stdio};
use std::time::Duration;

use crate::shared::command::wait_with_deadline;

/// Compiled-in fallback when no git metadata is available.
pub const FALLBACK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Git is local and fast; a query that runs longer than this is treated
/// as unavailable.
const GIT_TIMEOUT: Duration = Duration::from_secs(5);

/// Resolve the version identifier recorded in VERSION files and reports.
pub fn resolve_version() -> String {
    git_stdout(&["describe", "--tags", "--always"])
        .or_else(|| git_stdout(&["rev-parse", "--short", "HEAD"]))
        .unwrap_or_else(|| FALLBACK_VERSION.to_string())
}

/// Full commit hash of the source the installer was run from, if known.
pub fn git_commit() -> Option<String> {
    git_stdout(&["rev-parse", "HEAD"])
}

fn git_stdout(args: &[&str]) -> Option<String> {
    let child = Command::new("git")
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .ok()?;
    let output = wait_with_deadline(child, GIT_TIMEOUT).ok()??;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if text.is_empty() { None } else { Some(text) }
}
