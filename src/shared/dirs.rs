use std::path::PathBuf;

/// Returns the user's home directory from the HOME environment variable.
pub fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(PathBuf::from)
}

/// Returns the XDG cache directory (~/.cache or $XDG_CACHE_HOME).
/// Empty values are treated as unset per XDG Base Directory Specification.
pub fn cache_dir() -> Option<PathBuf> {
    if let Some(xdg) = non_empty_env("XDG_CACHE_HOME") {
        return Some(PathBuf::from(xdg));
    }
    home_dir().map(|home| home.join(".cache"))
}

/// Base cache directory for this tool (~/.cache/pushover-hook).
pub fn tool_cache_dir() -> Option<PathBuf> {
    cache_dir().map(|d| d.join("pushover-hook"))
}

/// Returns the value of an environment variable, treating empty strings as unset.
fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
