use std::io;
use std::path::{Path, PathBuf};
use std::process::{Child, Output};
use std::thread;
use std::time::{Duration, Instant};

/// Check if a command is available in PATH.
pub fn is_command_available(cmd: &str) -> bool {
    find_command_path(cmd).is_some()
}

/// Find the full path of a command in PATH.
/// Returns the first matching executable path, or None if not found.
pub fn find_command_path(cmd: &str) -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;

    std::env::split_paths(&path_var).find_map(|dir| {
        let path = dir.join(cmd);
        if is_executable(&path) { Some(path) } else { None }
    })
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.is_file()
        && path
            .metadata()
            .map(|m| m.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Waits for a spawned child with a deadline, polling `try_wait`.
///
/// Returns `Ok(None)` when the deadline passes; the child is killed and
/// reaped so no zombie is left behind. Subprocesses run from hooks must
/// never block the session indefinitely.
pub fn wait_with_deadline(mut child: Child, timeout: Duration) -> io::Result<Option<Output>> {
    let deadline = Instant::now() + timeout;
    loop {
        if child.try_wait()?.is_some() {
            return child.wait_with_output().map(Some);
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            return Ok(None);
        }
        thread::sleep(Duration::from_millis(25));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_commands_available() {
        assert!(is_command_available("sh"));
    }

    #[test]
    fn nonexistent_command_not_available() {
        assert!(!is_command_available("definitely-not-a-real-command-12345"));
    }

    #[test]
    fn find_command_path_returns_path_for_existing_command() {
        let path = find_command_path("sh");
        assert!(path.is_some_and(|p| p.to_string_lossy().contains("sh")));
    }

    #[test]
    #[cfg(unix)]
    fn wait_with_deadline_collects_output_of_a_fast_child() {
        let child = std::process::Command::new("sh")
            .args(["-c", "echo hi"])
            .stdout(std::process::Stdio::piped())
            .spawn()
            .expect("spawn");

        let output = wait_with_deadline(child, Duration::from_secs(5))
            .expect("wait succeeds")
            .expect("child finished in time");

        assert!(output.status.success());
        assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "hi");
    }

    #[test]
    #[cfg(unix)]
    fn wait_with_deadline_kills_a_hung_child() {
        let child = std::process::Command::new("sh")
            .args(["-c", "sleep 10"])
            .spawn()
            .expect("spawn");

        let started = Instant::now();
        let result = wait_with_deadline(child, Duration::from_millis(200)).expect("wait succeeds");

        assert!(result.is_none());
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
