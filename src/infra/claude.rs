//! Shells out to the `claude` CLI for one-line summaries.

use std::io::Write;
use std::process::{Command, Stdio};
use std::time::Duration;

use anyhow::{Context, bail};

use crate::shared::command::wait_with_deadline;

const SUMMARY_PROMPT: &str = "Summarize the following assistant reply in one short sentence \
                              suitable for a push notification. Reply with the sentence only.";

/// A stalled CLI must not hold up the stop hook; past this bound the
/// caller uses the raw transcript text instead.
const SUMMARY_TIMEOUT: Duration = Duration::from_secs(5);

/// Condenses `text` with `claude -p`. Callers fall back to the raw text
/// when the CLI is missing, misbehaves, or runs past the deadline.
pub fn summarize(text: &str) -> anyhow::Result<String> {
    summarize_with_timeout(text, SUMMARY_TIMEOUT)
}

fn summarize_with_timeout(text: &str, timeout: Duration) -> anyhow::Result<String> {
    let mut child = Command::new("claude")
        .args(["-p", SUMMARY_PROMPT])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .context("failed to launch the claude CLI")?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(text.as_bytes())
            .context("failed to pass text to the claude CLI")?;
    }

    let Some(output) =
        wait_with_deadline(child, timeout).context("claude CLI did not finish")?
    else {
        bail!("claude CLI timed out after {}s", timeout.as_secs_f32());
    };
    if !output.status.success() {
        bail!("claude CLI exited with {}", output.status);
    }

    let summary = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if summary.is_empty() {
        bail!("claude CLI returned an empty summary");
    }
    Ok(summary)
}
