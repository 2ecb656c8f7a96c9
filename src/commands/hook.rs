//! `pushover-notify hook <event>`: the runtime invoked by Claude Code.
//!
//! Reads the hook payload from stdin, builds a notification for the
//! event, and delivers it. A hook must never break the Claude session:
//! every failure past argument parsing is reported as a warning and the
//! process still exits zero.

use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::Local;
use clap::Args;
use indoc::formatdoc;
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::infra::notification::{self, Notification};
use crate::infra::{claude, transcript};
use crate::shared::dirs;
use crate::shared::env_var::EnvVars;

const MAX_MESSAGE_LEN: usize = 512;

#[derive(Args, Clone, PartialEq, Eq)]
pub struct HookArgs {
    /// Lifecycle event: user-prompt-submit, stop, or notification
    pub event: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HookEvent {
    UserPromptSubmit,
    Stop,
    Notification,
}

#[derive(Error, Debug)]
#[error("unknown hook event: {0}")]
pub struct UnknownEvent(String);

impl FromStr for HookEvent {
    type Err = UnknownEvent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user-prompt-submit" => Ok(Self::UserPromptSubmit),
            "stop" => Ok(Self::Stop),
            "notification" => Ok(Self::Notification),
            other => Err(UnknownEvent(other.to_string())),
        }
    }
}

impl fmt::Display for HookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::UserPromptSubmit => "user-prompt-submit",
            Self::Stop => "stop",
            Self::Notification => "notification",
        };
        write!(f, "{name}")
    }
}

/// The JSON payload Claude Code pipes to hook commands. Fields vary by
/// event; everything we do not model is kept in `_extra` for debug logs.
#[derive(Debug, Default, Deserialize)]
struct HookInput {
    #[serde(default)]
    session_id: Option<String>,
    #[serde(default)]
    cwd: Option<String>,
    #[serde(default)]
    transcript_path: Option<String>,
    #[serde(default)]
    prompt: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    notification_type: Option<String>,
    #[serde(flatten)]
    _extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum LogLevel {
    Off,
    Error,
    Debug,
}

impl LogLevel {
    fn from_env_value(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") | Some("0") | Some("false") => Self::Off,
            Some("debug") => Self::Debug,
            Some(_) => Self::Error,
        }
    }
}

#[tokio::main]
pub async fn run(args: &HookArgs) -> anyhow::Result<()> {
    let env = EnvVars::load();
    if env.disabled {
        return Ok(());
    }
    let log_level = LogLevel::from_env_value(env.hook_log.as_deref());

    let event = match args.event.parse::<HookEvent>() {
        Ok(event) => event,
        Err(e) => {
            warn(log_level, &format!("{e}"));
            return Ok(());
        }
    };

    let mut raw = String::new();
    if let Err(e) = std::io::stdin().read_to_string(&mut raw) {
        warn(log_level, &format!("failed to read hook input: {e}"));
        return Ok(());
    }
    let input: HookInput = match serde_json::from_str(&raw) {
        Ok(input) => input,
        Err(e) => {
            warn(
                log_level,
                &format!("failed to parse hook input for {event}: {e}"),
            );
            HookInput::default()
        }
    };

    if log_level >= LogLevel::Debug {
        log_payload(event, &raw, &input);
    }

    let stop_text = match event {
        HookEvent::Stop => stop_message(&input, &env),
        _ => None,
    };
    let notification = build_notification(event, &input, stop_text);

    match notification::send(&notification).await {
        Ok(delivery) => {
            if log_level >= LogLevel::Debug {
                eprintln!("[pushover-hook] delivered via {delivery}");
            }
        }
        Err(e) => warn(log_level, &format!("failed to deliver notification: {e}")),
    }
    Ok(())
}

fn warn(log_level: LogLevel, message: &str) {
    eprintln!("[pushover-hook] {message}");
    if log_level >= LogLevel::Error {
        write_hook_log(&format!("[ERROR] {message}\n"));
    }
}

fn log_payload(event: HookEvent, raw: &str, input: &HookInput) {
    let content = formatdoc! {"
        event: {event}
        session_id: {session}
        cwd: {cwd}
        payload: {raw}
    ",
        session = input.session_id.as_deref().unwrap_or("-"),
        cwd = input.cwd.as_deref().unwrap_or("-"),
    };
    write_hook_log(&content);
}

fn write_hook_log(content: &str) {
    let Some(base) = dirs::tool_cache_dir() else {
        eprintln!("[pushover-hook] failed to write hook log: no cache directory");
        return;
    };
    if let Err(e) = write_hook_log_to_dir(&base.join("logs"), content) {
        eprintln!("[pushover-hook] failed to write hook log: {e}");
    }
}

/// Log files can carry prompt text, so they are created owner-only.
fn write_hook_log_to_dir(dir: &Path, content: &str) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("hook_{}.log", Local::now().format("%Y%m%d_%H%M%S_%f")));
    std::fs::write(&path, content)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))?;
    }
    Ok(path)
}

/// Builds the title and body for an event. `stop_text` carries the
/// already-resolved summary for stop events.
fn build_notification(
    event: HookEvent,
    input: &HookInput,
    stop_text: Option<String>,
) -> Notification {
    match event {
        HookEvent::UserPromptSubmit => Notification {
            title: "Claude Code - Task started".to_string(),
            message: input
                .prompt
                .as_deref()
                .map(clean_text)
                .filter(|p| !p.is_empty())
                .map(|p| truncate_string(&p, MAX_MESSAGE_LEN))
                .unwrap_or_else(|| "New task submitted".to_string()),
        },
        HookEvent::Stop => Notification {
            title: "Claude Code - Task finished".to_string(),
            message: stop_text
                .map(|t| truncate_string(&clean_text(&t), MAX_MESSAGE_LEN))
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "Claude has finished the task".to_string()),
        },
        HookEvent::Notification => Notification {
            title: "Claude Code - Attention needed".to_string(),
            message: input
                .message
                .as_deref()
                .map(clean_text)
                .filter(|m| !m.is_empty())
                .map(|m| truncate_string(&m, MAX_MESSAGE_LEN))
                .unwrap_or_else(|| notification_fallback(input.notification_type.as_deref())),
        },
    }
}

fn notification_fallback(notification_type: Option<&str>) -> String {
    match notification_type {
        Some("permission_prompt") => "Claude needs permission to proceed",
        Some("idle_prompt") => "Claude is waiting for your input",
        _ => "Claude needs your attention",
    }
    .to_string()
}

/// Resolves the body for a stop event: the transcript's last assistant
/// message, condensed by the claude CLI when available and allowed.
fn stop_message(input: &HookInput, env: &EnvVars) -> Option<String> {
    let path = input.transcript_path.as_deref()?;
    let text = transcript::last_assistant_message(Path::new(path))?;

    if !env.no_summary {
        match claude::summarize(&text) {
            Ok(summary) => return Some(summary),
            Err(e) => eprintln!("[pushover-hook] summary unavailable, using raw text: {e}"),
        }
    }
    Some(text)
}

/// Collapses whitespace and strips ANSI escape sequences.
fn clean_text(text: &str) -> String {
    let stripped = lazy_regex::regex_replace_all!(r"\x1b\[[0-9;]*[A-Za-z]", text, "");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate_string(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let truncated: String = s.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{truncated}...")
}
