//! `pushover-notify install`: the installation planner and config merger.
//!
//! Detects any prior installation, picks one of five install actions,
//! places the hook binary, and merges our hook bindings into the
//! project's settings.json without disturbing anything the user owns.

mod action;
pub(crate) mod detect;
mod error;
mod files;
pub(crate) mod merge;
pub(crate) mod settings;

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use clap::Args;
use indoc::formatdoc;
use serde_json::{Map, json};

use crate::shared::command::is_command_available;
use crate::shared::env_var::EnvVars;
use crate::shared::layout::ClaudeLayout;
use crate::version;
use action::{InstallAction, determine_action};
use error::InstallError;
use merge::MergeReport;
use settings::Settings;

#[derive(Args, Clone, PartialEq, Eq)]
pub struct InstallArgs {
    /// Target project directory (required in non-interactive mode)
    #[arg(short = 't', long)]
    pub target_dir: Option<PathBuf>,

    /// Force reinstall, overwriting existing files
    #[arg(long)]
    pub force: bool,

    /// Never prompt; emit a single JSON status line instead
    #[arg(long)]
    pub non_interactive: bool,

    /// Skip the post-install environment report
    #[arg(long)]
    pub skip_diagnostics: bool,

    /// Reduce output
    #[arg(long)]
    pub quiet: bool,

    /// Hook execution timeout written into settings, in seconds
    #[arg(long, default_value_t = 15)]
    pub timeout: u64,
}

/// Everything `run_install` decided and did, for reporting.
#[derive(Debug)]
pub struct InstallReport {
    pub action: InstallAction,
    pub version: String,
    pub previous_version: Option<String>,
    pub hook_dir: PathBuf,
    pub settings_path: PathBuf,
    pub backup_path: Option<PathBuf>,
    pub merge: MergeReport,
    pub removed_files: Vec<PathBuf>,
}

/// Options for the core pipeline, separated from the CLI surface.
struct InstallOptions {
    force: bool,
    timeout: u64,
}

pub fn run(args: &InstallArgs) -> anyhow::Result<()> {
    let ui = Ui {
        quiet: args.quiet,
        non_interactive: args.non_interactive,
    };
    ui.banner();

    let target = match resolve_target_dir(args, &ui) {
        Ok(Resolved::Dir(target)) => target,
        Ok(Resolved::Cancelled) => return finish_cancelled(&ui),
        Err(e) => return fail(&ui, e.into()),
    };

    let options = InstallOptions {
        force: args.force,
        timeout: args.timeout,
    };
    let report = match run_install(&target, &options) {
        Ok(report) => report,
        Err(e) => return fail(&ui, e.into()),
    };

    ui.report(&report);
    if !args.skip_diagnostics {
        ui.environment_status();
    }
    ui.completion(&report);

    if ui.non_interactive {
        println!("{}", success_status(&report));
    }
    Ok(())
}

/// Batch-mode status lines. Non-interactive runs emit exactly one of
/// these as their only stdout, never a backtrace.
fn success_status(report: &InstallReport) -> serde_json::Value {
    json!({
        "status": "success",
        "action": report.action.as_str(),
        "hook_path": report.hook_dir,
        "settings_path": report.settings_path,
        "backup_path": report.backup_path,
        "version": report.version,
    })
}

fn error_status(error: &anyhow::Error) -> serde_json::Value {
    json!({"status": "error", "message": error.to_string()})
}

fn cancelled_status() -> serde_json::Value {
    json!({"status": "cancelled", "message": "Installation cancelled"})
}

/// The core pipeline: detect, choose, place files, merge, write back.
/// Silent; callers decide how to render the report.
fn run_install(target: &Path, options: &InstallOptions) -> Result<InstallReport, InstallError> {
    let layout = ClaudeLayout::new(target);
    let state = detect::detect(&layout);
    let action = determine_action(&state, options.force);

    files::create_directories(&layout)?;
    files::install_hook_binary(&layout)?;
    let mut removed_files = files::cleanup_old_files(&layout);
    removed_files.extend(files::cleanup_obsolete_files(&layout));

    let resolved_version = version::resolve_version();
    files::write_version_file(&layout, &resolved_version, version::git_commit().as_deref())?;

    let incoming = merge::managed_hooks(options.timeout);
    let settings_path = layout.settings_path();

    let (document, backup_path, merge_report) = match action {
        InstallAction::FreshInstall => {
            // --force can land here with a settings file present; keep a
            // copy before overwriting it wholesale.
            let backup = settings_path
                .exists()
                .then(|| settings::backup(&settings_path))
                .flatten();
            let report = MergeReport {
                added_events: incoming.keys().cloned().collect(),
                ..MergeReport::default()
            };
            let document = Settings {
                hooks: incoming,
                extra: Map::new(),
            };
            (document, backup, report)
        }
        InstallAction::MigrateFromOld
        | InstallAction::BackupAndUpgrade
        | InstallAction::MergeToExisting
        | InstallAction::MergeSettingsOnly => {
            // Parse before backing up: an unreadable document aborts the
            // whole install with nothing written and nothing copied.
            match settings::load(&settings_path)? {
                Some(existing) => {
                    let backup = settings::backup(&settings_path);
                    let (hooks, report) = merge::merge(&existing.hooks, &incoming);
                    let document = Settings {
                        hooks,
                        extra: existing.extra,
                    };
                    (document, backup, report)
                }
                None => {
                    let report = MergeReport {
                        added_events: incoming.keys().cloned().collect(),
                        ..MergeReport::default()
                    };
                    let document = Settings {
                        hooks: incoming,
                        extra: Map::new(),
                    };
                    (document, None, report)
                }
            }
        }
    };

    settings::write_atomic(&settings_path, &document)?;

    Ok(InstallReport {
        action,
        version: resolved_version,
        previous_version: state.installed_version,
        hook_dir: layout.hook_dir(),
        settings_path,
        backup_path,
        merge: merge_report,
        removed_files,
    })
}

enum Resolved {
    Dir(PathBuf),
    Cancelled,
}

fn resolve_target_dir(args: &InstallArgs, ui: &Ui) -> Result<Resolved, InstallError> {
    if let Some(target) = &args.target_dir {
        if !target.exists() {
            if args.non_interactive {
                return Err(InstallError::TargetMissing(target.clone()));
            }
            match confirm(&format!(
                "Directory does not exist: {}\nCreate it?",
                target.display()
            )) {
                Some(true) => {
                    std::fs::create_dir_all(target).map_err(|e| InstallError::Write {
                        path: target.clone(),
                        source: e,
                    })?;
                }
                Some(false) | None => return Ok(Resolved::Cancelled),
            }
        }
        check_writable(target)?;
        ui.info(format!("[OK] Target directory: {}", target.display()));
        return Ok(Resolved::Dir(target.clone()));
    }

    if args.non_interactive {
        return Err(InstallError::TargetRequired);
    }

    ui.info("Enter the path to your Claude Code project.");
    ui.info("This is where the .claude folder will be created.");
    loop {
        let Some(input) = prompt("Target directory path: ") else {
            return Ok(Resolved::Cancelled);
        };
        let input = input.trim().trim_matches(['"', '\'']);
        if input.is_empty() {
            continue;
        }

        let target = PathBuf::from(input);
        if !target.exists() {
            match confirm(&format!(
                "Directory does not exist: {}\nCreate it?",
                target.display()
            )) {
                Some(true) => {
                    if let Err(e) = std::fs::create_dir_all(&target) {
                        eprintln!("[ERROR] Failed to create directory: {e}");
                        continue;
                    }
                }
                Some(false) => continue,
                None => return Ok(Resolved::Cancelled),
            }
        }
        if let Err(e) = check_writable(&target) {
            eprintln!("[ERROR] {e}");
            continue;
        }
        ui.info(format!("[OK] Target directory: {}", target.display()));
        return Ok(Resolved::Dir(target));
    }
}

/// Probe writability by creating and removing a scratch file.
fn check_writable(target: &Path) -> Result<(), InstallError> {
    let probe = target.join(".write_test");
    std::fs::write(&probe, "")
        .and_then(|()| std::fs::remove_file(&probe))
        .map_err(|e| InstallError::TargetNotWritable {
            path: target.to_path_buf(),
            source: e,
        })
}

/// Reads one line from stdin. None means the input stream is gone, which
/// is treated as cancellation by callers.
fn prompt(message: &str) -> Option<String> {
    print!("{message}");
    io::stdout().flush().ok()?;
    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line),
    }
}

fn confirm(message: &str) -> Option<bool> {
    let answer = prompt(&format!("{message} (y/n): "))?;
    Some(answer.trim().eq_ignore_ascii_case("y"))
}

fn finish_cancelled(ui: &Ui) -> anyhow::Result<()> {
    if ui.non_interactive {
        println!("{}", cancelled_status());
        std::process::exit(1);
    }
    println!("[INFO] Installation cancelled.");
    Ok(())
}

/// Renders a fatal error for the active mode and exits non-zero. In batch
/// mode the only output is the structured status line, never a backtrace.
fn fail(ui: &Ui, error: anyhow::Error) -> anyhow::Result<()> {
    if ui.non_interactive {
        println!("{}", error_status(&error));
        std::process::exit(1);
    }
    Err(error)
}

/// Interactive progress output. Silent in quiet and non-interactive modes.
struct Ui {
    quiet: bool,
    non_interactive: bool,
}

impl Ui {
    fn info(&self, message: impl AsRef<str>) {
        if !self.quiet && !self.non_interactive {
            println!("{}", message.as_ref());
        }
    }

    fn banner(&self) {
        if self.non_interactive {
            return;
        }
        self.info(formatdoc! {"
            Claude Code Pushover Hook installer ({version})
            ------------------------------------------------",
            version = version::resolve_version(),
        });
    }

    fn report(&self, report: &InstallReport) {
        self.info(format!("[INFO] Installation action: {}", report.action.as_str()));
        if let Some(previous) = &report.previous_version {
            self.info(format!(
                "[INFO] Upgrading from {previous} to {}",
                report.version
            ));
        }
        self.info(format!("[OK] Hook installed: {}", report.hook_dir.display()));
        for removed in &report.removed_files {
            self.info(format!("[OK] Removed old file: {}", removed.display()));
        }
        if let Some(backup) = &report.backup_path {
            self.info(format!("[OK] Backed up settings to: {}", backup.display()));
        }
        for event in &report.merge.added_events {
            self.info(format!("[INFO] Added hooks for event: {event}"));
        }
        if report.merge.replaced > 0 {
            self.info(format!(
                "[INFO] Replaced {} previously installed hook binding(s)",
                report.merge.replaced
            ));
        }
        self.info(format!(
            "[OK] Settings written: {}",
            report.settings_path.display()
        ));
    }

    fn environment_status(&self) {
        if self.non_interactive {
            return;
        }
        let env = EnvVars::load();
        let mark = |present: bool| if present { "[OK]" } else { "[MISSING]" };
        self.info("");
        self.info("Environment status");
        self.info(format!(
            "  {}: {}",
            EnvVars::token_name(),
            mark(env.token.is_some())
        ));
        self.info(format!(
            "  {}: {}",
            EnvVars::user_name(),
            mark(env.user.is_some())
        ));
        self.info(format!(
            "  claude CLI: {}",
            if is_command_available("claude") {
                "[OK]"
            } else {
                "[NOT FOUND] (stop summaries will use raw transcript text)"
            }
        ));

        if !env.has_credentials() {
            self.info("");
            self.info(formatdoc! {"
                Pushover credentials are not configured. Set:
                  export {token}=your_app_token   # from https://pushover.net/apps
                  export {user}=your_user_key     # from https://pushover.net/
                Without them, notifications fall back to the local desktop.",
                token = EnvVars::token_name(),
                user = EnvVars::user_name(),
            });
        }
    }

    fn completion(&self, report: &InstallReport) {
        if self.non_interactive {
            return;
        }
        self.info("");
        self.info(formatdoc! {"
            Installation complete ({action}).
            Next steps:
              1. Verify the setup:     {binary} doctor --target-dir <project>
              2. Send a test message:  {binary} test
              3. Trigger a Claude Code task and watch for notifications.",
            action = report.action.as_str(),
            binary = report.hook_dir.join(crate::shared::layout::HOOK_BINARY).display(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::merge::binding_is_owned;
    use std::fs;
    use tempfile::TempDir;

    const EVENTS: [&str; 3] = ["Notification", "Stop", "UserPromptSubmit"];

    fn options() -> InstallOptions {
        InstallOptions {
            force: false,
            timeout: 15,
        }
    }

    fn load_settings(target: &Path) -> Settings {
        let path = ClaudeLayout::new(target).settings_path();
        settings::load(&path)
            .expect("settings readable")
            .expect("settings present")
    }

    fn backup_files(target: &Path) -> Vec<PathBuf> {
        let claude_dir = ClaudeLayout::new(target).claude_dir().to_path_buf();
        fs::read_dir(claude_dir)
            .map(|entries| {
                entries
                    .flatten()
                    .map(|e| e.path())
                    .filter(|p| {
                        p.file_name()
                            .is_some_and(|n| n.to_string_lossy().contains(".backup_"))
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn assert_fresh_outcome(document: &Settings) {
        assert_eq!(document.hooks.len(), 3);
        for event in EVENTS {
            let bindings = &document.hooks[event];
            assert_eq!(bindings.len(), 1, "one binding for {event}");
            assert!(binding_is_owned(&bindings[0]), "{event} binding is ours");
        }
    }

    // Scenario: empty target directory.
    #[test]
    fn fresh_install_into_empty_target() {
        let dir = TempDir::new().expect("temp dir");

        let report = run_install(dir.path(), &options()).expect("install succeeds");

        assert_eq!(report.action, InstallAction::FreshInstall);
        assert!(report.backup_path.is_none());
        assert!(ClaudeLayout::new(dir.path()).hook_binary_path().exists());
        assert!(ClaudeLayout::new(dir.path()).version_path().exists());
        assert_fresh_outcome(&load_settings(dir.path()));
    }

    // Scenario: old flat layout plus user settings with an unrelated event.
    #[test]
    fn migrate_from_old_preserves_unrelated_entries() {
        let dir = TempDir::new().expect("temp dir");
        let layout = ClaudeLayout::new(dir.path());
        fs::create_dir_all(layout.hooks_dir()).expect("hooks dir");
        fs::write(layout.old_hook_path(), "").expect("old hook");
        fs::write(
            layout.settings_path(),
            serde_json::json!({
                "hooks": {
                    "CustomEvent": [
                        {"hooks": [{"type": "command", "command": "~/bin/custom"}]}
                    ]
                },
                "model": "opus"
            })
            .to_string(),
        )
        .expect("settings");

        let report = run_install(dir.path(), &options()).expect("install succeeds");

        assert_eq!(report.action, InstallAction::MigrateFromOld);
        assert!(report.backup_path.is_some());
        assert_eq!(backup_files(dir.path()).len(), 1);
        assert!(!layout.old_hook_path().exists(), "flat hook cleaned up");

        let document = load_settings(dir.path());
        assert_eq!(document.extra["model"], "opus");
        let custom = &document.hooks["CustomEvent"];
        assert_eq!(custom.len(), 1);
        assert_eq!(custom[0].hooks[0].command, "~/bin/custom");
        for event in EVENTS {
            assert!(document.hooks.contains_key(event), "{event} merged in");
        }
    }

    // Scenario: hook files already in place, no settings file.
    #[test]
    fn merge_settings_only_equals_fresh_outcome() {
        let dir = TempDir::new().expect("temp dir");
        let layout = ClaudeLayout::new(dir.path());
        fs::create_dir_all(layout.hook_dir()).expect("hook dir");
        fs::write(layout.hook_binary_path(), "").expect("hook binary");

        let report = run_install(dir.path(), &options()).expect("install succeeds");

        assert_eq!(report.action, InstallAction::MergeSettingsOnly);
        assert_fresh_outcome(&load_settings(dir.path()));
    }

    // Scenario: malformed settings file. Fail closed: no write, no backup.
    #[test]
    fn malformed_settings_abort_without_touching_anything() {
        let dir = TempDir::new().expect("temp dir");
        let layout = ClaudeLayout::new(dir.path());
        fs::create_dir_all(layout.claude_dir()).expect("claude dir");
        fs::write(layout.settings_path(), "{ definitely not json").expect("settings");

        let err = run_install(dir.path(), &options()).expect_err("must fail");

        assert!(matches!(err, InstallError::InvalidSettings { .. }));
        assert_eq!(
            fs::read_to_string(layout.settings_path()).expect("still readable"),
            "{ definitely not json",
            "original file untouched"
        );
        assert!(backup_files(dir.path()).is_empty(), "no backup created");
    }

    // Scenario: stale double-install left two owned bindings on one event.
    #[test]
    fn stale_double_install_is_collapsed() {
        let dir = TempDir::new().expect("temp dir");
        let layout = ClaudeLayout::new(dir.path());
        fs::create_dir_all(layout.claude_dir()).expect("claude dir");
        let stale = serde_json::json!({
            "hooks": {
                "Stop": [
                    {"hooks": [{"type": "command",
                                "command": "\"$CLAUDE_PROJECT_DIR/.claude/hooks/pushover-notify\" hook stop"}]},
                    {"hooks": [{"type": "command",
                                "command": "\"$CLAUDE_PROJECT_DIR/.claude/hooks/pushover-hook/pushover-notify\" hook stop",
                                "timeout": 5}]}
                ]
            }
        });
        fs::write(layout.settings_path(), stale.to_string()).expect("settings");

        run_install(dir.path(), &options()).expect("install succeeds");

        let document = load_settings(dir.path());
        let owned: Vec<_> = document.hooks["Stop"]
            .iter()
            .filter(|b| binding_is_owned(b))
            .collect();
        assert_eq!(owned.len(), 1, "exactly one owned binding survives");
        assert_eq!(owned[0].hooks[0].timeout, Some(15));
    }

    #[test]
    fn installing_twice_is_idempotent() {
        let dir = TempDir::new().expect("temp dir");

        run_install(dir.path(), &options()).expect("first install");
        let first = load_settings(dir.path());

        let report = run_install(dir.path(), &options()).expect("second install");
        let second = load_settings(dir.path());

        assert_eq!(report.action, InstallAction::MergeToExisting);
        assert_eq!(first, second);
    }

    #[test]
    fn force_reinstall_backs_up_before_overwriting() {
        let dir = TempDir::new().expect("temp dir");
        let layout = ClaudeLayout::new(dir.path());
        fs::create_dir_all(layout.claude_dir()).expect("claude dir");
        fs::write(
            layout.settings_path(),
            serde_json::json!({"model": "opus"}).to_string(),
        )
        .expect("settings");

        let forced = InstallOptions {
            force: true,
            timeout: 15,
        };
        let report = run_install(dir.path(), &forced).expect("install succeeds");

        assert_eq!(report.action, InstallAction::FreshInstall);
        assert!(report.backup_path.is_some());
        // Fresh install replaces the document wholesale.
        let document = load_settings(dir.path());
        assert!(document.extra.get("model").is_none());
        assert_fresh_outcome(&document);
    }

    #[test]
    fn timeout_flag_flows_into_written_bindings() {
        let dir = TempDir::new().expect("temp dir");
        let opts = InstallOptions {
            force: false,
            timeout: 30,
        };

        run_install(dir.path(), &opts).expect("install succeeds");

        let document = load_settings(dir.path());
        for event in EVENTS {
            assert_eq!(document.hooks[event][0].hooks[0].timeout, Some(30));
        }
    }

    #[test]
    fn writability_probe_cleans_up_after_itself() {
        let dir = TempDir::new().expect("temp dir");
        check_writable(dir.path()).expect("writable");
        assert!(!dir.path().join(".write_test").exists());
    }

    #[test]
    fn report_lists_removed_obsolete_files() {
        let dir = TempDir::new().expect("temp dir");
        let layout = ClaudeLayout::new(dir.path());
        fs::create_dir_all(layout.hook_dir()).expect("hook dir");
        let stale = layout.hook_dir().join("diagnose.py");
        fs::write(&stale, "").expect("stale file");

        let report = run_install(dir.path(), &options()).expect("install succeeds");

        assert!(report.removed_files.contains(&stale));
        assert!(!stale.exists());
    }

    fn sample_report() -> InstallReport {
        InstallReport {
            action: InstallAction::FreshInstall,
            version: "1.2.3".to_string(),
            previous_version: None,
            hook_dir: PathBuf::from("/p/.claude/hooks/pushover-hook"),
            settings_path: PathBuf::from("/p/.claude/settings.json"),
            backup_path: None,
            merge: MergeReport::default(),
            removed_files: Vec::new(),
        }
    }

    #[test]
    fn success_status_line_carries_action_and_paths() {
        let value = success_status(&sample_report());

        assert_eq!(value["status"], "success");
        assert_eq!(value["action"], "fresh_install");
        assert_eq!(value["hook_path"], "/p/.claude/hooks/pushover-hook");
        assert_eq!(value["settings_path"], "/p/.claude/settings.json");
        assert_eq!(value["version"], "1.2.3");
        assert!(value["backup_path"].is_null());
    }

    #[test]
    fn success_status_line_includes_backup_when_one_was_taken() {
        let mut report = sample_report();
        report.backup_path = Some(PathBuf::from(
            "/p/.claude/settings.json.backup_20260830_120000",
        ));

        let value = success_status(&report);

        assert_eq!(
            value["backup_path"],
            "/p/.claude/settings.json.backup_20260830_120000"
        );
    }

    #[test]
    fn error_status_line_has_only_a_message() {
        let value = error_status(&anyhow::anyhow!("disk full"));

        assert_eq!(value["status"], "error");
        assert_eq!(value["message"], "disk full");
        assert_eq!(value.as_object().map(|o| o.len()), Some(2));
    }

    #[test]
    fn cancelled_status_line_is_distinct_from_error() {
        let value = cancelled_status();

        assert_eq!(value["status"], "cancelled");
        assert!(value.get("action").is_none());
    }
}
