//! `pushover-notify doctor`: post-install health checks.

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Args;
use indoc::formatdoc;

use crate::commands::install::merge::{HooksDocument, binding_is_owned, managed_hooks};
use crate::commands::install::{detect, settings};
use crate::shared::command::is_command_available;
use crate::shared::env_var::EnvVars;
use crate::shared::layout::ClaudeLayout;

#[derive(Args, Clone, PartialEq, Eq)]
pub struct DoctorArgs {
    /// Project directory to inspect (default: current directory)
    #[arg(short = 't', long)]
    pub target_dir: Option<PathBuf>,
}

pub fn run(args: &DoctorArgs) -> anyhow::Result<()> {
    let target = match &args.target_dir {
        Some(target) => target.clone(),
        None => std::env::current_dir().context("failed to resolve the current directory")?,
    };
    let layout = ClaudeLayout::new(&target);
    println!("Checking installation in {}", layout.claude_dir().display());

    let mut problems = 0;
    let state = detect::detect(&layout);

    if state.has_new_layout_hook {
        match &state.installed_version {
            Some(version) => println!("[OK] Hook binary installed (version {version})"),
            None => println!("[OK] Hook binary installed (version unknown)"),
        }
    } else {
        println!("[FAIL] Hook binary not found: {}", layout.hook_binary_path().display());
        problems += 1;
    }

    if state.has_old_layout_hook {
        println!("[WARN] Old flat-layout hook files still present in {}", layout.hooks_dir().display());
    }

    match settings::load(&layout.settings_path()) {
        Ok(Some(document)) => {
            let missing = missing_events(&document.hooks);
            if missing.is_empty() {
                println!("[OK] settings.json binds all lifecycle events");
            } else {
                for event in missing {
                    println!("[FAIL] settings.json has no binding for event: {event}");
                    problems += 1;
                }
            }
        }
        Ok(None) => {
            println!("[FAIL] settings.json not found: {}", layout.settings_path().display());
            problems += 1;
        }
        Err(e) => {
            println!("[FAIL] {e}");
            problems += 1;
        }
    }

    let env = EnvVars::load();
    let mark = |present: bool| if present { "[OK]" } else { "[MISSING]" };
    println!("{} {}", mark(env.token.is_some()), EnvVars::token_name());
    println!("{} {}", mark(env.user.is_some()), EnvVars::user_name());
    if !env.has_credentials() {
        println!("[WARN] Pushover credentials incomplete; notifications fall back to the desktop");
    }
    if env.disabled {
        println!("[WARN] PUSHOVER_HOOK_DISABLE is set; hooks are currently muted");
    }
    if is_command_available("claude") {
        println!("[OK] claude CLI available (stop notifications will be summarized)");
    } else {
        println!("[INFO] claude CLI not found; stop notifications use raw transcript text");
    }

    if problems > 0 {
        bail!(formatdoc! {"
            {problems} problem(s) found.
            Run `pushover-notify install --target-dir {target}` to repair the installation.",
            target = target.display(),
        });
    }
    println!("[OK] Everything looks good.");
    Ok(())
}

/// Managed event keys that have no binding of ours in `hooks`.
fn missing_events(hooks: &HooksDocument) -> Vec<String> {
    managed_hooks(15)
        .keys()
        .filter(|event| {
            !hooks
                .get(*event)
                .is_some_and(|bindings| bindings.iter().any(binding_is_owned))
        })
        .cloned()
        .collect()
}
