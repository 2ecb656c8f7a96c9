//! Centralized reader for PUSHOVER_* environment variables.
//!
//! Variable names are private constants here; external code accesses
//! values through the `EnvVars` struct.

const TOKEN: &str = "PUSHOVER_TOKEN";
const USER: &str = "PUSHOVER_USER";
const DISABLE: &str = "PUSHOVER_HOOK_DISABLE";
const HOOK_LOG: &str = "PUSHOVER_HOOK_LOG";
const NO_SUMMARY: &str = "PUSHOVER_HOOK_NO_SUMMARY";

/// Snapshot of all PUSHOVER_* environment variables at load time.
pub struct EnvVars {
    /// Pushover application token (from https://pushover.net/apps).
    pub token: Option<String>,

    /// Pushover user key.
    pub user: Option<String>,

    /// When set, hooks exit immediately without sending anything.
    pub disabled: bool,

    /// Hook log level: "debug", "error", or unset (logging off).
    pub hook_log: Option<String>,

    /// When set, stop-event messages are not condensed via the claude CLI.
    pub no_summary: bool,
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

impl EnvVars {
    /// Read all PUSHOVER_* environment variables from the current process.
    pub fn load() -> Self {
        Self {
            token: non_empty_var(TOKEN),
            user: non_empty_var(USER),
            disabled: non_empty_var(DISABLE).is_some(),
            hook_log: non_empty_var(HOOK_LOG),
            no_summary: non_empty_var(NO_SUMMARY).is_some(),
        }
    }

    /// Both Pushover credentials are present.
    pub fn has_credentials(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }

    /// Env var name for TOKEN (used in guidance output).
    pub fn token_name() -> &'static str {
        TOKEN
    }

    /// Env var name for USER (used in guidance output).
    pub fn user_name() -> &'static str {
        USER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_reads_credentials() {
        temp_env::with_vars(
            [
                ("PUSHOVER_TOKEN", Some("app-token")),
                ("PUSHOVER_USER", Some("user-key")),
            ],
            || {
                let env = EnvVars::load();
                assert_eq!(env.token.as_deref(), Some("app-token"));
                assert_eq!(env.user.as_deref(), Some("user-key"));
                assert!(env.has_credentials());
            },
        );
    }

    #[test]
    fn empty_values_are_treated_as_unset() {
        temp_env::with_vars(
            [
                ("PUSHOVER_TOKEN", Some("")),
                ("PUSHOVER_USER", Some("user-key")),
            ],
            || {
                let env = EnvVars::load();
                assert!(env.token.is_none());
                assert!(!env.has_credentials());
            },
        );
    }

    #[test]
    fn disable_flag_defaults_to_off() {
        temp_env::with_vars([("PUSHOVER_HOOK_DISABLE", None::<&str>)], || {
            assert!(!EnvVars::load().disabled);
        });
    }

    #[test]
    fn disable_flag_set() {
        temp_env::with_vars([("PUSHOVER_HOOK_DISABLE", Some("1"))], || {
            assert!(EnvVars::load().disabled);
        });
    }
}
