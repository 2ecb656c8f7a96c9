//! Installation action selection.

use super::detect::InstallationState;

/// The five install strategies. A closed enum with exhaustive dispatch so
/// totality over every detection outcome holds at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallAction {
    /// No usable prior state; write everything from scratch.
    FreshInstall,
    /// Old flat layout found; move to the subdirectory layout and merge.
    MigrateFromOld,
    /// Current layout found and --force given; back up and reinstall.
    BackupAndUpgrade,
    /// A settings file exists; merge our hooks into it.
    MergeToExisting,
    /// Hook files already in place; only the settings need updating.
    MergeSettingsOnly,
}

impl InstallAction {
    /// Stable identifier used in reports and the batch-mode JSON output.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FreshInstall => "fresh_install",
            Self::MigrateFromOld => "migrate_from_old",
            Self::BackupAndUpgrade => "backup_and_upgrade",
            Self::MergeToExisting => "merge_to_existing",
            Self::MergeSettingsOnly => "merge_settings_only",
        }
    }
}

/// Picks the install action for a detected state. Pure and total:
/// first match wins, every combination of probes maps to an action.
pub fn determine_action(state: &InstallationState, force: bool) -> InstallAction {
    if force {
        return if state.has_new_layout_hook {
            InstallAction::BackupAndUpgrade
        } else {
            InstallAction::FreshInstall
        };
    }

    if state.has_new_layout_hook {
        return if state.has_settings {
            InstallAction::MergeToExisting
        } else {
            InstallAction::MergeSettingsOnly
        };
    }

    if state.has_old_layout_hook {
        return if state.has_settings {
            InstallAction::MigrateFromOld
        } else {
            InstallAction::FreshInstall
        };
    }

    if state.has_settings {
        return InstallAction::MergeToExisting;
    }

    InstallAction::FreshInstall
}
