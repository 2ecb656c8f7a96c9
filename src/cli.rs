use clap::{Parser, Subcommand};

use crate::commands::doctor::DoctorArgs;
use crate::commands::hook::HookArgs;
use crate::commands::install::InstallArgs;
use crate::commands::test_push::TestArgs;

#[derive(Parser)]
#[command(
    name = "pushover-hook",
    bin_name = "pushover-notify",
    version,
    about,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Install the notification hooks into a Claude Code project
    Install(InstallArgs),

    /// Handle a Claude Code lifecycle event (called from hooks)
    Hook(HookArgs),

    /// Send a test notification through the configured delivery path
    Test(TestArgs),

    /// Check the installation and environment for problems
    Doctor(DoctorArgs),
}
