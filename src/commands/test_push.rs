//! `pushover-notify test`: sends a test notification end to end.

use clap::Args;

use crate::infra::notification::{self, Notification};
use crate::shared::env_var::EnvVars;

#[derive(Args, Clone, PartialEq, Eq)]
pub struct TestArgs {
    /// Message body to send
    #[arg(long, default_value = "Test notification from pushover-hook")]
    pub message: String,
}

#[tokio::main]
pub async fn run(args: &TestArgs) -> anyhow::Result<()> {
    let env = EnvVars::load();
    if !env.has_credentials() {
        eprintln!(
            "[WARN] {} and {} are not both set; sending a desktop notification instead",
            EnvVars::token_name(),
            EnvVars::user_name()
        );
    }

    let delivery = notification::send(&Notification {
        title: "Claude Code - Test".to_string(),
        message: args.message.clone(),
    })
    .await?;

    println!("[OK] Test notification sent via {delivery}.");
    Ok(())
}
