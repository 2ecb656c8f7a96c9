//! Notification delivery: Pushover when credentials are configured,
//! otherwise a local desktop notification.

use std::fmt;

use thiserror::Error;

use crate::infra::pushover::{self, Credentials, PushoverError};
use crate::shared::env_var::EnvVars;

pub struct Notification {
    pub title: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Pushover,
    Desktop,
}

impl fmt::Display for Delivery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pushover => "pushover",
            Self::Desktop => "desktop",
        };
        write!(f, "{name}")
    }
}

#[derive(Error, Debug)]
pub enum NotificationError {
    #[error(transparent)]
    Pushover(#[from] PushoverError),

    #[error("desktop notification failed: {0}")]
    Desktop(#[from] notify_rust::error::Error),
}

pub async fn send(notification: &Notification) -> Result<Delivery, NotificationError> {
    let env = EnvVars::load();
    if let (Some(token), Some(user)) = (env.token, env.user) {
        let client = pushover::Client::new(Credentials { token, user })?;
        client
            .send(&notification.title, &notification.message)
            .await?;
        return Ok(Delivery::Pushover);
    }

    notify_rust::Notification::new()
        .summary(&notification.title)
        .body(&notification.message)
        .show()?;
    Ok(Delivery::Desktop)
}
