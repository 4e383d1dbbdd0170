//! Session lifecycle boundary.
//!
//! A session runs from login to logout. The persisted "logged in" flag is
//! only ever touched through [`SessionStore`].

use crate::config::Config;
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;

/// Persistence of the session lifecycle.
pub trait SessionStore {
    fn is_logged_in(&self) -> bool;

    /// Record that `nickname` logged in.
    fn begin_session(&mut self, nickname: &str) -> Result<()>;

    /// Record that the current user logged out.
    fn end_session(&mut self) -> Result<()>;
}

/// Run `start`, then record the session for `nickname`.
///
/// Nothing is written when `start` fails, so a session that never ran is not
/// resumed on the next launch.
pub fn begin_session_after<T>(
    store: &mut dyn SessionStore,
    nickname: &str,
    start: impl FnOnce() -> Result<T>,
) -> Result<T> {
    let started = start()?;
    store.begin_session(nickname)?;
    Ok(started)
}

/// Session store backed by the config file.
///
/// The file is re-read on every call so edits made elsewhere in the app are
/// never overwritten with stale values.
#[derive(Debug, Clone)]
pub struct ConfigSessionStore {
    config_path: PathBuf,
}

impl ConfigSessionStore {
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    fn update(&self, apply: impl FnOnce(&mut Config)) -> Result<()> {
        let mut config = Config::load_or_create(&self.config_path)
            .context("Failed to load configuration")?;
        apply(&mut config);
        config
            .save(&self.config_path)
            .context("Failed to save configuration")
    }
}

impl SessionStore for ConfigSessionStore {
    fn is_logged_in(&self) -> bool {
        Config::load_or_create(&self.config_path)
            .map(|c| c.is_user_logged_in)
            .unwrap_or(false)
    }

    fn begin_session(&mut self, nickname: &str) -> Result<()> {
        info!("Session started for {}", nickname);
        self.update(|config| {
            config.is_user_logged_in = true;
            config.nickname = Some(nickname.to_string());
        })
    }

    fn end_session(&mut self) -> Result<()> {
        info!("Session ended");
        self.update(|config| config.is_user_logged_in = false)
    }
}
