//! Datafeed settings read from the host platform's settings file.
//!
//! The file is a flat JSON object (`vt_setting.json`); only the `datafeed.*`
//! keys are read, everything else is ignored. Credentials can be overridden
//! with `TQFEED_USERNAME` / `TQFEED_PASSWORD`.

use std::fmt::{Debug, Formatter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sdk::TqAuth;

pub const SETTINGS_FILENAME: &str = "vt_setting.json";
pub const TRADER_DIR_NAME: &str = ".vntrader";
pub const USERNAME_ENV: &str = "TQFEED_USERNAME";
pub const PASSWORD_ENV: &str = "TQFEED_PASSWORD";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse settings file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(rename = "datafeed.name", default)]
    pub datafeed_name: String,
    #[serde(rename = "datafeed.username", default)]
    pub datafeed_username: String,
    #[serde(rename = "datafeed.password", default)]
    pub datafeed_password: String,
}

impl Settings {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            datafeed_name: String::from("tqsdk"),
            datafeed_username: username.into(),
            datafeed_password: password.into(),
        }
    }

    /// `$HOME/.vntrader/vt_setting.json`, when a home directory is known.
    pub fn default_path() -> Option<PathBuf> {
        std::env::var_os("HOME")
            .filter(|home| !home.is_empty())
            .map(|home| {
                PathBuf::from(home)
                    .join(TRADER_DIR_NAME)
                    .join(SETTINGS_FILENAME)
            })
    }

    /// Reads `path`. A missing file yields empty settings.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "settings file not found, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(SettingsError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        serde_json::from_str(&raw).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies `TQFEED_USERNAME` / `TQFEED_PASSWORD` when set.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(
            std::env::var(USERNAME_ENV).ok(),
            std::env::var(PASSWORD_ENV).ok(),
        )
    }

    pub fn with_overrides(mut self, username: Option<String>, password: Option<String>) -> Self {
        if let Some(username) = username.filter(|value| !value.is_empty()) {
            self.datafeed_username = username;
        }
        if let Some(password) = password.filter(|value| !value.is_empty()) {
            self.datafeed_password = password;
        }
        self
    }

    pub fn auth(&self) -> TqAuth {
        TqAuth::new(&self.datafeed_username, &self.datafeed_password)
    }
}

impl Debug for Settings {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("datafeed_name", &self.datafeed_name)
            .field("datafeed_username", &self.datafeed_username)
            .field("datafeed_password", &"<redacted>")
            .finish()
    }
}
