//! User configuration loaded from `config.toml`.

use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs, io};

use serde::Deserialize;

const APP_DIR: &str = "imgform";
const CONFIG_FILE: &str = "config.toml";
const LOG_FILE: &str = "imgform.log";

/// Overrides `api_base_url`.
pub const API_URL_ENV: &str = "IMGFORM_API_URL";
/// Overrides `upload_key`.
pub const UPLOAD_KEY_ENV: &str = "IMGFORM_UPLOAD_KEY";

/// Errors that can occur while loading the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The config file is not valid TOML for [`Config`].
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The platform does not provide a config directory.
    #[error("could not determine config directory")]
    NoConfigDir,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Root of the images API (`POST /api/images` is resolved against it).
    pub api_base_url: String,
    /// Image host upload endpoint.
    pub upload_url: String,
    /// API key sent to the image host, if it needs one.
    pub upload_key: Option<String>,
    pub toast_duration_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3000".to_string(),
            upload_url: "https://api.imgbb.com/1/upload".to_string(),
            upload_key: None,
            toast_duration_ms: 5000,
        }
    }
}

impl Config {
    /// Loads `~/.config/imgform/config.toml`, then applies environment
    /// overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        let mut config = Self::from_path(&dir.join(APP_DIR).join(CONFIG_FILE))?;
        config.apply_overrides(|key| env::var(key).ok());
        Ok(config)
    }

    /// Reads a config file; a missing file yields the defaults.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(text) => Ok(toml::from_str(&text)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(API_URL_ENV) {
            self.api_base_url = url;
        }
        if let Some(key) = lookup(UPLOAD_KEY_ENV) {
            self.upload_key = Some(key);
        }
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }

    /// Log file location under the XDG data directory.
    pub fn log_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join(APP_DIR).join(LOG_FILE))
    }
}
