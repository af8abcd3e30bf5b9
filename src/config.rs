use std::path::PathBuf;
use std::time::Duration;

use crate::api::{ApiError, HttpApi};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("API URL must start with http:// or https://: {0}")]
    InvalidApiUrl(String),
    #[error("cannot determine config directory; pass --session-file")]
    NoConfigDir,
}

/// Resolved runtime settings shared by every command.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub session_file: PathBuf,
    pub timeout: Duration,
}

impl Config {
    pub fn new(
        api_url: &str,
        session_file: Option<PathBuf>,
        timeout_secs: u64,
    ) -> Result<Self, ConfigError> {
        let api_url = api_url.trim().trim_end_matches('/');
        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            return Err(ConfigError::InvalidApiUrl(api_url.to_string()));
        }
        let session_file = match session_file {
            Some(path) => path,
            None => default_session_file().ok_or(ConfigError::NoConfigDir)?,
        };
        Ok(Config {
            api_url: api_url.to_string(),
            session_file,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn api(&self) -> Result<HttpApi, ApiError> {
        HttpApi::new(&self.api_url, self.timeout)
    }
}

/// `<config dir>/taskdeck/session.json`
pub fn default_session_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("taskdeck").join("session.json"))
}
