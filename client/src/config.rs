use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use tracing::info;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_SESSION_FILE: &str = ".eventreg-session.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    /// Key/value file the session is persisted in.
    pub session_file: PathBuf,
    /// Request timeout; `None` keeps the HTTP client's default.
    pub timeout: Option<Duration>,
    /// Leave `Authorization` off instead of sending `Bearer null` when
    /// logged out.
    pub omit_missing_token: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
            timeout: None,
            omit_missing_token: false,
        }
    }
}

impl ClientConfig {
    /// Read `EVENTREG_*` variables. Call `dotenvy::dotenv()` first to pick
    /// up a local `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        match lookup("EVENTREG_BASE_URL") {
            Some(url) if !url.trim().is_empty() => config.base_url = url.trim().to_string(),
            _ => info!(default = DEFAULT_BASE_URL, "EVENTREG_BASE_URL not set, using default"),
        }
        if let Some(path) = lookup("EVENTREG_SESSION_FILE").filter(|p| !p.trim().is_empty()) {
            config.session_file = PathBuf::from(path);
        }
        if let Some(raw) = lookup("EVENTREG_TIMEOUT_SECS") {
            let secs: u64 = raw.trim().parse().map_err(|e| ConfigError::Invalid {
                key: "EVENTREG_TIMEOUT_SECS",
                reason: format!("{e}"),
            })?;
            config.timeout = Some(Duration::from_secs(secs));
        }
        if let Some(raw) = lookup("EVENTREG_OMIT_MISSING_TOKEN") {
            config.omit_missing_token = parse_flag("EVENTREG_OMIT_MISSING_TOKEN", &raw)?;
        }

        Ok(config)
    }
}

fn parse_flag(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::Invalid {
            key,
            reason: format!("expected a boolean, got {other:?}"),
        }),
    }
}
