use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_RECENT_EDITS_LIMIT: usize = 3;
const DEFAULT_SESSION_FILE: &str = ".warehouseops-session.json";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_url: String,
    pub timeout: Duration,
    pub recent_edits_limit: usize,
    pub session_file: PathBuf,
}

impl Config {
    /// Reads the process environment. Call `dotenvy::dotenv()` first to pick
    /// up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("API_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .ok_or(ConfigError::Missing("API_URL"))?;

        let timeout_secs = parse_or(&lookup, "API_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        let recent_edits_limit =
            parse_or(&lookup, "RECENT_EDITS_LIMIT", DEFAULT_RECENT_EDITS_LIMIT)?;
        let session_file = lookup("SESSION_FILE")
            .filter(|path| !path.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SESSION_FILE.to_string());

        Ok(Self {
            api_url,
            timeout: Duration::from_secs(timeout_secs),
            recent_edits_limit,
            session_file: PathBuf::from(session_file),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}
