use crate::error::{config_error, env_error, AppResult};
use chrono_tz::Tz;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

/// Default config file, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "config/meetings.toml";

/// Calendar used when none is configured
pub const DEFAULT_CALENDAR_ID: &str = "primary";

/// Google API host shared by Calendar and Gmail
pub const DEFAULT_API_BASE_URL: &str = "https://www.googleapis.com";

/// Optional settings read from the TOML config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub calendar_id: Option<String>,
    pub timezone: Option<String>,
    pub api_base_url: Option<String>,
    pub gmail_user_id: Option<String>,
    pub request_timeout_secs: Option<u64>,
    /// Extra headers attached to every Google API request
    pub headers: HashMap<String, String>,
}

impl ConfigFile {
    /// Read and parse a config file
    pub fn read(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// OAuth access token for the Google APIs
    pub google_access_token: String,
    /// Google Calendar ID to work on
    pub google_calendar_id: String,
    /// Timezone deciding what "today" is
    pub timezone: String,
    /// Base URL of the Google APIs
    pub api_base_url: String,
    /// Gmail user the drafts are created for
    pub gmail_user_id: String,
    /// HTTP request timeout in seconds
    pub request_timeout_secs: u64,
    /// Extra request headers
    pub headers: HashMap<String, String>,
}

impl Config {
    /// Load configuration from environment and config file
    pub fn load() -> AppResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let path = env::var("MEETINGS_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let path = Path::new(&path);
        let file = if path.exists() {
            Some(ConfigFile::read(path)?)
        } else {
            None
        };

        Self::from_sources(file.unwrap_or_default(), |key| env::var(key).ok())
    }

    /// Merge file settings with environment lookups, environment taking precedence
    pub fn from_sources<F>(file: ConfigFile, lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let google_access_token = lookup("GOOGLE_ACCESS_TOKEN")
            .filter(|t| !t.is_empty())
            .ok_or_else(|| env_error("GOOGLE_ACCESS_TOKEN"))?;

        let google_calendar_id = lookup("GOOGLE_CALENDAR_ID")
            .or(file.calendar_id)
            .unwrap_or_else(|| DEFAULT_CALENDAR_ID.to_string());

        let timezone = lookup("TIMEZONE")
            .or(file.timezone)
            .unwrap_or_else(|| String::from("UTC"));

        let api_base_url = lookup("GOOGLE_API_BASE_URL")
            .or(file.api_base_url)
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        let gmail_user_id = lookup("GMAIL_USER_ID")
            .or(file.gmail_user_id)
            .unwrap_or_else(|| String::from("me"));

        let request_timeout_secs = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(value) => value
                .parse::<u64>()
                .map_err(|_| env_error("Invalid REQUEST_TIMEOUT_SECS format"))?,
            None => file.request_timeout_secs.unwrap_or(30),
        };

        let config = Config {
            google_access_token,
            google_calendar_id,
            timezone,
            api_base_url,
            gmail_user_id,
            request_timeout_secs,
            headers: file.headers,
        };

        // Fail early on a bad timezone name
        config.tz()?;

        Ok(config)
    }

    /// Parsed timezone
    pub fn tz(&self) -> AppResult<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| config_error(&format!("Unknown timezone: {}", self.timezone)))
    }
}
