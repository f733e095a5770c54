//! Service configuration
//!
//! Read from the process environment (after `.env` has been loaded).

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_API_BASE: &str = "https://api.twilio.com";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_REPORT_PATH: &str = "call_report.csv";
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(60 * 60);

/// Account SID shipped in the sample `.env`
const PLACEHOLDER_ACCOUNT_SID: &str = "ACxxxxxxxx";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing voice platform credential: {0} (set it in .env)")]
    MissingCredential(&'static str),
    #[error("Placeholder voice platform credentials in use; update .env with real values")]
    PlaceholderCredentials,
    #[error("Invalid public URL {0:?}: must start with http")]
    InvalidPublicUrl(String),
    #[error("Failed to create HTTP client: {0}")]
    HttpClient(String),
}

/// Voice platform account credentials and sender number
#[derive(Debug, Clone, Default)]
pub struct PlatformCredentials {
    pub account_sid: Option<String>,
    pub auth_token: Option<String>,
    pub phone_number: Option<String>,
}

/// Credentials that passed [`PlatformCredentials::validate`]
#[derive(Debug, Clone)]
pub struct ValidCredentials<'a> {
    pub account_sid: &'a str,
    pub auth_token: &'a str,
    pub phone_number: &'a str,
}

impl PlatformCredentials {
    /// Reject missing, empty or placeholder values
    pub fn validate(&self) -> Result<ValidCredentials<'_>, ConfigError> {
        let account_sid = self
            .account_sid
            .as_deref()
            .ok_or(ConfigError::MissingCredential("TWILIO_ACCOUNT_SID"))?;
        let auth_token = self
            .auth_token
            .as_deref()
            .ok_or(ConfigError::MissingCredential("TWILIO_AUTH_TOKEN"))?;
        let phone_number = self
            .phone_number
            .as_deref()
            .ok_or(ConfigError::MissingCredential("TWILIO_PHONE_NUMBER"))?;

        if account_sid.contains(PLACEHOLDER_ACCOUNT_SID) {
            return Err(ConfigError::PlaceholderCredentials);
        }
        if account_sid.is_empty() {
            return Err(ConfigError::MissingCredential("TWILIO_ACCOUNT_SID"));
        }
        if auth_token.is_empty() {
            return Err(ConfigError::MissingCredential("TWILIO_AUTH_TOKEN"));
        }
        if phone_number.is_empty() {
            return Err(ConfigError::MissingCredential("TWILIO_PHONE_NUMBER"));
        }

        Ok(ValidCredentials {
            account_sid,
            auth_token,
            phone_number,
        })
    }
}

/// Top-level configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub credentials: PlatformCredentials,
    /// Voice platform REST base URL
    pub api_base: String,
    pub port: u16,
    pub report_path: PathBuf,
    /// Idle sessions older than this are dropped when a new call arrives
    pub session_ttl: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            credentials: PlatformCredentials::default(),
            api_base: DEFAULT_API_BASE.to_string(),
            port: DEFAULT_PORT,
            report_path: PathBuf::from(DEFAULT_REPORT_PATH),
            session_ttl: DEFAULT_SESSION_TTL,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup. Unparseable numbers fall back
    /// to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            credentials: PlatformCredentials {
                account_sid: lookup("TWILIO_ACCOUNT_SID"),
                auth_token: lookup("TWILIO_AUTH_TOKEN"),
                phone_number: lookup("TWILIO_PHONE_NUMBER"),
            },
            api_base: lookup("TWILIO_API_BASE").unwrap_or(defaults.api_base),
            port: lookup("IVR_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            report_path: lookup("IVR_REPORT_PATH")
                .map_or(defaults.report_path, PathBuf::from),
            session_ttl: lookup("IVR_SESSION_TTL_SECS")
                .and_then(|s| s.parse().ok())
                .map_or(defaults.session_ttl, Duration::from_secs),
        }
    }
}

/// Normalize the operator-supplied public base URL the platform will call back
pub fn validate_public_url(url: &str) -> Result<String, ConfigError> {
    let url = url.trim();
    if !url.starts_with("http") {
        return Err(ConfigError::InvalidPublicUrl(url.to_string()));
    }
    Ok(url.trim_end_matches('/').to_string())
}
