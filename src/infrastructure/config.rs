use crate::infrastructure::security::TokenSettings;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_DATABASE: &str = "staybook";
const DEFAULT_UPLOAD_DIR: &str = "uploads";
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";
const DEFAULT_API_MODE: &str = "compat";
const DEFAULT_TOKEN_TTL_SECS: u64 = 3600;
const DEFAULT_DOWNLOAD_TIMEOUT_SECS: u64 = 30;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Which HTTP contract the server speaks.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiMode {
    /// Identity comes from `user_id`/`user` in the body, some failures are
    /// answered in-band as a 200 string, and register echoes the stored user.
    Compat,
    /// Writes need a bearer token, every failure uses the `{error, message}`
    /// envelope, and the password hash never leaves the server.
    Hardened(TokenSettings),
}

impl ApiMode {
    pub fn is_hardened(&self) -> bool {
        matches!(self, ApiMode::Hardened(_))
    }

    pub fn tokens(&self) -> Option<&TokenSettings> {
        match self {
            ApiMode::Compat => None,
            ApiMode::Hardened(tokens) => Some(tokens),
        }
    }
}

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub mongo_url: String,
    pub mongo_db: String,
    pub api_mode: ApiMode,
    pub upload_dir: PathBuf,
    pub cors_origin: String,
    pub download_timeout: Duration,
}

impl AppConfig {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenv::dotenv() {
            debug!(path = %path.display(), "Loaded .env file");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };
        let or_default = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let mode = or_default("API_MODE", DEFAULT_API_MODE);
        let api_mode = match mode.trim().to_ascii_lowercase().as_str() {
            "compat" => ApiMode::Compat,
            "hardened" => ApiMode::Hardened(TokenSettings {
                secret: required("JWT_SECRET")?,
                ttl_secs: parse_or(&lookup, "TOKEN_TTL_SECS", DEFAULT_TOKEN_TTL_SECS)?,
            }),
            _ => {
                return Err(ConfigError::Invalid {
                    key: "API_MODE",
                    value: mode,
                });
            }
        };

        Ok(Self {
            host: or_default("HOST", DEFAULT_HOST),
            port: parse_or(&lookup, "PORT", DEFAULT_PORT)?,
            mongo_url: required("MONGO_URL")?,
            mongo_db: or_default("MONGO_DB", DEFAULT_DATABASE),
            api_mode,
            upload_dir: PathBuf::from(or_default("UPLOAD_DIR", DEFAULT_UPLOAD_DIR)),
            cors_origin: or_default("CORS_ORIGIN", DEFAULT_CORS_ORIGIN),
            download_timeout: Duration::from_secs(parse_or(
                &lookup,
                "DOWNLOAD_TIMEOUT_SECS",
                DEFAULT_DOWNLOAD_TIMEOUT_SECS,
            )?),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}
