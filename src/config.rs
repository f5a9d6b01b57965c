//! Runtime configuration, read from the environment (and `.env`)

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Result, WhaleError};

/// TLS certificate and key in PEM format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the sightings REST API
    pub api_base_url: String,
    pub api_timeout: Duration,
    pub http_port: u16,
    /// Serve HTTPS when set
    pub tls: Option<TlsPaths>,
    /// Directory with species images and trophies
    pub assets_path: PathBuf,
    pub session_ttl: Duration,
    /// Upper bound on live browser sessions
    pub max_sessions: usize,
    /// Where the empty-state prompt sends users to report a sighting
    pub report_sighting_url: String,
    pub log_level: tracing::Level,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000".to_string(),
            api_timeout: Duration::from_secs(10),
            http_port: 3000,
            tls: None,
            assets_path: PathBuf::from("assets"),
            session_ttl: Duration::from_secs(86400),
            max_sessions: 10_000,
            report_sighting_url: "/reportsighting".to_string(),
            log_level: tracing::Level::INFO,
        }
    }
}

impl Config {
    /// Create config from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let tls = match (lookup("TLS_CERT_PATH"), lookup("TLS_KEY_PATH")) {
            (Some(cert), Some(key)) => Some(TlsPaths {
                cert_path: PathBuf::from(cert),
                key_path: PathBuf::from(key),
            }),
            (None, None) => None,
            _ => {
                return Err(WhaleError::ConfigValidation {
                    message: "TLS_CERT_PATH and TLS_KEY_PATH must be set together".to_string(),
                })
            }
        };

        let max_sessions = match parse_var::<usize, F>(&lookup, "MAX_SESSIONS")? {
            Some(0) => {
                return Err(WhaleError::ConfigValidation {
                    message: "MAX_SESSIONS must be greater than zero".to_string(),
                })
            }
            other => other.unwrap_or(defaults.max_sessions),
        };

        Ok(Self {
            api_base_url: lookup("API_BASE_URL").unwrap_or(defaults.api_base_url),
            api_timeout: parse_secs(&lookup, "API_TIMEOUT_SECS")?.unwrap_or(defaults.api_timeout),
            http_port: parse_var(&lookup, "HTTP_PORT")?.unwrap_or(defaults.http_port),
            tls,
            assets_path: lookup("ASSETS_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.assets_path),
            session_ttl: parse_secs(&lookup, "SESSION_TTL_SECS")?.unwrap_or(defaults.session_ttl),
            max_sessions,
            report_sighting_url: lookup("REPORT_SIGHTING_URL")
                .unwrap_or(defaults.report_sighting_url),
            log_level: parse_var(&lookup, "LOG_LEVEL")?.unwrap_or(defaults.log_level),
        })
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|e| WhaleError::ConfigValidation {
                message: format!("{}='{}': {}", key, raw, e),
            })
        })
        .transpose()
}

fn parse_secs<F>(lookup: &F, key: &str) -> Result<Option<Duration>>
where
    F: Fn(&str) -> Option<String>,
{
    match parse_var::<u64, F>(lookup, key)? {
        Some(0) => Err(WhaleError::ConfigValidation {
            message: format!("{} must be greater than zero", key),
        }),
        other => Ok(other.map(Duration::from_secs)),
    }
}
