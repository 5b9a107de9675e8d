//! Server Configuration
//!
//! Everything is read from environment variables once at startup.
//! `from_lookup` takes any key lookup so tests never touch the real environment.

use actix_web::http::Uri;
use salary_core::SourceConfig;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_JSON_PATH: &str = "data/salaries.json";
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:5173";
pub const DEFAULT_INSIGHTS_TIMEOUT_SECS: u64 = 30;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },

    #[error("Unknown SALARY_SOURCE {0:?} (expected literal, json or spreadsheet)")]
    UnknownSource(String),

    #[error("SALARY_DATA_PATH is required when SALARY_SOURCE=spreadsheet")]
    MissingSpreadsheetPath,

    #[error("INSIGHTS_ENDPOINT is required when INSIGHTS_API_KEY is set")]
    MissingInsightsEndpoint,
}

/// Allowed CORS origins
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    Any,
    List(Vec<String>),
}

/// Upstream question-answering service settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsightsConfig {
    pub endpoint: String,
    pub api_key: String,
    pub project: String,
    pub timeout: Duration,
}

/// Complete server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub source: SourceConfig,
    pub cors_origins: CorsOrigins,
    /// `None` disables the insights endpoint
    pub insights: Option<InsightsConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            source: SourceConfig::Literal,
            cors_origins: CorsOrigins::List(vec![DEFAULT_ALLOWED_ORIGIN.to_string()]),
            insights: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values count as unset.
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let host = get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match get("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                name: "PORT",
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };

        let data_path = get("SALARY_DATA_PATH").map(PathBuf::from);
        let source = match get("SALARY_SOURCE").as_deref() {
            None | Some("literal") => SourceConfig::Literal,
            Some("json") => {
                SourceConfig::JsonFile(data_path.unwrap_or_else(|| PathBuf::from(DEFAULT_JSON_PATH)))
            }
            Some("spreadsheet") => {
                SourceConfig::Spreadsheet(data_path.ok_or(ConfigError::MissingSpreadsheetPath)?)
            }
            Some(other) => return Err(ConfigError::UnknownSource(other.to_string())),
        };

        let cors_origins = match get("CORS_ALLOWED_ORIGINS") {
            None => CorsOrigins::List(vec![DEFAULT_ALLOWED_ORIGIN.to_string()]),
            Some(raw) => parse_origins(&raw)?,
        };

        let insights = match get("INSIGHTS_API_KEY") {
            None => None,
            Some(api_key) => {
                let endpoint = get("INSIGHTS_ENDPOINT").ok_or(ConfigError::MissingInsightsEndpoint)?;
                let timeout_secs = match get("INSIGHTS_TIMEOUT_SECS") {
                    Some(raw) => raw.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                        name: "INSIGHTS_TIMEOUT_SECS",
                        value: raw,
                    })?,
                    None => DEFAULT_INSIGHTS_TIMEOUT_SECS,
                };
                Some(InsightsConfig {
                    endpoint,
                    api_key,
                    project: get("INSIGHTS_PROJECT").unwrap_or_default(),
                    timeout: Duration::from_secs(timeout_secs),
                })
            }
        };

        Ok(Self {
            host,
            port,
            source,
            cors_origins,
            insights,
        })
    }
}

fn parse_origins(raw: &str) -> Result<CorsOrigins, ConfigError> {
    let origins: Vec<String> = raw
        .split(',')
        .map(|o| o.trim())
        .filter(|o| !o.is_empty())
        .map(|o| o.to_string())
        .collect();

    if origins.iter().any(|o| o == "*") {
        return Ok(CorsOrigins::Any);
    }

    if let Some(bad) = origins.iter().find(|o| !is_valid_origin(o)) {
        return Err(ConfigError::InvalidValue {
            name: "CORS_ALLOWED_ORIGINS",
            value: bad.clone(),
        });
    }

    Ok(CorsOrigins::List(origins))
}

/// An origin is `scheme://host[:port]` with an http(s) scheme and nothing after it.
fn is_valid_origin(origin: &str) -> bool {
    let Ok(uri) = origin.parse::<Uri>() else {
        return false;
    };

    matches!(uri.scheme_str(), Some("http") | Some("https"))
        && uri.authority().is_some()
        && uri.path() == "/"
        && uri.query().is_none()
        && !origin.ends_with('/')
}
