//! Run configuration: source list, HTTP settings and delivery credentials.
//!
//! Values come from three places, lowest precedence first:
//!
//! 1. Built-in defaults (the two public MMI pages, 30 s timeout)
//! 2. An optional YAML settings file (`--config`)
//! 3. Credentials from the command line or the `TELEGRAM_BOT_TOKEN` /
//!    `TELEGRAM_CHAT_ID` environment variables
//!
//! [`Config::load`] runs once at startup and fails before any network call
//! when something required is missing.

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::cli::Cli;
use crate::models::SourceKind;

pub const TOKEN_ENV: &str = "TELEGRAM_BOT_TOKEN";
pub const CHAT_ID_ENV: &str = "TELEGRAM_CHAT_ID";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Startup configuration problems.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing {0}: set the environment variable or pass it on the command line")]
    MissingCredential(&'static str),

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("invalid URL for source {name}: {url}")]
    InvalidUrl { name: String, url: String },

    #[error("invalid Telegram API base URL: {0}")]
    InvalidApiBase(String),

    #[error("no sources configured")]
    NoSources,

    #[error("timeout_secs must be greater than zero")]
    ZeroTimeout,
}

/// Messaging platform credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub token: String,
    pub chat_id: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

/// One page to scrape.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SourceConfig {
    pub name: String,
    pub kind: SourceKind,
    pub url: String,
}

/// Where the rendered message goes.
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    /// Post to Telegram with these credentials.
    Telegram(Credentials),
    /// Print to stdout instead of sending.
    DryRun,
}

/// Shape of the optional YAML settings file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
    pub telegram_api_base: Option<String>,
    pub sources: Option<Vec<SourceConfig>>,
}

/// Fully resolved, immutable run configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub sources: Vec<SourceConfig>,
    pub timeout: Duration,
    pub user_agent: String,
    pub telegram_api_base: Url,
    pub delivery: Delivery,
}

pub fn default_sources() -> Vec<SourceConfig> {
    vec![
        SourceConfig {
            name: "TickerTape".to_string(),
            kind: SourceKind::TickerTape,
            url: "https://www.tickertape.in/market-mood-index".to_string(),
        },
        SourceConfig {
            name: "GoodReturns".to_string(),
            kind: SourceKind::GenericHtml,
            url: "https://www.goodreturns.in/market-mood-index.html".to_string(),
        },
    ]
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

impl Settings {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml(raw: &str) -> Result<Self, serde_yaml::Error> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw)
    }
}

impl Config {
    /// Resolve the run configuration from parsed CLI arguments.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let settings = match &cli.config {
            Some(path) => Settings::from_file(path)?,
            None => Settings::default(),
        };
        Self::resolve(settings, cli.token.as_deref(), cli.chat_id.as_deref(), cli.dry_run)
    }

    /// Merge settings, defaults and credentials, validating as it goes.
    pub fn resolve(
        settings: Settings,
        token: Option<&str>,
        chat_id: Option<&str>,
        dry_run: bool,
    ) -> Result<Self, ConfigError> {
        let delivery = if dry_run {
            Delivery::DryRun
        } else {
            Delivery::Telegram(Credentials {
                token: non_blank(token).ok_or(ConfigError::MissingCredential(TOKEN_ENV))?,
                chat_id: non_blank(chat_id).ok_or(ConfigError::MissingCredential(CHAT_ID_ENV))?,
            })
        };

        let timeout_secs = settings.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        let sources = settings.sources.unwrap_or_else(default_sources);
        if sources.is_empty() {
            return Err(ConfigError::NoSources);
        }
        for source in &sources {
            match Url::parse(&source.url) {
                Ok(url) if matches!(url.scheme(), "http" | "https") => {}
                _ => {
                    return Err(ConfigError::InvalidUrl {
                        name: source.name.clone(),
                        url: source.url.clone(),
                    });
                }
            }
        }

        let api_base = settings
            .telegram_api_base
            .unwrap_or_else(|| DEFAULT_TELEGRAM_API_BASE.to_string());
        let telegram_api_base =
            Url::parse(&api_base).map_err(|_| ConfigError::InvalidApiBase(api_base.clone()))?;

        Ok(Self {
            sources,
            timeout: Duration::from_secs(timeout_secs),
            user_agent: non_blank(settings.user_agent.as_deref())
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            telegram_api_base,
            delivery,
        })
    }
}
