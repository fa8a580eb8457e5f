use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use serde::Deserialize;
use thiserror::Error;
use tubeqa_gateway::{GatewaySettings, DEFAULT_BASE_URL, DEFAULT_HEALTH_INTERVAL};

use super::logging::LogDestination;

const DEFAULT_CONFIG_FILENAME: &str = "tubeqa.ron";
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Parser, Default)]
#[command(
    name = "tubeqa",
    version,
    about = "Ask questions about YouTube videos from the terminal"
)]
pub struct Cli {
    /// Base address of the question-answering backend.
    #[arg(long, env = "TUBEQA_API_BASE_URL")]
    pub api_base_url: Option<String>,

    /// RON configuration file. Defaults to ./tubeqa.ron when it exists.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Seconds between background health checks.
    #[arg(long)]
    pub health_interval_secs: Option<u64>,

    /// Per-request timeout in seconds. Unset means no timeout.
    #[arg(long)]
    pub request_timeout_secs: Option<u64>,

    /// Where log output goes.
    #[arg(long, value_enum)]
    pub log: Option<LogDestination>,

    /// Log at debug level.
    #[arg(long, short)]
    pub verbose: bool,
}

/// Settings read from the RON file. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    api_base_url: Option<String>,
    health_interval_secs: Option<u64>,
    request_timeout_secs: Option<u64>,
    connect_timeout_secs: Option<u64>,
    log: Option<LogDestination>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse config file {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("invalid backend base URL {0:?}: expected http(s)://host[:port][/prefix]")]
    InvalidBaseUrl(String),
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub health_interval: Duration,
    pub connect_timeout: Duration,
    pub request_timeout: Option<Duration>,
    pub log_destination: LogDestination,
    pub verbose: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            health_interval: DEFAULT_HEALTH_INTERVAL,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            request_timeout: None,
            log_destination: LogDestination::default(),
            verbose: false,
        }
    }
}

impl AppConfig {
    /// Resolves configuration: command line (and its environment fallbacks)
    /// over the RON file over built-in defaults.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let file = match &cli.config {
            Some(path) => read_file_config(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILENAME);
                if default_path.exists() {
                    read_file_config(default_path)?
                } else {
                    FileConfig::default()
                }
            }
        };
        Self::merge(cli, file)
    }

    fn merge(cli: &Cli, file: FileConfig) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let api_base_url = cli
            .api_base_url
            .clone()
            .or(file.api_base_url)
            .unwrap_or(defaults.api_base_url);
        let api_base_url = validate_base_url(&api_base_url)?;

        let health_interval = match cli.health_interval_secs.or(file.health_interval_secs) {
            Some(0) => return Err(ConfigError::Zero("health_interval_secs")),
            Some(secs) => Duration::from_secs(secs),
            None => defaults.health_interval,
        };
        let request_timeout = match cli.request_timeout_secs.or(file.request_timeout_secs) {
            Some(0) => return Err(ConfigError::Zero("request_timeout_secs")),
            Some(secs) => Some(Duration::from_secs(secs)),
            None => None,
        };
        let connect_timeout = match file.connect_timeout_secs {
            Some(0) => return Err(ConfigError::Zero("connect_timeout_secs")),
            Some(secs) => Duration::from_secs(secs),
            None => defaults.connect_timeout,
        };

        Ok(Self {
            api_base_url,
            health_interval,
            connect_timeout,
            request_timeout,
            log_destination: cli.log.or(file.log).unwrap_or_default(),
            verbose: cli.verbose,
        })
    }

    pub fn gateway_settings(&self) -> GatewaySettings {
        GatewaySettings {
            base_url: self.api_base_url.clone(),
            connect_timeout: self.connect_timeout,
            request_timeout: self.request_timeout,
        }
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    ron::from_str(&text).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}

fn validate_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    let parsed =
        url::Url::parse(trimmed).map_err(|_| ConfigError::InvalidBaseUrl(raw.to_string()))?;
    let scheme_ok = matches!(parsed.scheme(), "http" | "https");
    if !scheme_ok || parsed.host_str().is_none() || parsed.query().is_some() {
        return Err(ConfigError::InvalidBaseUrl(raw.to_string()));
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}
