//! Configuration loading
//!
//! Bootstrap settings are resolved in priority order:
//! 1. Command-line arguments (highest priority)
//! 2. Environment variables (handled by the binary's argument parser)
//! 3. TOML config file
//! 4. Compiled defaults (fallback)
//!
//! A missing TOML file is not an error; the service starts on defaults.
//! Nothing here logs: configuration is resolved before the tracing subscriber
//! exists, so the binary reports the outcome once logging is up.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 3000;

/// Config file looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "repertorio.toml";

/// Settings read from the TOML file
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TomlConfig {
    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Interface to bind
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// JSON document holding the collection (relative to the working directory)
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    /// Landing page served at `/`
    #[serde(default = "default_index_page")]
    pub index_page: PathBuf,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_data_file() -> PathBuf {
    PathBuf::from("repertorio.json")
}

fn default_index_page() -> PathBuf {
    PathBuf::from("../client/index.html")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind_address: default_bind_address(),
            data_file: default_data_file(),
            index_page: default_index_page(),
            logging: LoggingConfig::default(),
        }
    }
}

impl TomlConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| Error::Config(e.to_string()))
    }

    /// Read and parse a TOML file that is known to exist
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }
}

/// Values supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub port: Option<u16>,
    pub bind_address: Option<String>,
    pub data_file: Option<PathBuf>,
    pub index_page: Option<PathBuf>,
    pub log_level: Option<String>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub port: u16,
    pub bind_address: String,
    pub data_file: PathBuf,
    pub index_page: PathBuf,
    pub log_level: String,
    /// TOML file the settings came from, if any
    pub source: Option<PathBuf>,
}

impl Config {
    /// Layer overrides on top of file settings
    pub fn resolve(file: TomlConfig, overrides: ConfigOverrides, source: Option<PathBuf>) -> Self {
        Self {
            port: overrides.port.unwrap_or(file.port),
            bind_address: overrides.bind_address.unwrap_or(file.bind_address),
            data_file: overrides.data_file.unwrap_or(file.data_file),
            index_page: overrides.index_page.unwrap_or(file.index_page),
            log_level: overrides.log_level.unwrap_or(file.logging.level),
            source,
        }
    }

    /// `host:port` string for the listener
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

/// Locate the config file: explicit path, then working directory, then the
/// platform config directory (`~/.config/repertorio/config.toml` on Linux)
pub fn find_config_file(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return path.exists().then(|| path.to_path_buf());
    }

    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.exists() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|d| d.join("repertorio").join("config.toml"))
        .filter(|path| path.exists())
}

/// Resolve the configuration for this process
pub fn load_config(explicit: Option<&Path>, overrides: ConfigOverrides) -> Result<Config> {
    let source = find_config_file(explicit);

    let file = match &source {
        Some(path) => TomlConfig::from_file(path)?,
        None => TomlConfig::default(),
    };

    Ok(Config::resolve(file, overrides, source))
}
