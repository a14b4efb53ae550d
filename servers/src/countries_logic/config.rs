use clap::Parser;
use lib_countries::sources::http::{DEFAULT_COUNTRIES_URL, DEFAULT_RATES_URL};
use lib_countries::{SourceEndpoints, RENDER_QUEUE_CAPACITY};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_CONFIG_FILE: &str = "server_countries.conf";

#[derive(Parser, Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[clap(about = "Country reference data and exchange rate API", version)]
pub struct Config {
    #[clap(long, env = "PORT", help = "Port to listen on for HTTP requests.")]
    pub port: Option<u16>,

    #[clap(long, env = "COUNTRIES_CONFIG_PATH", help = "Path to the JSON configuration file.")]
    pub config_path: Option<PathBuf>,

    #[clap(long, env = "DATABASE_URL", help = "PostgreSQL connection URL. Without it records are kept in memory.")]
    pub database_url: Option<String>,

    #[clap(long, env = "DB_POOL_SIZE", help = "Maximum number of pooled database connections.")]
    pub db_pool_size: Option<usize>,

    #[clap(long, env = "COUNTRIES_URL", help = "URL of the country facts feed.")]
    pub countries_url: Option<String>,

    #[clap(long, env = "RATES_URL", help = "URL of the exchange rates feed.")]
    pub rates_url: Option<String>,

    #[clap(long, env = "HTTP_TIMEOUT_SECS", help = "Timeout in seconds for each request to a feed.")]
    pub http_timeout_secs: Option<u64>,

    #[clap(long, env = "CACHE_DIR", help = "Directory the summary image is written to.")]
    pub cache_dir: Option<PathBuf>,

    #[clap(long, env = "RENDER_QUEUE_CAPACITY", help = "Snapshots that may wait for the render worker.")]
    pub render_queue_capacity: Option<usize>,

    #[clap(long, env = "LOG_DIR", help = "Directory for log files.")]
    pub log_dir: Option<PathBuf>,

    #[clap(long, env = "LOG_LEVEL", help = "Logging level (trace, debug, info, warn, error).")]
    pub log_level: Option<String>,
}

impl Config {
    /// Built-in defaults, the lowest layer.
    pub fn defaults() -> Config {
        let defaults = Settings::default();
        Config {
            port: Some(defaults.port),
            config_path: None,
            database_url: None,
            db_pool_size: Some(defaults.db_pool_size),
            countries_url: Some(defaults.countries_url),
            rates_url: Some(defaults.rates_url),
            http_timeout_secs: Some(defaults.http_timeout.as_secs()),
            cache_dir: Some(defaults.cache_dir),
            render_queue_capacity: Some(defaults.render_queue_capacity),
            log_dir: Some(defaults.log_dir),
            log_level: Some(defaults.log_level),
        }
    }

    // Merge two Config structs, where 'other' overrides 'self' for Some values
    pub fn merge(self, other: Config) -> Config {
        Config {
            port: other.port.or(self.port),
            config_path: other.config_path.or(self.config_path),
            database_url: other.database_url.or(self.database_url),
            db_pool_size: other.db_pool_size.or(self.db_pool_size),
            countries_url: other.countries_url.or(self.countries_url),
            rates_url: other.rates_url.or(self.rates_url),
            http_timeout_secs: other.http_timeout_secs.or(self.http_timeout_secs),
            cache_dir: other.cache_dir.or(self.cache_dir),
            render_queue_capacity: other.render_queue_capacity.or(self.render_queue_capacity),
            log_dir: other.log_dir.or(self.log_dir),
            log_level: other.log_level.or(self.log_level),
        }
    }

    /// Fills every remaining gap from the built-in defaults.
    pub fn resolve(self) -> Settings {
        let defaults = Settings::default();
        Settings {
            port: self.port.unwrap_or(defaults.port),
            database_url: self.database_url.filter(|url| !url.trim().is_empty()),
            db_pool_size: self.db_pool_size.unwrap_or(defaults.db_pool_size),
            countries_url: self.countries_url.unwrap_or(defaults.countries_url),
            rates_url: self.rates_url.unwrap_or(defaults.rates_url),
            http_timeout: self
                .http_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.http_timeout),
            cache_dir: self.cache_dir.unwrap_or(defaults.cache_dir),
            render_queue_capacity: self
                .render_queue_capacity
                .unwrap_or(defaults.render_queue_capacity),
            log_dir: self.log_dir.unwrap_or(defaults.log_dir),
            log_level: self.log_level.unwrap_or(defaults.log_level),
        }
    }
}

/// Fully resolved server settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub port: u16,
    pub database_url: Option<String>,
    pub db_pool_size: usize,
    pub countries_url: String,
    pub rates_url: String,
    pub http_timeout: Duration,
    pub cache_dir: PathBuf,
    pub render_queue_capacity: usize,
    pub log_dir: PathBuf,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            port: 3000,
            database_url: None,
            db_pool_size: 10,
            countries_url: DEFAULT_COUNTRIES_URL.to_string(),
            rates_url: DEFAULT_RATES_URL.to_string(),
            http_timeout: Duration::from_secs(30),
            cache_dir: PathBuf::from("./cache"),
            render_queue_capacity: RENDER_QUEUE_CAPACITY,
            log_dir: PathBuf::from("./logs"),
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    pub fn endpoints(&self) -> SourceEndpoints {
        SourceEndpoints {
            countries_url: self.countries_url.clone(),
            rates_url: self.rates_url.clone(),
            timeout: self.http_timeout,
        }
    }
}

/// What happened to the config file. Logged once logging is up.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigOrigin {
    File(PathBuf),
    Missing(PathBuf),
    Invalid { path: PathBuf, reason: String },
}

impl ConfigOrigin {
    pub fn log(&self) {
        match self {
            ConfigOrigin::File(path) => {
                tracing::info!("Loaded config file {}", path.display());
            }
            ConfigOrigin::Missing(path) => {
                tracing::info!(
                    "Config file not found at {}. Using defaults and environment/CLI variables.",
                    path.display()
                );
            }
            ConfigOrigin::Invalid { path, reason } => {
                tracing::warn!(
                    "Ignoring config file {}: {}. Falling back to other sources.",
                    path.display(),
                    reason
                );
            }
        }
    }
}

/// Reads a JSON config file.
pub fn read_config_file(path: &Path) -> Result<Option<Config>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let config_str = fs::read_to_string(path).map_err(|e| e.to_string())?;
    serde_json::from_str::<Config>(&config_str)
        .map(Some)
        .map_err(|e| e.to_string())
}

/// Layers `cli` (CLI arguments and environment) over the config file over the
/// built-in defaults.
pub fn layer_config(cli: Config) -> (Settings, ConfigOrigin) {
    // 1. Load defaults
    let mut current_config = Config::defaults();

    // 2. Config file, located through the CLI/env override when given
    let config_file_path = cli
        .config_path
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

    let origin = match read_config_file(&config_file_path) {
        Ok(Some(file_config)) => {
            current_config = current_config.merge(file_config);
            ConfigOrigin::File(config_file_path)
        }
        Ok(None) => ConfigOrigin::Missing(config_file_path),
        Err(reason) => ConfigOrigin::Invalid {
            path: config_file_path,
            reason,
        },
    };

    // 3. CLI arguments and environment variables win
    current_config = current_config.merge(cli);
    (current_config.resolve(), origin)
}

pub fn load_config() -> (Settings, ConfigOrigin) {
    layer_config(Config::parse())
}
