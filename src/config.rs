//! Configuration management for meteoport.
//!
//! This module handles the layered configuration system with the following precedence:
//! 1. Command-line arguments (highest priority)
//! 2. Environment variables
//! 3. JSON config file
//! 4. Default values (lowest priority)

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{MeteoportError, Result};
use crate::geo::EARTH_CIRCUMFERENCE_KM;
use crate::service::ServiceOptions;

/// Command-line arguments for meteoport
#[derive(Parser, Debug)]
#[command(name = "meteoport")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Airport file to load at startup
    #[arg(short, long, env = "METEOPORT_AIRPORTS")]
    pub airports: Option<PathBuf>,

    /// Host address to bind to
    #[arg(short = 'H', long, env = "METEOPORT_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "METEOPORT_PORT")]
    pub port: Option<u16>,

    /// Number of worker threads
    #[arg(short, long, env = "METEOPORT_WORKERS")]
    pub workers: Option<usize>,

    /// Path to JSON configuration file
    #[arg(short, long, env = "METEOPORT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Remove readings and usage counts together with a deleted airport
    #[arg(long, env = "METEOPORT_PURGE_ON_DELETE")]
    pub purge_on_delete: bool,

    /// Largest accepted query radius in kilometres
    #[arg(long, env = "METEOPORT_MAX_RADIUS_KM")]
    pub max_radius_km: Option<f64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "METEOPORT_LOG_LEVEL")]
    pub log_level: Option<String>,
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Number of worker threads (None = number of CPU cores)
    #[serde(default)]
    pub workers: Option<usize>,
}

/// Data handling configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    /// Airport file loaded at startup
    #[serde(default)]
    pub airports_file: Option<PathBuf>,

    /// Drop readings and request counts of deleted airports
    #[serde(default)]
    pub purge_on_delete: bool,

    /// Largest accepted query radius in kilometres
    #[serde(default = "default_max_radius_km")]
    pub max_radius_km: f64,
}

/// Complete configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Data configuration
    #[serde(default)]
    pub data: DataConfig,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Config {
    /// Load configuration from all sources with proper precedence
    pub fn load() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    /// Build configuration from already parsed arguments
    pub fn from_args(args: Args) -> Result<Self> {
        // Start with defaults
        let mut config = Config::default();

        // Load from JSON file if provided
        if let Some(config_path) = &args.config {
            let json_config = Self::load_from_file(config_path)?;
            config.merge(json_config);
        }

        // Override with command-line arguments and environment
        if let Some(host) = args.host {
            config.server.host = host;
        }
        if let Some(port) = args.port {
            config.server.port = port;
        }
        if args.workers.is_some() {
            config.server.workers = args.workers;
        }
        if args.airports.is_some() {
            config.data.airports_file = args.airports;
        }
        if args.purge_on_delete {
            config.data.purge_on_delete = true;
        }
        if let Some(max_radius_km) = args.max_radius_km {
            config.data.max_radius_km = max_radius_km;
        }
        if let Some(log_level) = args.log_level {
            config.log_level = log_level;
        }

        Ok(config)
    }

    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        self.server.host = other.server.host;
        self.server.port = other.server.port;
        if other.server.workers.is_some() {
            self.server.workers = other.server.workers;
        }
        self.data = other.data;
        self.log_level = other.log_level;
    }

    /// Engine options derived from the data section
    pub fn service_options(&self) -> ServiceOptions {
        ServiceOptions {
            purge_on_delete: self.data.purge_on_delete,
            max_radius_km: self.data.max_radius_km,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        // Validate server host (must be a valid IP or hostname)
        if self.server.host.is_empty() {
            return Err(MeteoportError::Config {
                message: "Server host cannot be empty".to_string(),
            });
        }

        // Validate port (0 is not a valid port for users)
        if self.server.port == 0 {
            return Err(MeteoportError::Config {
                message: "Server port cannot be 0".to_string(),
            });
        }

        if self.server.workers == Some(0) {
            return Err(MeteoportError::Config {
                message: "Worker count cannot be 0".to_string(),
            });
        }

        // Validate log level
        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(MeteoportError::Config {
                    message: format!(
                        "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                        self.log_level
                    ),
                });
            }
        }

        let max_radius_km = self.data.max_radius_km;
        if !(max_radius_km > 0.0 && max_radius_km <= EARTH_CIRCUMFERENCE_KM) {
            return Err(MeteoportError::Config {
                message: format!(
                    "Maximum radius must be in (0, {}] kilometres, got {}",
                    EARTH_CIRCUMFERENCE_KM, max_radius_km
                ),
            });
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            data: DataConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            airports_file: None,
            purge_on_delete: false,
            max_radius_km: default_max_radius_km(),
        }
    }
}

// Default value functions for serde
fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_radius_km() -> f64 {
    ServiceOptions::default().max_radius_km
}

fn default_log_level() -> String {
    "info".to_string()
}
