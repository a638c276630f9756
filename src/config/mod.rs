//! Configuration System for fuzzylab
//!
//! Provides a configuration system supporting:
//! - TOML configuration files
//! - Environment variable overrides
//! - Multiple config file locations
//!
//! # Configuration File Locations
//!
//! Configuration files are searched in order (first found wins):
//! 1. `./fuzzylab.toml` - Project-local configuration
//! 2. `~/.config/fuzzylab/config.toml` - User configuration (XDG)
//! 3. `/etc/fuzzylab/config.toml` - System-wide configuration
//!
//! # Environment Variables
//!
//! - `FUZZYLAB_LOG_LEVEL` - Logging verbosity (quiet, normal, verbose, debug)
//! - `FUZZYLAB_HOST` - Address the HTTP server binds to
//! - `FUZZYLAB_PORT` - HTTP server port
//! - `FUZZYLAB_EDGE_DELTA` - Boundary nudge distance (0 disables nudging)
//! - `FUZZYLAB_LEGACY_ROUTES` - Also mount routes without the `/api` prefix
//! - `ENVIRONMENT` - Deployment environment (`production` restricts CORS)
//! - `FRONTEND_URL` - The only allowed CORS origin in production
//!
//! # Example Configuration
//!
//! ```toml
//! # fuzzylab.toml
//!
//! [general]
//! log_level = "normal"
//!
//! [server]
//! port = 5000
//! host = "0.0.0.0"
//! legacy_routes = true
//!
//! [cors]
//! environment = "production"
//! frontend_url = "https://fuzzy.example.org"
//!
//! [engine]
//! nudge_edges = true
//! edge_delta = 0.01
//! ```

use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domains::plant_care;
use crate::error::{ErrorCode, FuzzyError};

// ============================================================================
// Configuration Schema
// ============================================================================

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// General settings
    pub general: GeneralConfig,
    /// HTTP server settings
    pub server: ServerConfig,
    /// Cross-origin policy
    pub cors: CorsConfig,
    /// Inference pre-processing
    pub engine: EngineConfig,
}

/// General configuration options
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GeneralConfig {
    /// Logging level
    pub log_level: LogLevel,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,
    /// Server host
    pub host: String,
    /// Enable CORS
    pub cors_enabled: bool,
    /// Maximum request body size (bytes)
    pub max_body_size: usize,
    /// Log every request through the trace layer
    pub enable_tracing: bool,
    /// Mount `/fuzzy-logic/*` next to `/api/fuzzy-logic/*`
    pub legacy_routes: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            host: "0.0.0.0".to_string(),
            cors_enabled: true,
            max_body_size: 1024 * 1024, // 1 MB
            enable_tracing: true,
            legacy_routes: true,
        }
    }
}

impl ServerConfig {
    /// Get the socket address
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ConfigError::InvalidValue("server.host".to_string(), self.host.clone()))
    }
}

/// Cross-origin configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Deployment environment name
    pub environment: String,
    /// Frontend origin used in production
    pub frontend_url: Option<String>,
    /// Origins allowed outside production
    pub dev_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            frontend_url: None,
            dev_origins: vec![
                "http://127.0.0.1:3000".to_string(),
                "http://localhost:3000".to_string(),
            ],
        }
    }
}

impl CorsConfig {
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    /// The frontend URL in production when one is set, the dev origins otherwise
    pub fn allowed_origins(&self) -> Vec<String> {
        match &self.frontend_url {
            Some(url) if self.is_production() && !url.trim().is_empty() => vec![url.trim().to_string()],
            _ => self.dev_origins.clone(),
        }
    }
}

/// Inference pre-processing options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Nudge boundary-exact inputs inward before inference
    pub nudge_edges: bool,
    /// Nudge distance
    pub edge_delta: f64,
}

impl EngineConfig {
    /// Exclusive upper bound on `edge_delta`: half the narrowest input
    /// universe (plant-care temperature), so a nudged value stays inside it
    pub const MAX_EDGE_DELTA: f64 = (plant_care::TEMPERATURE_RANGE.1 - plant_care::TEMPERATURE_RANGE.0) / 2.0;
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            nudge_edges: true,
            edge_delta: 0.01,
        }
    }
}

/// Log level options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Quiet,
    #[default]
    Normal,
    Verbose,
    Debug,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Verbose => "verbose",
            LogLevel::Debug => "debug",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "quiet" | "q" | "0" => Some(LogLevel::Quiet),
            "normal" | "n" | "1" => Some(LogLevel::Normal),
            "verbose" | "v" | "2" => Some(LogLevel::Verbose),
            "debug" | "d" | "3" => Some(LogLevel::Debug),
            _ => None,
        }
    }

    /// Maximum level handed to the tracing subscriber
    pub fn tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Quiet => tracing::Level::ERROR,
            LogLevel::Normal => tracing::Level::INFO,
            LogLevel::Verbose => tracing::Level::DEBUG,
            LogLevel::Debug => tracing::Level::TRACE,
        }
    }
}

// ============================================================================
// Configuration Loading
// ============================================================================

impl AppConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from the first existing search path, then apply
    /// environment variable overrides
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        for path in Self::config_paths() {
            if path.exists() {
                config = Self::load_from_file(&path)?;
                break;
            }
        }

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(path.to_path_buf(), e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError(path.to_path_buf(), e.to_string()))
    }

    /// Load configuration from a TOML string
    pub fn load_from_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(PathBuf::from("<string>"), e.to_string()))
    }

    /// Get the list of config file search paths
    pub fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("./fuzzylab.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("fuzzylab").join("config.toml"));
        }

        #[cfg(unix)]
        paths.push(PathBuf::from("/etc/fuzzylab/config.toml"));

        paths
    }

    /// Apply overrides from the process environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    /// Apply overrides from any key lookup
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("FUZZYLAB_LOG_LEVEL").and_then(|v| LogLevel::from_str(&v)) {
            self.general.log_level = level;
        }

        if let Some(host) = lookup("FUZZYLAB_HOST") {
            self.server.host = host;
        }

        if let Some(port) = lookup("FUZZYLAB_PORT").and_then(|v| v.parse::<u16>().ok()) {
            self.server.port = port;
        }

        if let Some(delta) = lookup("FUZZYLAB_EDGE_DELTA").and_then(|v| v.parse::<f64>().ok()) {
            self.engine.edge_delta = delta;
            self.engine.nudge_edges = delta > 0.0;
        }

        if let Some(val) = lookup("FUZZYLAB_LEGACY_ROUTES") {
            self.server.legacy_routes = val == "true" || val == "1" || val == "yes";
        }

        if let Some(environment) = lookup("ENVIRONMENT") {
            self.cors.environment = environment;
        }

        if let Some(url) = lookup("FRONTEND_URL") {
            self.cors.frontend_url = Some(url);
        }
    }

    /// Reject values that would break inference or binding
    pub fn validate(&self) -> Result<(), ConfigError> {
        let delta = self.engine.edge_delta;
        if !delta.is_finite() || delta < 0.0 || delta >= EngineConfig::MAX_EDGE_DELTA {
            return Err(ConfigError::InvalidValue(
                "engine.edge_delta".to_string(),
                self.engine.edge_delta.to_string(),
            ));
        }
        if self.server.max_body_size == 0 {
            return Err(ConfigError::InvalidValue(
                "server.max_body_size".to_string(),
                "0".to_string(),
            ));
        }
        self.server.socket_addr().map(|_| ())
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError(e.to_string()))
    }

    /// Generate a default configuration file content
    pub fn default_config_content() -> &'static str {
        r#"# fuzzylab configuration file

[general]
# Logging level: quiet, normal, verbose, debug
log_level = "normal"

[server]
port = 5000
host = "0.0.0.0"
cors_enabled = true
# Maximum request body size in bytes
max_body_size = 1048576
# Log every request
enable_tracing = true
# Also serve /fuzzy-logic/* without the /api prefix
legacy_routes = true

[cors]
# "production" restricts CORS to frontend_url when it is set
environment = "development"
# frontend_url = "https://fuzzy.example.org"
dev_origins = ["http://127.0.0.1:3000", "http://localhost:3000"]

[engine]
# Move inputs sitting exactly on a universe bound inward before inference
nudge_edges = true
edge_delta = 0.01
"#
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// IO error reading config file
    IoError(PathBuf, String),
    /// Parse error in config file
    ParseError(PathBuf, String),
    /// Serialization error
    SerializeError(String),
    /// A key holds an unusable value
    InvalidValue(String, String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(path, msg) => {
                write!(f, "IO error reading {}: {}", path.display(), msg)
            }
            ConfigError::ParseError(path, msg) => {
                write!(f, "Parse error in {}: {}", path.display(), msg)
            }
            ConfigError::SerializeError(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
            ConfigError::InvalidValue(key, value) => {
                write!(f, "Invalid value for {}: {}", key, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for FuzzyError {
    fn from(err: ConfigError) -> Self {
        let code = match &err {
            ConfigError::ParseError(..) => ErrorCode::InvalidConfigSyntax,
            ConfigError::InvalidValue(..) => ErrorCode::InvalidConfigValue,
            ConfigError::IoError(..) | ConfigError::SerializeError(_) => ErrorCode::ConfigError,
        };
        FuzzyError::new(code, err.to_string())
    }
}

// ============================================================================
// Tests
// ============================================================================
