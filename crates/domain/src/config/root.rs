use serde::{Deserialize, Serialize};
use std::path::Path;

use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::resolver::ResolverConfig;

const LOCAL_CONFIG: &str = "ferrous-stub.toml";
const SYSTEM_RESOLV_CONF: &str = "/etc/resolv.conf";

/// Main configuration structure for Ferrous Stub
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Name servers, timeouts and search list
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. ferrous-stub.toml in current directory
    /// 3. /etc/resolv.conf (resolver section only)
    /// 4. Default configuration
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let config = if let Some(path) = path {
            Self::from_file(path)?
        } else if Path::new(LOCAL_CONFIG).exists() {
            Self::from_file(LOCAL_CONFIG)?
        } else if Path::new(SYSTEM_RESOLV_CONF).exists() {
            Self::from_resolv_conf_file(SYSTEM_RESOLV_CONF)?
        } else {
            Self::default()
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific TOML file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Build a configuration whose resolver section comes from a
    /// resolv.conf style file
    pub fn from_resolv_conf_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Ok(Self {
            resolver: ResolverConfig::from_resolv_conf(&contents),
            logging: LoggingConfig::default(),
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.resolver.validate()?;
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::Validation(
                "logging.level cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}
