//! Configuration loading.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use super::logging::LoggingConfig;
use crate::cache::CacheConfig;
use crate::error::{ConfigError, Result};
use crate::feed::FeedConfig;
use crate::source::MockSourceConfig;
use crate::view::{PaginationConfig, ViewConfig};

/// Environment variable naming an alternative config file.
pub const CONFIG_PATH_ENV: &str = "PAIRPULSE_CONFIG";

/// Config file read when [`CONFIG_PATH_ENV`] is unset.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Application configuration. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
    #[serde(default)]
    pub source: MockSourceConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Parse and validate TOML content.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Load from `$PAIRPULSE_CONFIG`, else `config.toml`.
    ///
    /// A missing default file yields the defaults; a missing file named by
    /// the environment variable is an error.
    pub fn discover() -> Result<Self> {
        match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => Self::load(PathBuf::from(path)),
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => Self::load(DEFAULT_CONFIG_PATH),
            None => {
                debug!("No config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        self.feed.validate()?;
        self.pagination.validate()?;
        if self.source.pairs_per_category > MockSourceConfig::MAX_PAIRS_PER_CATEGORY {
            return Err(ConfigError::InvalidValue {
                field: "pairs_per_category",
                reason: format!(
                    "must be at most {}",
                    MockSourceConfig::MAX_PAIRS_PER_CATEGORY
                ),
            }
            .into());
        }
        Ok(())
    }

    pub fn init_logging(&self) {
        self.logging.init();
    }
}
