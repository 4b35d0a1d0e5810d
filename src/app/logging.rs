//! Tracing subscriber setup for the board.

use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};

/// The `[logging]` table of the config file.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset, e.g. `pairpulse=debug`.
    #[serde(default = "default_level")]
    pub level: String,
    /// `json` for one JSON object per event; anything else prints human-readable lines.
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_level() -> String {
    "info".into()
}

fn default_format() -> String {
    "pretty".into()
}

impl LoggingConfig {
    /// Install the global subscriber. Call once, before the dashboard starts.
    ///
    /// A valid `RUST_LOG` replaces `level` entirely; an unset or malformed one
    /// falls back to it.
    pub fn init(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        match self.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).init();
            }
            _ => {
                fmt().with_env_filter(filter).init();
            }
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
        }
    }
}
