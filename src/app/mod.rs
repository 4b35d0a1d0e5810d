//! Application layer: configuration, logging and the dashboard context.

mod config;
mod dashboard;
mod logging;

pub use config::{Config, CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH};
pub use dashboard::Dashboard;
pub use logging::LoggingConfig;
