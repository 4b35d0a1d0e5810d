use thiserror::Error;

use crate::domain::{Category, PairId};

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Errors surfaced by a [`PairSource`](crate::source::PairSource).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SourceError {
    #[error("failed to fetch page {page} of {category}: {reason}")]
    PageFetch {
        category: Category,
        page: usize,
        reason: String,
    },

    #[error("failed to fetch pair {pair_id}: {reason}")]
    PairFetch { pair_id: PairId, reason: String },

    #[error("invalid page size: {0}")]
    InvalidPageSize(usize),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Source(#[from] SourceError),
}

pub type Result<T> = std::result::Result<T, Error>;
