//! Pair identifier newtype.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Token pair identifier.
///
/// Assigned when a pair is created and never reused. The inner String is
/// private so every construction goes through the constructors below.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PairId(String);

impl PairId {
    /// Create a new `PairId` from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the pair ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PairId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for PairId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for PairId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
