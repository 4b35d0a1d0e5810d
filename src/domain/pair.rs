//! Token pair model.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::PairId;

/// Lifecycle bucket a pair belongs to. Fixed for the pair's lifetime.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    #[default]
    New,
    FinalStretch,
    Migrated,
    Trending,
}

impl Category {
    /// Every category, in board order.
    pub const ALL: [Category; 4] = [
        Category::New,
        Category::FinalStretch,
        Category::Migrated,
        Category::Trending,
    ];

    /// The three categories shown as board columns.
    pub const COLUMNS: [Category; 3] = [Category::New, Category::FinalStretch, Category::Migrated];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Category::New => "new",
            Category::FinalStretch => "final-stretch",
            Category::Migrated => "migrated",
            Category::Trending => "trending",
        }
    }

    /// Column heading.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Category::New => "New Pairs",
            Category::FinalStretch => "Final Stretch",
            Category::Migrated => "Migrated",
            Category::Trending => "Trending",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeKind {
    Bagholder,
    Verified,
    Migrated,
    New,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    pub kind: BadgeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Badge {
    pub fn new(kind: BadgeKind) -> Self {
        Self { kind, label: None }
    }

    pub fn labelled(kind: BadgeKind, label: impl Into<String>) -> Self {
        Self {
            kind,
            label: Some(label.into()),
        }
    }
}

/// Social links attached to a pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairLinks {
    pub website: Option<String>,
    pub twitter: Option<String>,
    pub telegram: Option<String>,
    pub discord: Option<String>,
}

/// Buy and sell transaction counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Txns {
    pub buys: u32,
    pub sells: u32,
}

impl Txns {
    #[must_use]
    pub fn total(&self) -> u32 {
        self.buys + self.sells
    }
}

/// A tracked token pair.
///
/// `price` and `price_change_24h` are the only fields that move during a
/// session; everything else is fixed at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenPair {
    pub id: PairId,
    pub symbol: String,
    pub name: String,
    pub image: String,
    pub market_cap: f64,
    pub liquidity: f64,
    pub volume_24h: f64,
    pub price: f64,
    /// Percentage change over 24h, accumulated per simulated move.
    pub price_change_24h: f64,
    pub txns: Txns,
    pub holders: u32,
    /// Display age such as `13m`, `4h`, `47s` or `2d`.
    pub age: String,
    pub badges: Vec<Badge>,
    pub links: PairLinks,
    pub category: Category,
}

impl TokenPair {
    /// Create a pair with the given identity and price; remaining attributes
    /// start empty.
    pub fn new(id: impl Into<PairId>, symbol: impl Into<String>, category: Category, price: f64) -> Self {
        let symbol = symbol.into();
        Self {
            id: id.into(),
            name: symbol.clone(),
            symbol,
            image: String::new(),
            market_cap: 0.0,
            liquidity: 0.0,
            volume_24h: 0.0,
            price,
            price_change_24h: 0.0,
            txns: Txns::default(),
            holders: 0,
            age: String::new(),
            badges: Vec::new(),
            links: PairLinks::default(),
            category,
        }
    }

    #[must_use]
    pub fn has_badge(&self, kind: BadgeKind) -> bool {
        self.badges.iter().any(|b| b.kind == kind)
    }
}
