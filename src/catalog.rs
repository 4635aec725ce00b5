use anyhow::{bail, Context, Result};
use serde::Deserialize;

/// One entry of the bundled Pyth Lazer feed list.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FeedDescriptor {
    pub pyth_lazer_id: u32,
    pub name: String,
    pub symbol: String,
    pub description: String,
    pub asset_type: String,
    pub exponent: i32,
    pub cmc_id: u32,
    pub interval: Option<u64>,
    pub min_publishers: u32,
    pub min_channel: String,
    pub state: String,
}

/// Static feed catalog. Loaded once at startup, never mutated.
#[derive(Debug, Clone)]
pub struct FeedCatalog {
    feeds: Vec<FeedDescriptor>,
}

const BUNDLED_LIST: &str = include_str!("../data/pyth_lazer_list.json");

impl FeedCatalog {
    /// Parse the feed list shipped with the binary.
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_LIST)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let feeds: Vec<FeedDescriptor> =
            serde_json::from_str(json).context("failed to parse feed list")?;
        if feeds.is_empty() {
            bail!("feed list is empty");
        }
        Ok(Self { feeds })
    }

    pub fn feeds(&self) -> &[FeedDescriptor] {
        &self.feeds
    }

    pub fn len(&self) -> usize {
        self.feeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.feeds.is_empty()
    }

    pub fn by_name(&self, name: &str) -> Option<&FeedDescriptor> {
        self.feeds.iter().find(|f| f.name == name)
    }

    /// Case-insensitive substring search over name, symbol and description.
    /// An empty term matches everything.
    pub fn filter(&self, term: &str) -> Vec<&FeedDescriptor> {
        if term.is_empty() {
            return self.feeds.iter().collect();
        }
        let term = term.to_lowercase();
        self.feeds
            .iter()
            .filter(|f| {
                f.name.to_lowercase().contains(&term)
                    || f.symbol.to_lowercase().contains(&term)
                    || f.description.to_lowercase().contains(&term)
            })
            .collect()
    }
}
