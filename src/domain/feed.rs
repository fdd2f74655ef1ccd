//! Token Feed
//!
//! Bounded, newest-first cache of recently launched tokens, kept current by trade
//! and migration events. Duplicate creates for a cached mint are ignored.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default number of tokens kept
pub const DEFAULT_FEED_CAPACITY: usize = 60;

/// Launchpad a token was created on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Launchpad {
    Pump,
    Bonk,
}

impl Launchpad {
    /// Tokens without a pool tag come from pump.fun
    pub fn from_pool(pool: Option<&str>) -> Self {
        match pool {
            Some(p) if p.eq_ignore_ascii_case("bonk") => Launchpad::Bonk,
            _ => Launchpad::Pump,
        }
    }
}

/// Cached view of one token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedEntry {
    pub mint: String,
    pub name: String,
    pub symbol: String,
    pub creator: String,
    pub metadata_uri: Option<String>,
    pub image: Option<String>,
    pub twitter: Option<String>,
    pub telegram: Option<String>,
    pub website: Option<String>,
    pub launchpad: Launchpad,
    /// Creator's initial buy, in tokens
    pub initial_buy: f64,
    pub market_cap_sol: f64,
    pub virtual_sol_reserves: f64,
    pub virtual_token_reserves: f64,
    /// Curve completion, 0-100
    pub bonding_curve_progress: f64,
    pub buys: u64,
    pub sells: u64,
    /// Cumulative traded SOL since the token was cached
    pub volume_sol: f64,
    pub migrated: bool,
    pub created_at: DateTime<Utc>,
    pub last_trade_at: Option<DateTime<Utc>>,
}

/// Market state reported by a trade
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TradeUpdate {
    pub is_buy: bool,
    pub sol_amount: f64,
    pub market_cap_sol: f64,
    pub virtual_sol_reserves: f64,
    pub virtual_token_reserves: f64,
    pub bonding_curve_progress: f64,
    pub at: DateTime<Utc>,
}

/// Result of offering a create event to the feed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateOutcome {
    /// False if the mint was already cached
    pub inserted: bool,
    /// Mints dropped to make room
    pub evicted: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct TokenFeed {
    capacity: usize,
    entries: VecDeque<FeedEntry>,
}

impl Default for TokenFeed {
    fn default() -> Self {
        Self::new(DEFAULT_FEED_CAPACITY)
    }
}

impl TokenFeed {
    /// Feed holding at most `capacity` tokens (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, mint: &str) -> bool {
        self.position(mint).is_some()
    }

    pub fn get(&self, mint: &str) -> Option<&FeedEntry> {
        self.position(mint).map(|i| &self.entries[i])
    }

    /// Entries newest first
    pub fn entries(&self) -> impl Iterator<Item = &FeedEntry> {
        self.entries.iter()
    }

    /// Insert a newly created token at the front
    pub fn on_create(&mut self, entry: FeedEntry) -> CreateOutcome {
        if self.contains(&entry.mint) {
            return CreateOutcome::default();
        }

        self.entries.push_front(entry);
        let mut evicted = Vec::new();
        while self.entries.len() > self.capacity {
            if let Some(old) = self.entries.pop_back() {
                evicted.push(old.mint);
            }
        }

        CreateOutcome {
            inserted: true,
            evicted,
        }
    }

    /// Apply a trade to a cached token. Returns false if the mint is not cached.
    pub fn on_trade(&mut self, mint: &str, update: &TradeUpdate) -> bool {
        let Some(entry) = self.get_mut(mint) else {
            return false;
        };

        if update.is_buy {
            entry.buys += 1;
        } else {
            entry.sells += 1;
        }
        entry.volume_sol += update.sol_amount;
        entry.market_cap_sol = update.market_cap_sol;
        entry.virtual_sol_reserves = update.virtual_sol_reserves;
        entry.virtual_token_reserves = update.virtual_token_reserves;
        entry.bonding_curve_progress = update.bonding_curve_progress;
        entry.last_trade_at = Some(update.at);
        true
    }

    /// Mark a cached token as migrated. Returns false if the mint is not cached.
    pub fn on_migration(&mut self, mint: &str) -> bool {
        let Some(entry) = self.get_mut(mint) else {
            return false;
        };
        entry.migrated = true;
        entry.bonding_curve_progress = 100.0;
        true
    }

    /// Run `f` against a cached entry, e.g. to attach resolved metadata
    pub fn update<F>(&mut self, mint: &str, f: F) -> bool
    where
        F: FnOnce(&mut FeedEntry),
    {
        match self.get_mut(mint) {
            Some(entry) => {
                f(entry);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn position(&self, mint: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.mint == mint)
    }

    fn get_mut(&mut self, mint: &str) -> Option<&mut FeedEntry> {
        let index = self.position(mint)?;
        self.entries.get_mut(index)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn entry(mint: &str) -> FeedEntry {
        FeedEntry {
            mint: mint.to_string(),
            name: format!("{} Token", mint),
            symbol: mint.to_uppercase(),
            creator: "Creator111".to_string(),
            metadata_uri: None,
            image: None,
            twitter: None,
            telegram: None,
            website: None,
            launchpad: Launchpad::Pump,
            initial_buy: 1_000_000.0,
            market_cap_sol: 30.0,
            virtual_sol_reserves: 30.0,
            virtual_token_reserves: 1_073_000_000.0,
            bonding_curve_progress: 35.29,
            buys: 0,
            sells: 0,
            volume_sol: 0.0,
            migrated: false,
            created_at: Utc::now(),
            last_trade_at: None,
        }
    }

    fn trade(is_buy: bool, sol: f64, mcap: f64) -> TradeUpdate {
        TradeUpdate {
            is_buy,
            sol_amount: sol,
            market_cap_sol: mcap,
            virtual_sol_reserves: 31.0,
            virtual_token_reserves: 1_040_000_000.0,
            bonding_curve_progress: mcap / 85.0 * 100.0,
            at: Utc::now(),
        }
    }

    #[test]
    fn test_newest_first() {
        let mut feed = TokenFeed::new(10);
        feed.on_create(entry("a"));
        feed.on_create(entry("b"));
        feed.on_create(entry("c"));

        let mints: Vec<&str> = feed.entries().map(|e| e.mint.as_str()).collect();
        assert_eq!(mints, vec!["c", "b", "a"]);
    }

    #[test]
    fn test_duplicate_create_ignored() {
        let mut feed = TokenFeed::new(10);
        assert!(feed.on_create(entry("a")).inserted);

        let mut renamed = entry("a");
        renamed.name = "Other".to_string();
        let outcome = feed.on_create(renamed);

        assert!(!outcome.inserted);
        assert_eq!(feed.len(), 1);
        assert_eq!(feed.get("a").unwrap().name, "a Token");
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut feed = TokenFeed::new(2);
        feed.on_create(entry("a"));
        feed.on_create(entry("b"));
        let outcome = feed.on_create(entry("c"));

        assert!(outcome.inserted);
        assert_eq!(outcome.evicted, vec!["a".to_string()]);
        assert_eq!(feed.len(), 2);
        assert!(!feed.contains("a"));
    }

    #[test]
    fn test_default_capacity() {
        let mut feed = TokenFeed::default();
        for i in 0..100 {
            feed.on_create(entry(&format!("mint{}", i)));
        }
        assert_eq!(feed.len(), DEFAULT_FEED_CAPACITY);
        assert_eq!(feed.entries().next().unwrap().mint, "mint99");
    }

    #[test]
    fn test_trade_updates_entry() {
        let mut feed = TokenFeed::new(10);
        feed.on_create(entry("a"));

        assert!(feed.on_trade("a", &trade(true, 0.5, 42.5)));
        assert!(feed.on_trade("a", &trade(false, 0.25, 40.0)));

        let e = feed.get("a").unwrap();
        assert_eq!(e.buys, 1);
        assert_eq!(e.sells, 1);
        assert!((e.volume_sol - 0.75).abs() < 1e-9);
        assert_eq!(e.market_cap_sol, 40.0);
        assert!(e.last_trade_at.is_some());
    }

    #[test]
    fn test_trade_for_unknown_mint() {
        let mut feed = TokenFeed::new(10);
        assert!(!feed.on_trade("missing", &trade(true, 1.0, 50.0)));
    }

    #[test]
    fn test_migration_marks_entry() {
        let mut feed = TokenFeed::new(10);
        feed.on_create(entry("a"));

        assert!(feed.on_migration("a"));
        assert!(!feed.on_migration("b"));
        let e = feed.get("a").unwrap();
        assert!(e.migrated);
        assert_eq!(e.bonding_curve_progress, 100.0);
    }

    #[test]
    fn test_update_attaches_metadata() {
        let mut feed = TokenFeed::new(10);
        feed.on_create(entry("a"));
        assert!(feed.update("a", |e| e.image = Some("https://img".into())));
        assert_eq!(feed.get("a").unwrap().image.as_deref(), Some("https://img"));
    }

    #[test]
    fn test_launchpad_from_pool() {
        assert_eq!(Launchpad::from_pool(None), Launchpad::Pump);
        assert_eq!(Launchpad::from_pool(Some("pump")), Launchpad::Pump);
        assert_eq!(Launchpad::from_pool(Some("bonk")), Launchpad::Bonk);
    }
}
