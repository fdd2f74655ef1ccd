//! Token Filter
//!
//! Criteria applied to tokens before they enter the feed. Unset bounds match
//! everything.

use serde::{Deserialize, Serialize};

use super::feed::{FeedEntry, Launchpad};

/// Which launchpad pools to accept
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoolFilter {
    Pump,
    Bonk,
    #[default]
    All,
}

impl PoolFilter {
    pub fn accepts(&self, launchpad: Launchpad) -> bool {
        match self {
            PoolFilter::All => true,
            PoolFilter::Pump => launchpad == Launchpad::Pump,
            PoolFilter::Bonk => launchpad == Launchpad::Bonk,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenFilter {
    /// Market cap bounds, in SOL
    pub min_market_cap: Option<f64>,
    pub max_market_cap: Option<f64>,
    /// Minimum creator initial buy, in tokens
    pub min_initial_buy: Option<f64>,
    pub pool: PoolFilter,
    /// Curve completion bounds, 0-100
    pub min_bonding_curve: Option<f64>,
    pub max_bonding_curve: Option<f64>,
    /// Case-insensitive match on name, symbol or mint
    pub search_term: Option<String>,
}

impl TokenFilter {
    pub fn matches(&self, entry: &FeedEntry) -> bool {
        if self.min_market_cap.is_some_and(|min| entry.market_cap_sol < min) {
            return false;
        }
        if self.max_market_cap.is_some_and(|max| entry.market_cap_sol > max) {
            return false;
        }
        if self.min_initial_buy.is_some_and(|min| entry.initial_buy < min) {
            return false;
        }
        if !self.pool.accepts(entry.launchpad) {
            return false;
        }
        if self.min_bonding_curve.is_some_and(|min| entry.bonding_curve_progress < min) {
            return false;
        }
        if self.max_bonding_curve.is_some_and(|max| entry.bonding_curve_progress > max) {
            return false;
        }

        match self.search_term.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => {
                let term = term.to_lowercase();
                entry.name.to_lowercase().contains(&term)
                    || entry.symbol.to_lowercase().contains(&term)
                    || entry.mint.to_lowercase().contains(&term)
            }
            _ => true,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == TokenFilter::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::feed::tests::entry;

    #[test]
    fn test_default_matches_everything() {
        let filter = TokenFilter::default();
        assert!(filter.is_empty());
        assert!(filter.matches(&entry("a")));
    }

    #[test]
    fn test_market_cap_bounds() {
        let filter = TokenFilter {
            min_market_cap: Some(25.0),
            max_market_cap: Some(35.0),
            ..Default::default()
        };
        let mut e = entry("a");
        assert!(filter.matches(&e));

        e.market_cap_sol = 20.0;
        assert!(!filter.matches(&e));
        e.market_cap_sol = 40.0;
        assert!(!filter.matches(&e));
    }

    #[test]
    fn test_initial_buy() {
        let filter = TokenFilter {
            min_initial_buy: Some(5_000_000.0),
            ..Default::default()
        };
        assert!(!filter.matches(&entry("a")));
    }

    #[test]
    fn test_pool() {
        let bonk_only = TokenFilter {
            pool: PoolFilter::Bonk,
            ..Default::default()
        };
        let mut e = entry("a");
        assert!(!bonk_only.matches(&e));
        e.launchpad = Launchpad::Bonk;
        assert!(bonk_only.matches(&e));
    }

    #[test]
    fn test_bonding_curve_bounds() {
        let filter = TokenFilter {
            min_bonding_curve: Some(50.0),
            ..Default::default()
        };
        let mut e = entry("a");
        assert!(!filter.matches(&e));
        e.bonding_curve_progress = 75.0;
        assert!(filter.matches(&e));

        let filter = TokenFilter {
            max_bonding_curve: Some(50.0),
            ..Default::default()
        };
        assert!(!filter.matches(&e));
    }

    #[test]
    fn test_search_term() {
        let mut e = entry("Mint9xyz");
        e.name = "Doge Killer".to_string();
        e.symbol = "DOGEK".to_string();

        let search = |term: &str| TokenFilter {
            search_term: Some(term.to_string()),
            ..Default::default()
        };
        assert!(search("killer").matches(&e));
        assert!(search("dogek").matches(&e));
        assert!(search("9XYZ").matches(&e));
        assert!(search("  ").matches(&e));
        assert!(!search("pepe").matches(&e));
    }

    #[test]
    fn test_deserialize_from_toml() {
        let filter: TokenFilter = toml::from_str(
            r#"
            min_market_cap = 10.0
            pool = "pump"
            search_term = "cat"
            "#,
        )
        .unwrap();
        assert_eq!(filter.min_market_cap, Some(10.0));
        assert_eq!(filter.pool, PoolFilter::Pump);
        assert_eq!(filter.search_term.as_deref(), Some("cat"));
    }
}
