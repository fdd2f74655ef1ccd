//! Domain Layer - Core logic for the pump.fun market-data client
//!
//! Pure types and math with no I/O. All external interactions happen through the
//! ports layer.
//!
//! - `curve`: constant-product bonding curve quoter
//! - `bonding_curve`: decoded on-chain curve account
//! - `feed`: bounded cache of recent launches
//! - `filter`: launch filtering criteria

pub mod curve;
pub mod bonding_curve;
pub mod feed;
pub mod filter;

pub use curve::{
    calculate_buy_quote, calculate_sell_quote, max_sol_cost, min_output, sol_to_lamports,
    tokens_to_base_units, CurveState, QuoteError, LAMPORTS_PER_SOL, TOKEN_BASE_UNITS,
};
pub use bonding_curve::{AccountError, BondingCurveAccount};
pub use feed::{CreateOutcome, FeedEntry, Launchpad, TokenFeed, TradeUpdate, DEFAULT_FEED_CAPACITY};
pub use filter::{PoolFilter, TokenFilter};

/// Length of a decoded Solana public key
const PUBKEY_LEN: usize = 32;

/// Whether `address` is a base58 string decoding to a 32-byte public key
pub fn is_valid_mint(address: &str) -> bool {
    bs58::decode(address)
        .into_vec()
        .map(|bytes| bytes.len() == PUBKEY_LEN)
        .unwrap_or(false)
}
