//! Bonding Curve Account
//!
//! Decoded pump.fun bonding curve account and liquidity-aware quoting on top of
//! the constant-product quoter.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::curve::{CurveState, QuoteError, LAMPORTS_PER_SOL};

/// Anchor discriminator length
const DISCRIMINATOR_LEN: usize = 8;

/// Discriminator + five u64 fields + complete flag
pub const BONDING_CURVE_ACCOUNT_LEN: usize = DISCRIMINATOR_LEN + 5 * 8 + 1;

/// Real SOL in the curve at which the token graduates (~85 SOL)
pub const GRADUATION_SOL_LAMPORTS: u64 = 85 * LAMPORTS_PER_SOL;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccountError {
    #[error("Account data too short: {actual} bytes, expected at least {expected}")]
    TooShort { actual: usize, expected: usize },
}

/// On-chain bonding curve state for a pump.fun token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BondingCurveAccount {
    pub virtual_token_reserves: u64,
    pub virtual_sol_reserves: u64,
    pub real_token_reserves: u64,
    pub real_sol_reserves: u64,
    pub token_total_supply: u64,
    /// Whether the curve has completed (token migrated)
    pub complete: bool,
}

impl BondingCurveAccount {
    /// Decode raw account data
    pub fn from_account_data(data: &[u8]) -> Result<Self, AccountError> {
        if data.len() < BONDING_CURVE_ACCOUNT_LEN {
            return Err(AccountError::TooShort {
                actual: data.len(),
                expected: BONDING_CURVE_ACCOUNT_LEN,
            });
        }

        let field = |index: usize| {
            let start = DISCRIMINATOR_LEN + index * 8;
            let mut bytes = [0u8; 8];
            bytes.copy_from_slice(&data[start..start + 8]);
            u64::from_le_bytes(bytes)
        };

        Ok(Self {
            virtual_token_reserves: field(0),
            virtual_sol_reserves: field(1),
            real_token_reserves: field(2),
            real_sol_reserves: field(3),
            token_total_supply: field(4),
            complete: data[DISCRIMINATOR_LEN + 40] != 0,
        })
    }

    /// Virtual reserves used for pricing
    pub fn curve_state(&self) -> CurveState {
        CurveState::new(self.virtual_sol_reserves, self.virtual_token_reserves)
    }

    /// Tokens out for `sol_in` lamports, capped by the real token reserves
    pub fn quote_buy(&self, sol_in: u64) -> Result<u64, QuoteError> {
        if self.complete {
            return Err(QuoteError::CurveComplete);
        }
        let tokens_out = self.curve_state().buy_quote(sol_in)?;
        if tokens_out > self.real_token_reserves {
            return Err(QuoteError::InsufficientLiquidity {
                requested: tokens_out,
                available: self.real_token_reserves,
            });
        }
        Ok(tokens_out)
    }

    /// Lamports out for `tokens_in` base units, capped by the real SOL reserves
    pub fn quote_sell(&self, tokens_in: u64) -> Result<u64, QuoteError> {
        if self.complete {
            return Err(QuoteError::CurveComplete);
        }
        let sol_out = self.curve_state().sell_quote(tokens_in)?;
        if sol_out > self.real_sol_reserves {
            return Err(QuoteError::InsufficientLiquidity {
                requested: sol_out,
                available: self.real_sol_reserves,
            });
        }
        Ok(sol_out)
    }

    /// Graduation progress as a percentage of the ~85 SOL target
    pub fn graduation_progress(&self) -> f64 {
        let progress = self.real_sol_reserves as f64 / GRADUATION_SOL_LAMPORTS as f64 * 100.0;
        progress.min(100.0)
    }

    /// Market cap in SOL
    pub fn market_cap_sol(&self) -> f64 {
        self.curve_state().market_cap_sol(self.token_total_supply)
    }
}
