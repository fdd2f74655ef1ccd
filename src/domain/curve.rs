//! Bonding Curve Quoter
//!
//! Constant-product pricing for pump.fun bonding curves. All arithmetic is done in
//! integer base units (lamports, 6-decimal token units) with `u128` intermediates
//! and floor division, matching the on-chain program.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lamports per SOL
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// pump.fun token decimals
pub const TOKEN_DECIMALS: u32 = 6;

/// Base units per whole token
pub const TOKEN_BASE_UNITS: u64 = 1_000_000;

/// Basis points denominator
pub const BPS_DENOMINATOR: u64 = 10_000;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuoteError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Insufficient liquidity: requested {requested}, available {available}")]
    InsufficientLiquidity { requested: u64, available: u64 },

    #[error("Bonding curve is complete, token has migrated")]
    CurveComplete,

    #[error("Arithmetic overflow in quote calculation")]
    Overflow,
}

/// Virtual reserves of a bonding curve, in base units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveState {
    /// Virtual SOL reserves in lamports
    pub virtual_sol_reserves: u64,
    /// Virtual token reserves in token base units
    pub virtual_token_reserves: u64,
}

impl CurveState {
    pub fn new(virtual_sol_reserves: u64, virtual_token_reserves: u64) -> Self {
        Self {
            virtual_sol_reserves,
            virtual_token_reserves,
        }
    }

    /// Tokens received for `sol_in` lamports
    pub fn buy_quote(&self, sol_in: u64) -> Result<u64, QuoteError> {
        calculate_buy_quote(sol_in, self.virtual_sol_reserves, self.virtual_token_reserves)
    }

    /// Lamports received for `tokens_in` base units
    pub fn sell_quote(&self, tokens_in: u64) -> Result<u64, QuoteError> {
        calculate_sell_quote(tokens_in, self.virtual_sol_reserves, self.virtual_token_reserves)
    }

    /// Curve state after a buy of `sol_in` lamports
    pub fn apply_buy(&self, sol_in: u64) -> Result<CurveState, QuoteError> {
        let tokens_out = self.buy_quote(sol_in)?;
        Ok(CurveState {
            virtual_sol_reserves: self
                .virtual_sol_reserves
                .checked_add(sol_in)
                .ok_or(QuoteError::Overflow)?,
            virtual_token_reserves: self.virtual_token_reserves - tokens_out,
        })
    }

    /// Curve state after a sell of `tokens_in` base units
    pub fn apply_sell(&self, tokens_in: u64) -> Result<CurveState, QuoteError> {
        let sol_out = self.sell_quote(tokens_in)?;
        Ok(CurveState {
            virtual_sol_reserves: self.virtual_sol_reserves - sol_out,
            virtual_token_reserves: self
                .virtual_token_reserves
                .checked_add(tokens_in)
                .ok_or(QuoteError::Overflow)?,
        })
    }

    /// Spot price in SOL per whole token. Display only.
    pub fn spot_price_sol(&self) -> f64 {
        if self.virtual_token_reserves == 0 {
            return 0.0;
        }
        let sol = self.virtual_sol_reserves as f64 / LAMPORTS_PER_SOL as f64;
        let tokens = self.virtual_token_reserves as f64 / TOKEN_BASE_UNITS as f64;
        sol / tokens
    }

    /// Market cap in SOL for a total supply given in base units. Display only.
    pub fn market_cap_sol(&self, total_supply: u64) -> f64 {
        self.spot_price_sol() * (total_supply as f64 / TOKEN_BASE_UNITS as f64)
    }
}

/// Tokens out for a buy of `sol_in` lamports.
///
/// Solves `(S + x) * (T - y) = S * T` for `y`, flooring the trader's output:
/// `y = floor(T * x / (S + x))`.
///
/// Can be one unit below `T - floor(S * T / (S + x))`, the form pump.fun's web UI uses.
pub fn calculate_buy_quote(
    sol_in: u64,
    virtual_sol_reserves: u64,
    virtual_token_reserves: u64,
) -> Result<u64, QuoteError> {
    if sol_in == 0 {
        return Err(QuoteError::InvalidInput("SOL amount must be greater than zero".into()));
    }
    if virtual_sol_reserves == 0 || virtual_token_reserves == 0 {
        return Err(QuoteError::InsufficientLiquidity {
            requested: sol_in,
            available: 0,
        });
    }

    let s = virtual_sol_reserves as u128;
    let t = virtual_token_reserves as u128;
    let x = sol_in as u128;

    let tokens_out = t * x / (s + x);
    // Unreachable for nonzero reserves since x / (S + x) < 1; kept as a guard
    if tokens_out >= t {
        return Err(QuoteError::InsufficientLiquidity {
            requested: tokens_out as u64,
            available: virtual_token_reserves,
        });
    }

    Ok(tokens_out as u64)
}

/// Lamports out for a sell of `tokens_in` base units.
///
/// Solves `(T + y) * (S - x) = S * T` for `x`: `x = floor(S * y / (T + y))`.
pub fn calculate_sell_quote(
    tokens_in: u64,
    virtual_sol_reserves: u64,
    virtual_token_reserves: u64,
) -> Result<u64, QuoteError> {
    if tokens_in == 0 {
        return Err(QuoteError::InvalidInput("token amount must be greater than zero".into()));
    }
    if virtual_sol_reserves == 0 || virtual_token_reserves == 0 {
        return Err(QuoteError::InsufficientLiquidity {
            requested: tokens_in,
            available: 0,
        });
    }

    let s = virtual_sol_reserves as u128;
    let t = virtual_token_reserves as u128;
    let y = tokens_in as u128;

    let sol_out = s * y / (t + y);
    // Unreachable for nonzero reserves since y / (T + y) < 1; kept as a guard
    if sol_out >= s {
        return Err(QuoteError::InsufficientLiquidity {
            requested: sol_out as u64,
            available: virtual_sol_reserves,
        });
    }

    Ok(sol_out as u64)
}

/// Maximum SOL a buyer should authorize for `sol_in` with `slippage_bps` tolerance.
/// Rounds up.
pub fn max_sol_cost(sol_in: u64, slippage_bps: u16) -> Result<u64, QuoteError> {
    let numerator = sol_in as u128 * (BPS_DENOMINATOR + slippage_bps as u64) as u128;
    let denominator = BPS_DENOMINATOR as u128;
    let cost = (numerator + denominator - 1) / denominator;
    u64::try_from(cost).map_err(|_| QuoteError::Overflow)
}

/// Minimum acceptable output for `amount` with `slippage_bps` tolerance. Rounds down.
pub fn min_output(amount: u64, slippage_bps: u16) -> Result<u64, QuoteError> {
    if slippage_bps as u64 > BPS_DENOMINATOR {
        return Err(QuoteError::InvalidInput(format!(
            "slippage {} bps exceeds 100%",
            slippage_bps
        )));
    }
    let out = amount as u128 * (BPS_DENOMINATOR - slippage_bps as u64) as u128
        / BPS_DENOMINATOR as u128;
    Ok(out as u64)
}

/// Convert a SOL amount to lamports, truncating sub-lamport dust
pub fn sol_to_lamports(sol: f64) -> Result<u64, QuoteError> {
    if !sol.is_finite() || sol < 0.0 {
        return Err(QuoteError::InvalidInput(format!("invalid SOL amount: {}", sol)));
    }
    let lamports = (sol * LAMPORTS_PER_SOL as f64).floor();
    if lamports > u64::MAX as f64 {
        return Err(QuoteError::Overflow);
    }
    Ok(lamports as u64)
}

/// Convert a whole-token amount to base units, truncating dust
pub fn tokens_to_base_units(tokens: f64) -> Result<u64, QuoteError> {
    if !tokens.is_finite() || tokens < 0.0 {
        return Err(QuoteError::InvalidInput(format!("invalid token amount: {}", tokens)));
    }
    let units = (tokens * TOKEN_BASE_UNITS as f64).floor();
    if units > u64::MAX as f64 {
        return Err(QuoteError::Overflow);
    }
    Ok(units as u64)
}
