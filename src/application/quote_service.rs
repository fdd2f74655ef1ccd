//! Quote Service
//!
//! Reads a token's live bonding curve and turns a trade size into slippage-bounded
//! trade parameters.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::domain::curve::{max_sol_cost, min_output, QuoteError};
use crate::domain::{is_valid_mint, BondingCurveAccount};
use crate::ports::{CurveReader, CurveReaderError};

/// Default slippage tolerance (1%)
pub const DEFAULT_SLIPPAGE_BPS: u16 = 100;

#[derive(Debug, Error)]
pub enum QuoteServiceError {
    #[error("Invalid mint address: {0}")]
    InvalidMint(String),

    #[error("Failed to read bonding curve: {0}")]
    Reader(#[from] CurveReaderError),

    #[error("Quote failed: {0}")]
    Quote(#[from] QuoteError),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuyQuote {
    pub mint: String,
    /// Lamports spent
    pub sol_in: u64,
    /// Token base units received at the current reserves
    pub tokens_out: u64,
    /// Least tokens acceptable under the slippage tolerance
    pub min_tokens_out: u64,
    /// Most lamports to authorize under the slippage tolerance
    pub max_sol_cost: u64,
    /// Execution price vs. spot, percent
    pub price_impact_pct: f64,
    pub curve: BondingCurveAccount,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SellQuote {
    pub mint: String,
    /// Token base units sold
    pub tokens_in: u64,
    /// Lamports received at the current reserves
    pub sol_out: u64,
    /// Least lamports acceptable under the slippage tolerance
    pub min_sol_out: u64,
    pub price_impact_pct: f64,
    pub curve: BondingCurveAccount,
}

pub struct QuoteService {
    reader: Arc<dyn CurveReader>,
    slippage_bps: u16,
}

impl QuoteService {
    pub fn new(reader: Arc<dyn CurveReader>) -> Self {
        Self::with_slippage(reader, DEFAULT_SLIPPAGE_BPS)
    }

    pub fn with_slippage(reader: Arc<dyn CurveReader>, slippage_bps: u16) -> Self {
        Self {
            reader,
            slippage_bps,
        }
    }

    pub fn slippage_bps(&self) -> u16 {
        self.slippage_bps
    }

    /// Quote spending `sol_in` lamports on `mint`
    pub async fn quote_buy(&self, mint: &str, sol_in: u64) -> Result<BuyQuote, QuoteServiceError> {
        let curve = self.read(mint).await?;
        let tokens_out = curve.quote_buy(sol_in)?;

        let quote = BuyQuote {
            mint: mint.to_string(),
            sol_in,
            tokens_out,
            min_tokens_out: min_output(tokens_out, self.slippage_bps)?,
            max_sol_cost: max_sol_cost(sol_in, self.slippage_bps)?,
            // lamports per base unit paid vs. S/T
            price_impact_pct: price_impact(&curve, sol_in, tokens_out),
            curve,
        };
        debug!("Buy quote for {}: {} lamports -> {} units", mint, sol_in, tokens_out);
        Ok(quote)
    }

    /// Quote selling `tokens_in` base units of `mint`
    pub async fn quote_sell(&self, mint: &str, tokens_in: u64) -> Result<SellQuote, QuoteServiceError> {
        let curve = self.read(mint).await?;
        let sol_out = curve.quote_sell(tokens_in)?;

        let quote = SellQuote {
            mint: mint.to_string(),
            tokens_in,
            sol_out,
            min_sol_out: min_output(sol_out, self.slippage_bps)?,
            price_impact_pct: -price_impact(&curve, sol_out, tokens_in),
            curve,
        };
        debug!("Sell quote for {}: {} units -> {} lamports", mint, tokens_in, sol_out);
        Ok(quote)
    }

    async fn read(&self, mint: &str) -> Result<BondingCurveAccount, QuoteServiceError> {
        if !is_valid_mint(mint) {
            return Err(QuoteServiceError::InvalidMint(mint.to_string()));
        }
        Ok(self.reader.read_curve(mint).await?)
    }
}

/// Percent deviation of the executed lamports-per-unit price from spot
fn price_impact(curve: &BondingCurveAccount, lamports: u64, units: u64) -> f64 {
    if units == 0 || curve.virtual_token_reserves == 0 || curve.virtual_sol_reserves == 0 {
        return 0.0;
    }
    let spot = curve.virtual_sol_reserves as f64 / curve.virtual_token_reserves as f64;
    let executed = lamports as f64 / units as f64;
    (executed / spot - 1.0) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LAMPORTS_PER_SOL;
    use crate::ports::curve_reader::MockCurveReader;
    use approx::assert_relative_eq;

    const MINT: &str = "So11111111111111111111111111111111111111112";

    fn fresh_curve() -> BondingCurveAccount {
        BondingCurveAccount {
            virtual_token_reserves: 1_073_000_000_000_000,
            virtual_sol_reserves: 30_000_000_000,
            real_token_reserves: 793_100_000_000_000,
            real_sol_reserves: 10 * LAMPORTS_PER_SOL,
            token_total_supply: 1_000_000_000_000_000,
            complete: false,
        }
    }

    fn service_with(curve: BondingCurveAccount) -> QuoteService {
        let mut reader = MockCurveReader::new();
        reader
            .expect_read_curve()
            .withf(|mint| mint == MINT)
            .returning(move |_| Ok(curve));
        QuoteService::new(Arc::new(reader))
    }

    #[tokio::test]
    async fn test_buy_quote() {
        let service = service_with(fresh_curve());
        let quote = service.quote_buy(MINT, LAMPORTS_PER_SOL).await.unwrap();

        // 1.073e15 * 1e9 / 31e9
        assert_eq!(quote.tokens_out, 34_612_903_225_806);
        assert_eq!(quote.min_tokens_out, 34_266_774_193_547);
        assert_eq!(quote.max_sol_cost, 1_010_000_000);
        // Buying 1 of 30 SOL costs ~3.33% over spot
        assert_relative_eq!(quote.price_impact_pct, 3.3333, epsilon = 0.001);
    }

    #[tokio::test]
    async fn test_sell_quote() {
        let service = service_with(fresh_curve());
        let quote = service.quote_sell(MINT, 10_000_000_000_000).await.unwrap();

        let expected = fresh_curve().curve_state().sell_quote(10_000_000_000_000).unwrap();
        assert_eq!(quote.sol_out, expected);
        assert!(quote.min_sol_out < quote.sol_out);
        assert!(quote.price_impact_pct > 0.0);
    }

    #[tokio::test]
    async fn test_invalid_mint_skips_reader() {
        let mut reader = MockCurveReader::new();
        reader.expect_read_curve().never();
        let service = QuoteService::new(Arc::new(reader));

        let result = service.quote_buy("bogus", 1).await;
        assert!(matches!(result, Err(QuoteServiceError::InvalidMint(_))));
    }

    #[tokio::test]
    async fn test_reader_error_propagates() {
        let mut reader = MockCurveReader::new();
        reader
            .expect_read_curve()
            .returning(|mint| Err(CurveReaderError::AccountNotFound(mint.to_string())));
        let service = QuoteService::new(Arc::new(reader));

        let result = service.quote_buy(MINT, LAMPORTS_PER_SOL).await;
        assert!(matches!(
            result,
            Err(QuoteServiceError::Reader(CurveReaderError::AccountNotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_completed_curve() {
        let service = service_with(BondingCurveAccount {
            complete: true,
            ..fresh_curve()
        });
        let result = service.quote_sell(MINT, 1_000).await;
        assert!(matches!(result, Err(QuoteServiceError::Quote(QuoteError::CurveComplete))));
    }

    #[tokio::test]
    async fn test_zero_amount_rejected() {
        let service = service_with(fresh_curve());
        let result = service.quote_buy(MINT, 0).await;
        assert!(matches!(result, Err(QuoteServiceError::Quote(QuoteError::InvalidInput(_)))));
    }
}
