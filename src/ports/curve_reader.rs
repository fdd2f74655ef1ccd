//! Curve Reader Port
//!
//! Source of on-chain bonding curve state for a mint.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::bonding_curve::{AccountError, BondingCurveAccount};

#[derive(Debug, Error)]
pub enum CurveReaderError {
    #[error("Invalid mint address: {0}")]
    InvalidMint(String),

    #[error("Bonding curve account not found for mint {0}")]
    AccountNotFound(String),

    #[error("RPC request failed: {0}")]
    RpcError(String),

    #[error("Invalid account data: {0}")]
    InvalidAccountData(#[from] AccountError),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CurveReader: Send + Sync {
    /// Fetch and decode the bonding curve account for `mint`
    async fn read_curve(&self, mint: &str) -> Result<BondingCurveAccount, CurveReaderError>;
}
