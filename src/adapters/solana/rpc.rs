use async_trait::async_trait;
use solana_client::rpc_client::RpcClient;
use solana_sdk::{commitment_config::CommitmentConfig, pubkey, pubkey::Pubkey};
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

use crate::domain::bonding_curve::BondingCurveAccount;
use crate::ports::{CurveReader, CurveReaderError};

/// pump.fun bonding curve program
pub const PUMP_PROGRAM_ID: Pubkey = pubkey!("6EF8rrecthR5Dkzon8Nwu78hRvfCKubJ14M5uBEwF6P");

/// PDA seed prefix for bonding curve accounts
const BONDING_CURVE_SEED: &[u8] = b"bonding-curve";

/// Derive the bonding curve account address for a mint
pub fn bonding_curve_address(mint: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[BONDING_CURVE_SEED, mint.as_ref()], &PUMP_PROGRAM_ID).0
}

/// Reads bonding curve accounts over Solana RPC
#[derive(Clone)]
pub struct SolanaCurveReader {
    client: Arc<RpcClient>,
}

impl SolanaCurveReader {
    /// Create a new reader against `rpc_url`
    pub fn new(rpc_url: String) -> Self {
        let client = Arc::new(RpcClient::new_with_commitment(rpc_url, CommitmentConfig::confirmed()));
        Self { client }
    }
}

#[async_trait]
impl CurveReader for SolanaCurveReader {
    async fn read_curve(&self, mint: &str) -> Result<BondingCurveAccount, CurveReaderError> {
        let mint_key = Pubkey::from_str(mint)
            .map_err(|e| CurveReaderError::InvalidMint(format!("{}: {}", mint, e)))?;
        let curve_key = bonding_curve_address(&mint_key);
        debug!("Reading bonding curve {} for mint {}", curve_key, mint);

        // Spawn blocking to make sync RPC call async-compatible
        let client = Arc::clone(&self.client);
        let account = tokio::task::spawn_blocking(move || {
            client
                .get_account_with_commitment(&curve_key, CommitmentConfig::confirmed())
                .map(|response| response.value)
                .map_err(|e| CurveReaderError::RpcError(e.to_string()))
        })
        .await
        .map_err(|e| CurveReaderError::RpcError(format!("Task join error: {}", e)))??;

        let account = account.ok_or_else(|| CurveReaderError::AccountNotFound(mint.to_string()))?;
        Ok(BondingCurveAccount::from_account_data(&account.data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bonding_curve_address_is_deterministic() {
        let mint = Pubkey::new_unique();
        assert_eq!(bonding_curve_address(&mint), bonding_curve_address(&mint));
        assert_ne!(bonding_curve_address(&mint), bonding_curve_address(&Pubkey::new_unique()));
    }

    #[test]
    fn test_bonding_curve_address_is_off_curve() {
        let curve = bonding_curve_address(&Pubkey::new_unique());
        assert!(!curve.is_on_curve());
    }

    #[tokio::test]
    async fn test_invalid_mint_rejected_before_rpc() {
        let reader = SolanaCurveReader::new("http://127.0.0.1:1".to_string());
        let result = reader.read_curve("not-a-mint").await;
        assert!(matches!(result, Err(CurveReaderError::InvalidMint(_))));
    }
}
