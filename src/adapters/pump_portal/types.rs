//! PumpPortal Types
//!
//! Wire types for the PumpPortal real-time data feed: inbound events discriminated
//! by `txType`, and outbound subscription control frames.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::curve::{sol_to_lamports, tokens_to_base_units, CurveState, QuoteError};

/// Market cap (in SOL) at which a pump.fun curve completes
pub const GRADUATION_MARKET_CAP_SOL: f64 = 85.0;

/// New token created on the launchpad.
///
/// Amounts are in UI units as sent by the feed: SOL and whole tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenCreate {
    #[serde(default)]
    pub signature: Option<String>,
    pub mint: String,
    /// Creator wallet
    pub trader_public_key: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub symbol: String,
    /// Metadata JSON location (usually IPFS)
    #[serde(rename = "uri", default)]
    pub metadata_uri: Option<String>,
    /// Creator's initial buy, in tokens
    #[serde(default)]
    pub initial_buy: f64,
    /// SOL spent on the initial buy
    #[serde(default)]
    pub sol_amount: f64,
    #[serde(default)]
    pub bonding_curve_key: Option<String>,
    #[serde(rename = "vTokensInBondingCurve", default)]
    pub virtual_token_reserves: f64,
    #[serde(rename = "vSolInBondingCurve", default)]
    pub virtual_sol_reserves: f64,
    #[serde(default)]
    pub market_cap_sol: f64,
    /// Launchpad pool, e.g. "pump" or "bonk"
    #[serde(default)]
    pub pool: Option<String>,
}

impl TokenCreate {
    /// Approximate curve completion from market cap, 0-100
    pub fn bonding_curve_progress(&self) -> f64 {
        bonding_curve_progress(self.market_cap_sol)
    }

    /// Reported virtual reserves in base units
    pub fn curve_state(&self) -> Result<CurveState, QuoteError> {
        curve_state_from_ui(self.virtual_sol_reserves, self.virtual_token_reserves)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeDirection {
    Buy,
    Sell,
}

impl TradeDirection {
    pub fn is_buy(&self) -> bool {
        matches!(self, TradeDirection::Buy)
    }
}

impl std::fmt::Display for TradeDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeDirection::Buy => f.pad("BUY"),
            TradeDirection::Sell => f.pad("SELL"),
        }
    }
}

/// Buy or sell on a bonding curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    #[serde(default)]
    pub signature: Option<String>,
    pub mint: String,
    pub trader_public_key: String,
    #[serde(rename = "txType")]
    pub direction: TradeDirection,
    #[serde(default)]
    pub token_amount: f64,
    #[serde(default)]
    pub sol_amount: f64,
    /// Trader's token balance after the trade
    #[serde(default)]
    pub new_token_balance: f64,
    #[serde(default)]
    pub bonding_curve_key: Option<String>,
    #[serde(rename = "vTokensInBondingCurve", default)]
    pub virtual_token_reserves: f64,
    #[serde(rename = "vSolInBondingCurve", default)]
    pub virtual_sol_reserves: f64,
    #[serde(default)]
    pub market_cap_sol: f64,
    #[serde(default)]
    pub pool: Option<String>,
}

impl Trade {
    pub fn bonding_curve_progress(&self) -> f64 {
        bonding_curve_progress(self.market_cap_sol)
    }

    /// Post-trade virtual reserves in base units
    pub fn curve_state(&self) -> Result<CurveState, QuoteError> {
        curve_state_from_ui(self.virtual_sol_reserves, self.virtual_token_reserves)
    }
}

/// Token graduated from the bonding curve to a liquidity pool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Migration {
    #[serde(default)]
    pub signature: Option<String>,
    pub mint: String,
    #[serde(default)]
    pub pool: Option<String>,
}

/// Parsed market-data event
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    TokenCreate(TokenCreate),
    Trade(Trade),
    Migration(Migration),
}

impl StreamEvent {
    /// Mint the event refers to
    pub fn mint(&self) -> &str {
        match self {
            StreamEvent::TokenCreate(e) => &e.mint,
            StreamEvent::Trade(e) => &e.mint,
            StreamEvent::Migration(e) => &e.mint,
        }
    }
}

/// Classified inbound frame
#[derive(Debug, Clone, PartialEq)]
pub enum InboundFrame {
    Event(StreamEvent),
    /// Subscription acknowledgement or other informational message
    Notice(String),
    /// Error reported by the server
    ServerError(String),
    /// Valid JSON with an unknown shape
    Ignored,
}

/// Why an inbound frame was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameRejection {
    TooLarge(usize),
    NotJson(String),
    BadEvent { tx_type: String, reason: String },
}

impl std::fmt::Display for FrameRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FrameRejection::TooLarge(size) => write!(f, "frame too large: {} bytes", size),
            FrameRejection::NotJson(e) => write!(f, "not valid JSON: {}", e),
            FrameRejection::BadEvent { tx_type, reason } => {
                write!(f, "malformed '{}' event: {}", tx_type, reason)
            }
        }
    }
}

/// Parse one inbound text frame
pub fn parse_frame(raw: &str, max_size: usize) -> Result<InboundFrame, FrameRejection> {
    if raw.len() > max_size {
        return Err(FrameRejection::TooLarge(raw.len()));
    }

    let value: Value = serde_json::from_str(raw).map_err(|e| {
        FrameRejection::NotJson(format!("line {}, column {}: {:?}", e.line(), e.column(), e.classify()))
    })?;

    let tx_type = match value.get("txType").and_then(Value::as_str) {
        Some(tx_type) => tx_type.to_string(),
        None => return Ok(classify_control(&value)),
    };

    let bad_event = |e: serde_json::Error| FrameRejection::BadEvent {
        tx_type: tx_type.clone(),
        reason: e.to_string(),
    };

    let event = match tx_type.as_str() {
        "create" => StreamEvent::TokenCreate(serde_json::from_value(value).map_err(bad_event)?),
        "buy" | "sell" => StreamEvent::Trade(serde_json::from_value(value).map_err(bad_event)?),
        "migration" | "migrate" => {
            StreamEvent::Migration(serde_json::from_value(value).map_err(bad_event)?)
        }
        _ => return Ok(InboundFrame::Ignored),
    };

    Ok(InboundFrame::Event(event))
}

fn classify_control(value: &Value) -> InboundFrame {
    for key in ["errors", "error"] {
        if let Some(err) = value.get(key) {
            let message = match err {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            return InboundFrame::ServerError(message);
        }
    }
    if let Some(message) = value.get("message").and_then(Value::as_str) {
        return InboundFrame::Notice(message.to_string());
    }
    InboundFrame::Ignored
}

/// Subscription control method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ControlMethod {
    SubscribeNewToken,
    UnsubscribeNewToken,
    SubscribeMigration,
    SubscribeTokenTrade,
    UnsubscribeTokenTrade,
    SubscribeAccountTrade,
    UnsubscribeAccountTrade,
}

/// Outbound control frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlMessage {
    pub method: ControlMethod,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub keys: Option<Vec<String>>,
}

impl ControlMessage {
    pub fn new_token() -> Self {
        Self {
            method: ControlMethod::SubscribeNewToken,
            keys: None,
        }
    }

    pub fn unsubscribe_new_token() -> Self {
        Self {
            method: ControlMethod::UnsubscribeNewToken,
            keys: None,
        }
    }

    pub fn migrations() -> Self {
        Self {
            method: ControlMethod::SubscribeMigration,
            keys: None,
        }
    }

    pub fn token_trades(mints: Vec<String>) -> Self {
        Self {
            method: ControlMethod::SubscribeTokenTrade,
            keys: Some(mints),
        }
    }

    pub fn unsubscribe_token_trades(mints: Vec<String>) -> Self {
        Self {
            method: ControlMethod::UnsubscribeTokenTrade,
            keys: Some(mints),
        }
    }

    pub fn account_trades(accounts: Vec<String>) -> Self {
        Self {
            method: ControlMethod::SubscribeAccountTrade,
            keys: Some(accounts),
        }
    }

    pub fn unsubscribe_account_trades(accounts: Vec<String>) -> Self {
        Self {
            method: ControlMethod::UnsubscribeAccountTrade,
            keys: Some(accounts),
        }
    }

    /// JSON text for the wire
    pub fn to_json(&self) -> String {
        // Plain enum + string list; serialization cannot fail
        serde_json::to_string(self).unwrap_or_default()
    }
}

fn bonding_curve_progress(market_cap_sol: f64) -> f64 {
    if !market_cap_sol.is_finite() || market_cap_sol <= 0.0 {
        return 0.0;
    }
    (market_cap_sol / GRADUATION_MARKET_CAP_SOL * 100.0).min(100.0)
}

fn curve_state_from_ui(sol: f64, tokens: f64) -> Result<CurveState, QuoteError> {
    Ok(CurveState::new(sol_to_lamports(sol)?, tokens_to_base_units(tokens)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX: usize = 1_048_576;

    fn create_json() -> &'static str {
        r#"{
            "signature": "5xSig",
            "mint": "7GCihgDB8fe6KNjn2MYtkzZcRjQy3t9GHdC8uHYmW2hr",
            "traderPublicKey": "Creator456",
            "txType": "create",
            "initialBuy": 35190840.5,
            "solAmount": 1.0,
            "bondingCurveKey": "Curve789",
            "vTokensInBondingCurve": 1037809159.5,
            "vSolInBondingCurve": 31.01,
            "marketCapSol": 29.88,
            "name": "Test Meme",
            "symbol": "MEME",
            "uri": "https://ipfs.io/ipfs/abc",
            "pool": "pump"
        }"#
    }

    #[test]
    fn test_parse_create() {
        let frame = parse_frame(create_json(), MAX).unwrap();
        let InboundFrame::Event(StreamEvent::TokenCreate(token)) = frame else {
            panic!("Expected TokenCreate, got {:?}", frame);
        };
        assert_eq!(token.mint, "7GCihgDB8fe6KNjn2MYtkzZcRjQy3t9GHdC8uHYmW2hr");
        assert_eq!(token.trader_public_key, "Creator456");
        assert_eq!(token.symbol, "MEME");
        assert_eq!(token.metadata_uri.as_deref(), Some("https://ipfs.io/ipfs/abc"));
        assert_eq!(token.pool.as_deref(), Some("pump"));
        assert!((token.market_cap_sol - 29.88).abs() < 1e-9);
    }

    #[test]
    fn test_parse_trade() {
        let json = r#"{
            "mint": "TokenMint123",
            "traderPublicKey": "Trader789",
            "txType": "sell",
            "tokenAmount": 500000.0,
            "solAmount": 0.015,
            "newTokenBalance": 0,
            "bondingCurveKey": "Curve789",
            "vTokensInBondingCurve": 1000000000,
            "vSolInBondingCurve": 32.5,
            "marketCapSol": 32.5
        }"#;

        let frame = parse_frame(json, MAX).unwrap();
        let InboundFrame::Event(StreamEvent::Trade(trade)) = frame else {
            panic!("Expected Trade, got {:?}", frame);
        };
        assert_eq!(trade.direction, TradeDirection::Sell);
        assert!(!trade.direction.is_buy());
        assert_eq!(trade.trader_public_key, "Trader789");

        let state = trade.curve_state().unwrap();
        assert_eq!(state.virtual_sol_reserves, 32_500_000_000);
        assert_eq!(state.virtual_token_reserves, 1_000_000_000_000_000);
    }

    #[test]
    fn test_parse_migration() {
        let json = r#"{"txType": "migration", "mint": "TokenMint123", "signature": "sig", "pool": "pump-amm"}"#;
        let frame = parse_frame(json, MAX).unwrap();
        assert_eq!(
            frame,
            InboundFrame::Event(StreamEvent::Migration(Migration {
                signature: Some("sig".into()),
                mint: "TokenMint123".into(),
                pool: Some("pump-amm".into()),
            }))
        );
    }

    #[test]
    fn test_non_json_rejected() {
        assert!(matches!(
            parse_frame("this is not json", MAX),
            Err(FrameRejection::NotJson(_))
        ));
        assert!(matches!(
            parse_frame(r#"{"mint": "test""#, MAX),
            Err(FrameRejection::NotJson(_))
        ));
    }

    #[test]
    fn test_event_missing_fields_rejected() {
        let result = parse_frame(r#"{"txType": "buy", "mint": "abc"}"#, MAX);
        assert!(matches!(result, Err(FrameRejection::BadEvent { .. })));
    }

    #[test]
    fn test_oversized_frame_rejected() {
        let large = format!(r#"{{"mint": "{}"}}"#, "x".repeat(200));
        assert_eq!(parse_frame(&large, 100), Err(FrameRejection::TooLarge(large.len())));
    }

    #[test]
    fn test_control_frames() {
        assert_eq!(
            parse_frame(r#"{"message": "Successfully subscribed to keys."}"#, MAX).unwrap(),
            InboundFrame::Notice("Successfully subscribed to keys.".into())
        );
        assert_eq!(
            parse_frame(r#"{"errors": "Invalid method"}"#, MAX).unwrap(),
            InboundFrame::ServerError("Invalid method".into())
        );
        assert_eq!(parse_frame("[1, 2, 3]", MAX).unwrap(), InboundFrame::Ignored);
        assert_eq!(
            parse_frame(r#"{"txType": "unknown", "mint": "x"}"#, MAX).unwrap(),
            InboundFrame::Ignored
        );
    }

    #[test]
    fn test_control_message_json() {
        let json = ControlMessage::new_token().to_json();
        assert_eq!(json, r#"{"method":"subscribeNewToken"}"#);

        let json = ControlMessage::token_trades(vec!["mint1".into(), "mint2".into()]).to_json();
        assert_eq!(json, r#"{"method":"subscribeTokenTrade","keys":["mint1","mint2"]}"#);

        let json = ControlMessage::unsubscribe_account_trades(vec!["acct".into()]).to_json();
        assert!(json.contains("unsubscribeAccountTrade"));
    }

    #[test]
    fn test_bonding_curve_progress() {
        let frame = parse_frame(create_json(), MAX).unwrap();
        let InboundFrame::Event(StreamEvent::TokenCreate(mut token)) = frame else {
            panic!("Expected TokenCreate");
        };
        token.market_cap_sol = 42.5;
        assert!((token.bonding_curve_progress() - 50.0).abs() < 1e-9);
        token.market_cap_sol = 400.0;
        assert_eq!(token.bonding_curve_progress(), 100.0);
        token.market_cap_sol = 0.0;
        assert_eq!(token.bonding_curve_progress(), 0.0);
    }
}
