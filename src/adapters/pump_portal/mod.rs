//! PumpPortal Adapter
//!
//! Real-time pump.fun launch, trade and migration events from the PumpPortal
//! WebSocket feed.
//!
//! # Example
//!
//! ```ignore
//! use pump_stream::adapters::pump_portal::{PumpPortalClient, StreamConfigBuilder};
//!
//! let client = PumpPortalClient::with_config(
//!     StreamConfigBuilder::new().max_reconnect_attempts(10).build(),
//! );
//!
//! let watcher = client.clone();
//! client.on_token_create(move |token| {
//!     println!("New token: {} ({}) - mcap: {} SOL", token.name, token.symbol, token.market_cap_sol);
//!     watcher.subscribe_token_trades([token.mint.clone()]);
//! });
//! client.on_trade(|trade| println!("{} on {}: {} SOL", trade.direction, trade.mint, trade.sol_amount));
//!
//! client.subscribe_new_tokens();
//! client.connect();
//! ```
//!
//! # WebSocket Protocol
//!
//! `wss://pumpportal.fun/api/data` accepts JSON control frames of the form
//! `{"method": "...", "keys": [...]}`:
//!
//! - `subscribeNewToken` / `unsubscribeNewToken`
//! - `subscribeMigration` (no unsubscribe exists)
//! - `subscribeTokenTrade` / `unsubscribeTokenTrade` keyed by mint
//! - `subscribeAccountTrade` / `unsubscribeAccountTrade` keyed by wallet
//!
//! Inbound events carry a `txType` of `create`, `buy`, `sell` or `migration`.

mod client;
mod transport;
mod types;

pub use client::{
    PumpPortalClient, ReconnectPolicy, StreamConfig, StreamConfigBuilder, StreamError,
    SubscriptionState, WeakPumpPortalClient, DEFAULT_WS_URL, MAX_RECONNECT_DELAY_MS, RECONNECT_BASE_DELAY_MS,
};
pub use transport::WsConnector;
pub use types::{
    parse_frame, ControlMessage, ControlMethod, FrameRejection, InboundFrame, Migration,
    StreamEvent, TokenCreate, Trade, TradeDirection, GRADUATION_MARKET_CAP_SOL,
};
