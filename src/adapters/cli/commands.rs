//! CLI Command Definitions
//!
//! Argument parsing for the pump-stream binary.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// pump-stream - PumpPortal market-data client and bonding curve quoter
#[derive(Parser, Debug)]
#[command(
    name = "pump-stream",
    version = env!("CARGO_PKG_VERSION"),
    about = "PumpPortal market-data client and pump.fun bonding curve quoter",
    long_about = "pump-stream keeps a reconnecting connection to the PumpPortal real-time \
                  feed and prices pump.fun bonding curve trades with exact integer math."
)]
pub struct CliApp {
    /// The command to execute
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (defaults are used if omitted)
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Stream launches, trades and migrations until Ctrl+C
    Stream(StreamCmd),

    /// Quote a trade offline from given reserves
    #[command(subcommand)]
    Quote(QuoteCmd),

    /// Fetch a token's bonding curve over RPC and quote against it
    Curve(CurveCmd),
}

/// Stream live events
#[derive(Args, Debug)]
pub struct StreamCmd {
    /// Also watch trades on these mints
    #[arg(long = "mint", value_name = "MINT")]
    pub mints: Vec<String>,

    /// Also watch trades by these wallets
    #[arg(long = "account", value_name = "WALLET")]
    pub accounts: Vec<String>,

    /// Don't subscribe to every new launch
    #[arg(long)]
    pub no_new_tokens: bool,

    /// Maintain the filtered token feed and print it on exit
    #[arg(long)]
    pub feed: bool,

    /// Print events as JSON lines
    #[arg(long)]
    pub json: bool,

    /// Override WebSocket URL
    #[arg(long, value_name = "URL")]
    pub ws_url: Option<String>,
}

/// Offline quote against virtual reserves
#[derive(Subcommand, Debug)]
pub enum QuoteCmd {
    /// Tokens received for a SOL amount
    Buy(QuoteArgs),

    /// SOL received for a token amount
    Sell(QuoteArgs),
}

#[derive(Args, Debug)]
pub struct QuoteArgs {
    /// Amount in: SOL for a buy, whole tokens for a sell
    #[arg(value_name = "AMOUNT")]
    pub amount: f64,

    /// Virtual SOL reserves, in SOL
    #[arg(long, value_name = "SOL", default_value = "30")]
    pub virtual_sol: f64,

    /// Virtual token reserves, in whole tokens
    #[arg(long, value_name = "TOKENS", default_value = "1073000000")]
    pub virtual_tokens: f64,

    /// Slippage tolerance in basis points
    #[arg(long, value_name = "BPS", default_value = "100")]
    pub slippage: u16,
}

/// Quote against a live bonding curve
#[derive(Args, Debug)]
pub struct CurveCmd {
    /// Token mint address
    #[arg(value_name = "MINT")]
    pub mint: String,

    /// SOL to spend on a buy quote
    #[arg(long, value_name = "SOL", conflicts_with = "sell")]
    pub buy: Option<f64>,

    /// Whole tokens to sell
    #[arg(long, value_name = "TOKENS")]
    pub sell: Option<f64>,

    /// Slippage tolerance in basis points (defaults to config)
    #[arg(long, value_name = "BPS")]
    pub slippage: Option<u16>,

    /// Override RPC URL
    #[arg(long, value_name = "URL")]
    pub rpc_url: Option<String>,
}
