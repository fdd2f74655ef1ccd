//! pump-stream - PumpPortal market-data client and bonding curve quoter

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{fmt, EnvFilter};

use pump_stream::adapters::cli::{CliApp, Command, CurveCmd, QuoteArgs, QuoteCmd, StreamCmd};
use pump_stream::adapters::metadata::{HttpMetadataResolver, MetadataConfig};
use pump_stream::adapters::pump_portal::{PumpPortalClient, WsConnector};
use pump_stream::adapters::solana::SolanaCurveReader;
use pump_stream::application::{FeedService, FeedUpdate, QuoteService};
use pump_stream::config::{load_config, Config};
use pump_stream::domain::curve::{max_sol_cost, min_output, TOKEN_BASE_UNITS};
use pump_stream::domain::{is_valid_mint, sol_to_lamports, tokens_to_base_units, CurveState, LAMPORTS_PER_SOL};
use pump_stream::ports::CurveReader;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    dotenvy::dotenv().ok();

    let app = CliApp::parse();
    let config = match &app.config {
        Some(path) => {
            let path = shellexpand::tilde(&path.to_string_lossy()).to_string();
            load_config(&path).with_context(|| format!("Failed to load configuration from {}", path))?
        }
        None => {
            let config = Config::default();
            config.validate().context("Invalid default configuration")?;
            config
        }
    };
    init_logging(app.verbose, app.debug, &config.logging.level)?;

    match app.command {
        Command::Stream(cmd) => stream_command(cmd, config).await,
        Command::Quote(cmd) => quote_command(cmd),
        Command::Curve(cmd) => curve_command(cmd, config).await,
    }
}

fn init_logging(verbose: bool, debug: bool, level: &str) -> Result<()> {
    let filter = if debug {
        EnvFilter::new("debug")
    } else if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_new(level).with_context(|| format!("Invalid log level '{}'", level))?
    };

    fmt().with_env_filter(filter).init();
    Ok(())
}

async fn stream_command(cmd: StreamCmd, config: Config) -> Result<()> {
    for key in cmd.mints.iter().chain(&cmd.accounts) {
        if !is_valid_mint(key) {
            bail!("'{}' is not a valid Solana address", key);
        }
    }

    let mut stream_config = config.stream.to_stream_config();
    if let Some(url) = cmd.ws_url {
        stream_config.ws_url = url;
    }
    let connector = WsConnector::new(Duration::from_secs(config.stream.connect_timeout_secs));
    let client = PumpPortalClient::new(stream_config, connector);

    client.on_connect(|| tracing::info!("Stream connected"));
    client.on_disconnect(|| tracing::info!("Stream disconnected"));
    client.on_error(|e| tracing::warn!("Stream error: {}", e));

    let feed = if cmd.feed {
        let (service, updates) = if config.feed.resolve_metadata {
            let resolver = HttpMetadataResolver::with_config(MetadataConfig {
                timeout: Duration::from_secs(config.feed.metadata_timeout_secs),
                ipfs_gateway: config.feed.ipfs_gateway.clone(),
                ..Default::default()
            })
            .context("Failed to create metadata resolver")?;
            FeedService::with_metadata(client.clone(), config.filter.clone(), config.feed.capacity, Arc::new(resolver))
        } else {
            FeedService::new(client.clone(), config.filter.clone(), config.feed.capacity)
        };
        service.attach();
        tokio::spawn(print_feed_updates(updates, cmd.json));
        Some(service)
    } else {
        install_printers(&client, cmd.json);
        None
    };

    if cmd.no_new_tokens || !config.stream.subscribe_new_tokens {
        client.unsubscribe_new_tokens();
    } else {
        client.subscribe_new_tokens();
    }
    if config.stream.subscribe_migrations {
        client.subscribe_migrations();
    }
    client.subscribe_token_trades(config.stream.watch_mints.iter().chain(&cmd.mints).cloned());
    client.subscribe_account_trades(config.stream.watch_accounts.iter().chain(&cmd.accounts).cloned());

    tracing::info!("Connecting to {}", client.config().ws_url);
    client.connect();

    tokio::signal::ctrl_c().await.context("Failed to listen for Ctrl+C")?;
    tracing::info!("Shutdown signal received");
    client.disconnect().await;

    if let Some(service) = feed {
        println!("\n{} tokens in feed:", service.len());
        for entry in service.snapshot() {
            println!(
                "  {:<10} {:<44} mcap {:>8.2} SOL  curve {:>5.1}%  buys {:>4}  sells {:>4}{}",
                entry.symbol,
                entry.mint,
                entry.market_cap_sol,
                entry.bonding_curve_progress,
                entry.buys,
                entry.sells,
                if entry.migrated { "  [migrated]" } else { "" }
            );
        }
    }
    Ok(())
}

fn install_printers(client: &PumpPortalClient, json: bool) {
    client.on_token_create(move |token| {
        if json {
            print_json(token);
        } else {
            println!(
                "NEW    {} ({}) {}  mcap {:.2} SOL  curve {:.1}%",
                token.name,
                token.symbol,
                token.mint,
                token.market_cap_sol,
                token.bonding_curve_progress()
            );
        }
    });
    client.on_trade(move |trade| {
        if json {
            print_json(trade);
        } else {
            println!(
                "{:<6} {}  {:.4} SOL  by {}  mcap {:.2} SOL",
                trade.direction, trade.mint, trade.sol_amount, trade.trader_public_key, trade.market_cap_sol
            );
        }
    });
    client.on_migration(move |migration| {
        if json {
            print_json(migration);
        } else {
            println!("MIGRATED {} -> {}", migration.mint, migration.pool.as_deref().unwrap_or("unknown pool"));
        }
    });
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string(value) {
        Ok(line) => println!("{}", line),
        Err(e) => tracing::warn!("Failed to encode event: {}", e),
    }
}

async fn print_feed_updates(mut updates: tokio::sync::mpsc::UnboundedReceiver<FeedUpdate>, json: bool) {
    while let Some(update) = updates.recv().await {
        match update {
            FeedUpdate::Added(entry) if json => print_json(&entry),
            FeedUpdate::Added(entry) => println!(
                "NEW    {} ({}) {}  mcap {:.2} SOL",
                entry.name, entry.symbol, entry.mint, entry.market_cap_sol
            ),
            FeedUpdate::Traded { mint, direction, sol_amount, market_cap_sol } => {
                println!("{:<6} {}  {:.4} SOL  mcap {:.2} SOL", direction, mint, sol_amount, market_cap_sol)
            }
            FeedUpdate::Migrated(mint) => println!("MIGRATED {}", mint),
            FeedUpdate::Evicted(mint) => tracing::debug!("Evicted {}", mint),
            FeedUpdate::MetadataResolved { mint, metadata } => {
                tracing::info!("Metadata for {}: image={:?} socials={}", mint, metadata.image, metadata.has_socials())
            }
        }
    }
}

fn quote_command(cmd: QuoteCmd) -> Result<()> {
    let (is_buy, args): (bool, QuoteArgs) = match cmd {
        QuoteCmd::Buy(args) => (true, args),
        QuoteCmd::Sell(args) => (false, args),
    };

    let curve = CurveState::new(
        sol_to_lamports(args.virtual_sol)?,
        tokens_to_base_units(args.virtual_tokens)?,
    );
    println!(
        "Reserves: {:.4} SOL / {:.0} tokens  spot {:.10} SOL/token",
        args.virtual_sol,
        args.virtual_tokens,
        curve.spot_price_sol()
    );

    if is_buy {
        let sol_in = sol_to_lamports(args.amount)?;
        let tokens_out = curve.buy_quote(sol_in)?;
        println!("Buy {:.9} SOL -> {} tokens", lamports_to_sol(sol_in), units_to_tokens(tokens_out));
        println!("  min out ({} bps): {} tokens", args.slippage, units_to_tokens(min_output(tokens_out, args.slippage)?));
        println!("  max cost:        {:.9} SOL", lamports_to_sol(max_sol_cost(sol_in, args.slippage)?));
    } else {
        let tokens_in = tokens_to_base_units(args.amount)?;
        let sol_out = curve.sell_quote(tokens_in)?;
        println!("Sell {} tokens -> {:.9} SOL", units_to_tokens(tokens_in), lamports_to_sol(sol_out));
        println!("  min out ({} bps): {:.9} SOL", args.slippage, lamports_to_sol(min_output(sol_out, args.slippage)?));
    }
    Ok(())
}

async fn curve_command(cmd: CurveCmd, config: Config) -> Result<()> {
    let rpc_url = cmd.rpc_url.unwrap_or_else(|| config.solana.get_rpc_url());
    let reader = Arc::new(SolanaCurveReader::new(rpc_url));
    let slippage = cmd.slippage.unwrap_or(config.solana.slippage_bps);
    let service = QuoteService::with_slippage(reader.clone(), slippage);

    if let Some(sol) = cmd.buy {
        let quote = service.quote_buy(&cmd.mint, sol_to_lamports(sol)?).await?;
        println!("Buy {:.9} SOL of {}", lamports_to_sol(quote.sol_in), quote.mint);
        println!("  tokens out:      {}", units_to_tokens(quote.tokens_out));
        println!("  min out ({} bps): {}", slippage, units_to_tokens(quote.min_tokens_out));
        println!("  max cost:        {:.9} SOL", lamports_to_sol(quote.max_sol_cost));
        println!("  price impact:    {:.2}%", quote.price_impact_pct);
    } else if let Some(tokens) = cmd.sell {
        let quote = service.quote_sell(&cmd.mint, tokens_to_base_units(tokens)?).await?;
        println!("Sell {} tokens of {}", units_to_tokens(quote.tokens_in), quote.mint);
        println!("  SOL out:         {:.9}", lamports_to_sol(quote.sol_out));
        println!("  min out ({} bps): {:.9} SOL", slippage, lamports_to_sol(quote.min_sol_out));
        println!("  price impact:    {:.2}%", quote.price_impact_pct);
    } else {
        if !is_valid_mint(&cmd.mint) {
            bail!("'{}' is not a valid mint address", cmd.mint);
        }
        let curve = reader.read_curve(&cmd.mint).await.context("Failed to read bonding curve")?;
        println!("Bonding curve for {}", cmd.mint);
        println!("  virtual SOL:     {:.9}", lamports_to_sol(curve.virtual_sol_reserves));
        println!("  virtual tokens:  {}", units_to_tokens(curve.virtual_token_reserves));
        println!("  real SOL:        {:.9}", lamports_to_sol(curve.real_sol_reserves));
        println!("  real tokens:     {}", units_to_tokens(curve.real_token_reserves));
        println!("  spot price:      {:.10} SOL/token", curve.curve_state().spot_price_sol());
        println!("  market cap:      {:.2} SOL", curve.market_cap_sol());
        println!("  progress:        {:.1}%", curve.graduation_progress());
        println!("  complete:        {}", curve.complete);
    }
    Ok(())
}

fn lamports_to_sol(lamports: u64) -> f64 {
    lamports as f64 / LAMPORTS_PER_SOL as f64
}

fn units_to_tokens(units: u64) -> f64 {
    units as f64 / TOKEN_BASE_UNITS as f64
}
