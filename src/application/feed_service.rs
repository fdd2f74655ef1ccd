//! Feed Service
//!
//! Wires the stream client to the token feed: accepted launches are cached and
//! their trades subscribed, evicted launches are unsubscribed, and trades and
//! migrations keep cached entries current. Changes are published on a channel.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::adapters::pump_portal::{
    Migration, PumpPortalClient, TokenCreate, Trade, TradeDirection, WeakPumpPortalClient,
};
use crate::domain::{FeedEntry, Launchpad, TokenFeed, TokenFilter, TradeUpdate};
use crate::ports::{Connector, MetadataResolver, TokenMetadata};

/// Change to the feed
#[derive(Debug, Clone, PartialEq)]
pub enum FeedUpdate {
    Added(FeedEntry),
    Traded {
        mint: String,
        direction: TradeDirection,
        sol_amount: f64,
        market_cap_sol: f64,
    },
    Migrated(String),
    Evicted(String),
    MetadataResolved { mint: String, metadata: TokenMetadata },
}

impl From<&TokenCreate> for FeedEntry {
    fn from(token: &TokenCreate) -> Self {
        FeedEntry {
            mint: token.mint.clone(),
            name: token.name.clone(),
            symbol: token.symbol.clone(),
            creator: token.trader_public_key.clone(),
            metadata_uri: token.metadata_uri.clone(),
            image: None,
            twitter: None,
            telegram: None,
            website: None,
            launchpad: Launchpad::from_pool(token.pool.as_deref()),
            initial_buy: token.initial_buy,
            market_cap_sol: token.market_cap_sol,
            virtual_sol_reserves: token.virtual_sol_reserves,
            virtual_token_reserves: token.virtual_token_reserves,
            bonding_curve_progress: token.bonding_curve_progress(),
            buys: 0,
            sells: 0,
            volume_sol: 0.0,
            migrated: false,
            created_at: Utc::now(),
            last_trade_at: None,
        }
    }
}

impl From<&Trade> for TradeUpdate {
    fn from(trade: &Trade) -> Self {
        TradeUpdate {
            is_buy: trade.direction.is_buy(),
            sol_amount: trade.sol_amount,
            market_cap_sol: trade.market_cap_sol,
            virtual_sol_reserves: trade.virtual_sol_reserves,
            virtual_token_reserves: trade.virtual_token_reserves,
            bonding_curve_progress: trade.bonding_curve_progress(),
            at: Utc::now(),
        }
    }
}

/// Shared state behind the client handlers
struct FeedState<C: Connector> {
    client: WeakPumpPortalClient<C>,
    feed: Mutex<TokenFeed>,
    filter: TokenFilter,
    resolver: Option<Arc<dyn MetadataResolver>>,
    updates: mpsc::UnboundedSender<FeedUpdate>,
}

pub struct FeedService<C: Connector> {
    client: PumpPortalClient<C>,
    state: Arc<FeedState<C>>,
}

impl<C: Connector> FeedService<C> {
    /// Create the service and the receiving end of its update channel
    pub fn new(
        client: PumpPortalClient<C>,
        filter: TokenFilter,
        capacity: usize,
    ) -> (Self, mpsc::UnboundedReceiver<FeedUpdate>) {
        Self::build(client, filter, capacity, None)
    }

    /// Like `new`, also resolving each accepted token's metadata in the background
    pub fn with_metadata(
        client: PumpPortalClient<C>,
        filter: TokenFilter,
        capacity: usize,
        resolver: Arc<dyn MetadataResolver>,
    ) -> (Self, mpsc::UnboundedReceiver<FeedUpdate>) {
        Self::build(client, filter, capacity, Some(resolver))
    }

    fn build(
        client: PumpPortalClient<C>,
        filter: TokenFilter,
        capacity: usize,
        resolver: Option<Arc<dyn MetadataResolver>>,
    ) -> (Self, mpsc::UnboundedReceiver<FeedUpdate>) {
        let (updates, rx) = mpsc::unbounded_channel();
        let state = Arc::new(FeedState {
            client: client.downgrade(),
            feed: Mutex::new(TokenFeed::new(capacity)),
            filter,
            resolver,
            updates,
        });
        (Self { client, state }, rx)
    }

    /// Install the stream handlers and subscribe to launches and migrations.
    /// Replaces any create/trade/migration handlers already registered.
    pub fn attach(&self) {
        let state = Arc::clone(&self.state);
        self.client.on_token_create(move |token| state.on_create(token));

        let state = Arc::clone(&self.state);
        self.client.on_trade(move |trade| state.on_trade(trade));

        let state = Arc::clone(&self.state);
        self.client.on_migration(move |migration| state.on_migration(migration));

        self.client.subscribe_new_tokens();
        self.client.subscribe_migrations();
        info!("Token feed attached (capacity {})", self.state.feed().capacity());
    }

    pub fn client(&self) -> &PumpPortalClient<C> {
        &self.client
    }

    /// Cached tokens, newest first
    pub fn snapshot(&self) -> Vec<FeedEntry> {
        self.state.feed().entries().cloned().collect()
    }

    pub fn get(&self, mint: &str) -> Option<FeedEntry> {
        self.state.feed().get(mint).cloned()
    }

    pub fn len(&self) -> usize {
        self.state.feed().len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.feed().is_empty()
    }
}

impl<C: Connector> FeedState<C> {
    fn feed(&self) -> MutexGuard<'_, TokenFeed> {
        self.feed.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, update: FeedUpdate) {
        // Nobody listening is fine
        let _ = self.updates.send(update);
    }

    fn on_create(self: &Arc<Self>, token: &TokenCreate) {
        let entry = FeedEntry::from(token);
        if !self.filter.matches(&entry) {
            debug!("Filtered out {} ({})", entry.symbol, entry.mint);
            return;
        }

        let outcome = self.feed().on_create(entry.clone());
        if !outcome.inserted {
            return;
        }

        if let Some(client) = self.client.upgrade() {
            client.subscribe_token_trades([entry.mint.clone()]);
            if !outcome.evicted.is_empty() {
                client.unsubscribe_token_trades(outcome.evicted.iter().cloned());
            }
        }

        let pending = self
            .resolver
            .as_ref()
            .zip(entry.metadata_uri.clone())
            .map(|(resolver, uri)| (Arc::clone(resolver), entry.mint.clone(), uri));

        // Consumers see Added before any MetadataResolved for the same mint
        self.publish(FeedUpdate::Added(entry));
        for mint in outcome.evicted {
            self.publish(FeedUpdate::Evicted(mint));
        }

        if let Some((resolver, mint, uri)) = pending {
            self.resolve_metadata(resolver, mint, uri);
        }
    }

    fn on_trade(&self, trade: &Trade) {
        if !self.feed().on_trade(&trade.mint, &TradeUpdate::from(trade)) {
            return;
        }
        self.publish(FeedUpdate::Traded {
            mint: trade.mint.clone(),
            direction: trade.direction,
            sol_amount: trade.sol_amount,
            market_cap_sol: trade.market_cap_sol,
        });
    }

    fn on_migration(&self, migration: &Migration) {
        if self.feed().on_migration(&migration.mint) {
            info!("Token migrated: {}", migration.mint);
            self.publish(FeedUpdate::Migrated(migration.mint.clone()));
        }
    }

    fn resolve_metadata(self: &Arc<Self>, resolver: Arc<dyn MetadataResolver>, mint: String, uri: String) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            debug!("No runtime, skipping metadata for {}", mint);
            return;
        };
        let feed_state = Arc::downgrade(self);

        runtime.spawn(async move {
            let metadata = match resolver.resolve(&uri).await {
                Ok(metadata) => metadata,
                Err(e) => {
                    debug!("Metadata for {} unavailable: {}", mint, e);
                    return;
                }
            };
            let Some(state) = feed_state.upgrade() else {
                return;
            };

            let attached = state.feed().update(&mint, |entry| {
                entry.image = metadata.image.clone().or(entry.image.take());
                entry.twitter = metadata.twitter.clone().or(entry.twitter.take());
                entry.telegram = metadata.telegram.clone().or(entry.telegram.take());
                entry.website = metadata.website.clone().or(entry.website.take());
            });
            if attached {
                state.publish(FeedUpdate::MetadataResolved { mint, metadata });
            }
        });
    }
}
