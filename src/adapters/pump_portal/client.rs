//! PumpPortal Stream Client
//!
//! A single persistent connection to the PumpPortal real-time feed with
//! exponential-backoff reconnection. Subscriptions are remembered and replayed in
//! full on every new connection, so callers declare interest once and never
//! resubscribe after a drop.

use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, Weak};
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use super::transport::WsConnector;
use super::types::{
    parse_frame, ControlMessage, InboundFrame, Migration, StreamEvent, TokenCreate, Trade,
};
use crate::ports::{Connection, Connector, Frame, TransportError};

/// Default WebSocket URL for PumpPortal data
pub const DEFAULT_WS_URL: &str = "wss://pumpportal.fun/api/data";

/// Reconnection delay base (exponential backoff)
pub const RECONNECT_BASE_DELAY_MS: u64 = 1000;
/// Maximum reconnection delay
pub const MAX_RECONNECT_DELAY_MS: u64 = 30000;
/// Ping interval for keepalive
const PING_INTERVAL_SECS: u64 = 30;
/// Reconnect if nothing arrives for this long
const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 60;
/// Maximum message size in bytes
const MAX_MESSAGE_SIZE: usize = 1_048_576; // 1 MB

/// Errors reported through the client's error handler
#[derive(Debug, Clone, Error)]
pub enum StreamError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Server error: {0}")]
    Server(String),

    #[error("No message received for {0} seconds")]
    IdleTimeout(u64),

    #[error("Gave up reconnecting after {0} attempts")]
    ReconnectExhausted(u32),
}

/// Backoff schedule for reconnects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
    /// Maximum consecutive attempts (0 = unlimited)
    pub max_attempts: u32,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            base_delay_ms: RECONNECT_BASE_DELAY_MS,
            max_delay_ms: MAX_RECONNECT_DELAY_MS,
            max_attempts: 0,
        }
    }
}

impl ReconnectPolicy {
    /// Delay before reconnect attempt `attempt` (1-based):
    /// `min(base * 2^(attempt - 1), max)`
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(63);
        let delay = self
            .base_delay_ms
            .checked_mul(1u64 << exponent)
            .unwrap_or(u64::MAX)
            .min(self.max_delay_ms);
        Duration::from_millis(delay)
    }

    /// Whether attempt number `attempt` may run
    pub fn allows(&self, attempt: u32) -> bool {
        self.max_attempts == 0 || attempt <= self.max_attempts
    }
}

/// Configuration for PumpPortalClient
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// WebSocket URL
    pub ws_url: String,
    pub reconnect: ReconnectPolicy,
    /// Send periodic pings
    pub enable_keepalive: bool,
    pub ping_interval_secs: u64,
    /// Reconnect after this long without a frame (0 = never)
    pub idle_timeout_secs: u64,
    /// Larger inbound frames are dropped
    pub max_message_size: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            ws_url: DEFAULT_WS_URL.to_string(),
            reconnect: ReconnectPolicy::default(),
            enable_keepalive: true,
            ping_interval_secs: PING_INTERVAL_SECS,
            idle_timeout_secs: DEFAULT_IDLE_TIMEOUT_SECS,
            max_message_size: MAX_MESSAGE_SIZE,
        }
    }
}

/// Declared interest, replayed on every connect
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionState {
    pub wants_all_new_tokens: bool,
    pub wants_migrations: bool,
    pub watched_mints: HashSet<String>,
    pub watched_accounts: HashSet<String>,
}

impl SubscriptionState {
    /// Control frames that re-establish this state on a fresh connection
    pub fn replay_frames(&self) -> Vec<ControlMessage> {
        let mut frames = Vec::new();
        if self.wants_all_new_tokens {
            frames.push(ControlMessage::new_token());
        }
        if self.wants_migrations {
            frames.push(ControlMessage::migrations());
        }
        if !self.watched_mints.is_empty() {
            frames.push(ControlMessage::token_trades(sorted(&self.watched_mints)));
        }
        if !self.watched_accounts.is_empty() {
            frames.push(ControlMessage::account_trades(sorted(&self.watched_accounts)));
        }
        frames
    }

    pub fn is_empty(&self) -> bool {
        !self.wants_all_new_tokens
            && !self.wants_migrations
            && self.watched_mints.is_empty()
            && self.watched_accounts.is_empty()
    }
}

fn sorted(keys: &HashSet<String>) -> Vec<String> {
    let mut keys: Vec<String> = keys.iter().cloned().collect();
    keys.sort();
    keys
}

type Handler<T> = Arc<dyn Fn(&T) + Send + Sync>;
type Notify = Arc<dyn Fn() + Send + Sync>;

/// One slot per category; registering again replaces the previous handler
#[derive(Default)]
struct EventHandlers {
    on_token_create: Option<Handler<TokenCreate>>,
    on_trade: Option<Handler<Trade>>,
    on_migration: Option<Handler<Migration>>,
    on_error: Option<Handler<StreamError>>,
    on_connect: Option<Notify>,
    on_disconnect: Option<Notify>,
}

/// Subscriptions plus the outbound queue of the live connection, guarded together
/// so a replay can never interleave with a concurrent subscribe
#[derive(Default)]
struct LinkState {
    subscriptions: SubscriptionState,
    outbound: Option<mpsc::UnboundedSender<ControlMessage>>,
}

impl LinkState {
    fn send(&self, message: ControlMessage) {
        if let Some(tx) = &self.outbound {
            debug!("Queueing control frame: {:?}", message.method);
            // A closed queue means the connection just dropped; the replay covers it
            let _ = tx.send(message);
        }
    }
}

struct Inner<C> {
    config: StreamConfig,
    connector: C,
    link: Mutex<LinkState>,
    handlers: RwLock<EventHandlers>,
    manual_close: AtomicBool,
    connected: AtomicBool,
    reconnect_attempts: AtomicU32,
    shutdown_tx: watch::Sender<bool>,
    task: Mutex<Option<JoinHandle<()>>>,
}

/// How a connected session ended
enum SessionEnd {
    Shutdown,
    Dropped,
}

/// Reconnecting PumpPortal stream client.
///
/// Cloning yields another handle to the same connection.
///
/// # Example
/// ```ignore
/// let client = PumpPortalClient::with_defaults();
/// client.on_token_create(|token| println!("{} ({})", token.name, token.mint));
/// client.subscribe_new_tokens();
/// client.connect();
/// // ...
/// client.disconnect().await;
/// ```
pub struct PumpPortalClient<C: Connector = WsConnector> {
    inner: Arc<Inner<C>>,
}

impl<C: Connector> Clone for PumpPortalClient<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Non-owning handle, for handlers that need to call back into the client
pub struct WeakPumpPortalClient<C: Connector = WsConnector> {
    inner: Weak<Inner<C>>,
}

impl<C: Connector> Clone for WeakPumpPortalClient<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<C: Connector> WeakPumpPortalClient<C> {
    pub fn upgrade(&self) -> Option<PumpPortalClient<C>> {
        self.inner.upgrade().map(|inner| PumpPortalClient { inner })
    }
}

impl PumpPortalClient<WsConnector> {
    /// Client over the default WebSocket transport
    pub fn with_config(config: StreamConfig) -> Self {
        Self::new(config, WsConnector::default())
    }

    pub fn with_defaults() -> Self {
        Self::with_config(StreamConfig::default())
    }
}

impl<C: Connector> PumpPortalClient<C> {
    pub fn new(config: StreamConfig, connector: C) -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            inner: Arc::new(Inner {
                config,
                connector,
                link: Mutex::new(LinkState::default()),
                handlers: RwLock::new(EventHandlers::default()),
                manual_close: AtomicBool::new(false),
                connected: AtomicBool::new(false),
                reconnect_attempts: AtomicU32::new(0),
                shutdown_tx,
                task: Mutex::new(None),
            }),
        }
    }

    pub fn config(&self) -> &StreamConfig {
        &self.inner.config
    }

    pub fn downgrade(&self) -> WeakPumpPortalClient<C> {
        WeakPumpPortalClient {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Start the connection task. No-op if it is already running or after
    /// `disconnect()`. Must be called within a tokio runtime.
    pub fn connect(&self) {
        if self.inner.manual_close.load(Ordering::SeqCst) {
            debug!("connect() ignored, client was disconnected");
            return;
        }

        let mut task = lock(&self.inner.task);
        if task.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return;
        }

        let inner = Arc::clone(&self.inner);
        let shutdown_rx = self.inner.shutdown_tx.subscribe();
        *task = Some(tokio::spawn(async move { inner.run(shutdown_rx).await }));
    }

    /// Close the connection for good: cancels any pending reconnect and waits for
    /// the connection task to finish. The client cannot be reconnected afterwards.
    pub async fn disconnect(&self) {
        self.inner.manual_close.store(true, Ordering::SeqCst);
        self.inner.shutdown_tx.send_replace(true);

        let handle = lock(&self.inner.task).take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                warn!("Stream task ended abnormally: {}", e);
            }
        }

        lock(&self.inner.link).outbound = None;
        self.inner.connected.store(false, Ordering::SeqCst);
        info!("PumpPortal client disconnected");
    }

    pub fn is_connected(&self) -> bool {
        self.inner.connected.load(Ordering::SeqCst)
    }

    /// Consecutive failed reconnects since the last successful connect
    pub fn reconnect_attempts(&self) -> u32 {
        self.inner.reconnect_attempts.load(Ordering::SeqCst)
    }

    /// Snapshot of the declared subscriptions
    pub fn subscriptions(&self) -> SubscriptionState {
        lock(&self.inner.link).subscriptions.clone()
    }

    pub fn subscribe_new_tokens(&self) {
        let mut link = lock(&self.inner.link);
        if !link.subscriptions.wants_all_new_tokens {
            link.subscriptions.wants_all_new_tokens = true;
            link.send(ControlMessage::new_token());
        }
    }

    pub fn unsubscribe_new_tokens(&self) {
        let mut link = lock(&self.inner.link);
        if link.subscriptions.wants_all_new_tokens {
            link.subscriptions.wants_all_new_tokens = false;
            link.send(ControlMessage::unsubscribe_new_token());
        }
    }

    pub fn subscribe_migrations(&self) {
        let mut link = lock(&self.inner.link);
        if !link.subscriptions.wants_migrations {
            link.subscriptions.wants_migrations = true;
            link.send(ControlMessage::migrations());
        }
    }

    /// Stop replaying the migration subscription. The feed has no unsubscribe
    /// method for migrations, so the current connection keeps receiving them.
    pub fn unsubscribe_migrations(&self) {
        lock(&self.inner.link).subscriptions.wants_migrations = false;
    }

    /// Watch trades on `mints`. Only mints not already watched are sent.
    pub fn subscribe_token_trades<I, S>(&self, mints: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut link = lock(&self.inner.link);
        let added = insert_new(&mut link.subscriptions.watched_mints, mints);
        if !added.is_empty() {
            debug!("Watching {} new mints", added.len());
            link.send(ControlMessage::token_trades(added));
        }
    }

    pub fn unsubscribe_token_trades<I, S>(&self, mints: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut link = lock(&self.inner.link);
        let removed = remove_existing(&mut link.subscriptions.watched_mints, mints);
        if !removed.is_empty() {
            link.send(ControlMessage::unsubscribe_token_trades(removed));
        }
    }

    /// Watch trades made by `accounts`
    pub fn subscribe_account_trades<I, S>(&self, accounts: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut link = lock(&self.inner.link);
        let added = insert_new(&mut link.subscriptions.watched_accounts, accounts);
        if !added.is_empty() {
            link.send(ControlMessage::account_trades(added));
        }
    }

    pub fn unsubscribe_account_trades<I, S>(&self, accounts: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut link = lock(&self.inner.link);
        let removed = remove_existing(&mut link.subscriptions.watched_accounts, accounts);
        if !removed.is_empty() {
            link.send(ControlMessage::unsubscribe_account_trades(removed));
        }
    }

    pub fn on_token_create<F>(&self, handler: F)
    where
        F: Fn(&TokenCreate) + Send + Sync + 'static,
    {
        write(&self.inner.handlers).on_token_create = Some(Arc::new(handler));
    }

    pub fn on_trade<F>(&self, handler: F)
    where
        F: Fn(&Trade) + Send + Sync + 'static,
    {
        write(&self.inner.handlers).on_trade = Some(Arc::new(handler));
    }

    pub fn on_migration<F>(&self, handler: F)
    where
        F: Fn(&Migration) + Send + Sync + 'static,
    {
        write(&self.inner.handlers).on_migration = Some(Arc::new(handler));
    }

    pub fn on_error<F>(&self, handler: F)
    where
        F: Fn(&StreamError) + Send + Sync + 'static,
    {
        write(&self.inner.handlers).on_error = Some(Arc::new(handler));
    }

    pub fn on_connect<F>(&self, handler: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        write(&self.inner.handlers).on_connect = Some(Arc::new(handler));
    }

    pub fn on_disconnect<F>(&self, handler: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        write(&self.inner.handlers).on_disconnect = Some(Arc::new(handler));
    }

    /// Feed one raw inbound frame through parsing and dispatch, as the connection
    /// task does for every text frame
    pub(crate) fn handle_text(&self, raw: &str) {
        self.inner.handle_text(raw);
    }
}

impl<C: Connector> Inner<C> {
    /// Connection loop with reconnection logic
    async fn run(&self, mut shutdown_rx: watch::Receiver<bool>) {
        let policy = self.config.reconnect;
        let mut attempt = 0u32;

        info!("PumpPortal client starting, connecting to {}", self.config.ws_url);

        loop {
            if *shutdown_rx.borrow() {
                break;
            }

            let connected = tokio::select! {
                result = self.connector.connect(&self.config.ws_url) => result,
                _ = shutdown_rx.changed() => break,
            };

            match connected {
                Ok(connection) => {
                    attempt = 0;
                    self.reconnect_attempts.store(0, Ordering::SeqCst);
                    if let SessionEnd::Shutdown = self.session(connection, &mut shutdown_rx).await {
                        break;
                    }
                }
                Err(e) => {
                    error!("WebSocket connect failed: {}", e);
                    self.emit_error(StreamError::Transport(e));
                }
            }

            if self.manual_close.load(Ordering::SeqCst) {
                break;
            }

            attempt += 1;
            if !policy.allows(attempt) {
                error!("Max reconnect attempts ({}) exceeded", policy.max_attempts);
                self.emit_error(StreamError::ReconnectExhausted(policy.max_attempts));
                break;
            }
            self.reconnect_attempts.store(attempt, Ordering::SeqCst);

            let delay = policy.delay_for_attempt(attempt);
            warn!("Reconnecting in {}ms (attempt {})", delay.as_millis(), attempt);

            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = shutdown_rx.changed() => break,
            }
        }

        self.connected.store(false, Ordering::SeqCst);
        info!("PumpPortal client stopped");
    }

    /// Drive one open connection until it drops or shutdown is requested
    async fn session(
        &self,
        connection: Connection,
        shutdown_rx: &mut watch::Receiver<bool>,
    ) -> SessionEnd {
        let Connection { mut sink, mut source } = connection;
        let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel();

        {
            let mut link = lock(&self.link);
            for frame in link.subscriptions.replay_frames() {
                let _ = outbound_tx.send(frame);
            }
            link.outbound = Some(outbound_tx);
        }
        self.connected.store(true, Ordering::SeqCst);
        info!("Connected to PumpPortal WebSocket");
        self.emit_connect();

        let mut failure: Option<StreamError> = None;

        // Replay goes out before the first inbound frame is read
        while let Ok(message) = outbound_rx.try_recv() {
            if let Err(e) = sink.send_text(message.to_json()).await {
                failure = Some(e.into());
                break;
            }
        }

        let ping_period = Duration::from_secs(self.config.ping_interval_secs.max(1));
        let mut ping = tokio::time::interval_at(Instant::now() + ping_period, ping_period);
        let idle_enabled = self.config.idle_timeout_secs > 0;
        let idle_timeout = Duration::from_secs(self.config.idle_timeout_secs.max(1));
        let mut last_frame = Instant::now();

        let end = if failure.is_some() {
            SessionEnd::Dropped
        } else {
            loop {
                tokio::select! {
                    biased;

                    _ = shutdown_rx.changed() => {
                        info!("Shutdown requested, closing connection");
                        break SessionEnd::Shutdown;
                    }
                    Some(message) = outbound_rx.recv() => {
                        if let Err(e) = sink.send_text(message.to_json()).await {
                            failure = Some(e.into());
                            break SessionEnd::Dropped;
                        }
                    }
                    frame = source.next_frame() => {
                        last_frame = Instant::now();
                        match frame {
                            Some(Ok(Frame::Text(text))) => self.handle_text(&text),
                            Some(Ok(Frame::Binary(bytes))) => match String::from_utf8(bytes) {
                                Ok(text) => self.handle_text(&text),
                                Err(_) => debug!("Dropping non-UTF-8 binary frame"),
                            },
                            Some(Ok(Frame::Control)) => {}
                            Some(Ok(Frame::Close(reason))) => {
                                info!("Server closed connection: {}", reason.unwrap_or_default());
                                break SessionEnd::Dropped;
                            }
                            Some(Err(e)) => {
                                failure = Some(e.into());
                                break SessionEnd::Dropped;
                            }
                            None => {
                                info!("Connection closed");
                                break SessionEnd::Dropped;
                            }
                        }
                    }
                    _ = ping.tick(), if self.config.enable_keepalive => {
                        debug!("Keepalive ping");
                        if let Err(e) = sink.send_ping().await {
                            failure = Some(e.into());
                            break SessionEnd::Dropped;
                        }
                    }
                    _ = tokio::time::sleep_until(last_frame + idle_timeout), if idle_enabled => {
                        failure = Some(StreamError::IdleTimeout(self.config.idle_timeout_secs));
                        break SessionEnd::Dropped;
                    }
                }
            }
        };

        if let Some(e) = failure {
            error!("WebSocket error: {}", e);
            self.emit_error(e);
        }

        lock(&self.link).outbound = None;
        self.connected.store(false, Ordering::SeqCst);
        sink.close().await;
        info!("Disconnected from PumpPortal WebSocket");
        self.emit_disconnect();

        end
    }

    /// Parse and dispatch one inbound frame. Bad frames are dropped.
    fn handle_text(&self, raw: &str) {
        match parse_frame(raw, self.config.max_message_size) {
            Ok(InboundFrame::Event(event)) => self.dispatch(event),
            Ok(InboundFrame::Notice(message)) => debug!("Server notice: {}", message),
            Ok(InboundFrame::ServerError(message)) => {
                warn!("Server error: {}", message);
                self.emit_error(StreamError::Server(message));
            }
            Ok(InboundFrame::Ignored) => {}
            Err(rejection) => {
                let preview: String = raw.chars().take(200).collect();
                debug!("Dropping inbound frame ({}): {}", rejection, preview);
            }
        }
    }

    fn dispatch(&self, event: StreamEvent) {
        match event {
            StreamEvent::TokenCreate(token) => {
                let handler = read(&self.handlers).on_token_create.clone();
                debug!("New token: {} ({}) - {}", token.name, token.symbol, token.mint);
                if let Some(handler) = handler {
                    guarded("token create", || handler(&token));
                }
            }
            StreamEvent::Trade(trade) => {
                let handler = read(&self.handlers).on_trade.clone();
                debug!("Trade: {} {} {} SOL", trade.direction, trade.mint, trade.sol_amount);
                if let Some(handler) = handler {
                    guarded("trade", || handler(&trade));
                }
            }
            StreamEvent::Migration(migration) => {
                let handler = read(&self.handlers).on_migration.clone();
                debug!("Migration: {}", migration.mint);
                if let Some(handler) = handler {
                    guarded("migration", || handler(&migration));
                }
            }
        }
    }

    fn emit_error(&self, err: StreamError) {
        let handler = read(&self.handlers).on_error.clone();
        if let Some(handler) = handler {
            guarded("error", || handler(&err));
        }
    }

    fn emit_connect(&self) {
        let handler = read(&self.handlers).on_connect.clone();
        if let Some(handler) = handler {
            guarded("connect", || handler());
        }
    }

    fn emit_disconnect(&self) {
        let handler = read(&self.handlers).on_disconnect.clone();
        if let Some(handler) = handler {
            guarded("disconnect", || handler());
        }
    }
}

/// Run a user handler on the connection task. A panicking handler is logged and
/// the connection stays up.
fn guarded<F: FnOnce()>(kind: &str, f: F) {
    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(f)) {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        error!("{} handler panicked: {}", kind, message);
    }
}

fn insert_new<I, S>(set: &mut HashSet<String>, keys: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    keys.into_iter()
        .map(Into::into)
        .filter(|key| set.insert(key.clone()))
        .collect()
}

fn remove_existing<I, S>(set: &mut HashSet<String>, keys: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    keys.into_iter()
        .map(Into::into)
        .filter(|key| set.remove(key))
        .collect()
}

// Handlers never panic while a lock is held, but don't let poisoning wedge the client
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn read<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

/// Builder for StreamConfig
#[derive(Debug, Default)]
pub struct StreamConfigBuilder {
    config: StreamConfig,
}

impl StreamConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ws_url(mut self, url: impl Into<String>) -> Self {
        self.config.ws_url = url.into();
        self
    }

    pub fn base_delay_ms(mut self, ms: u64) -> Self {
        self.config.reconnect.base_delay_ms = ms;
        self
    }

    pub fn max_delay_ms(mut self, ms: u64) -> Self {
        self.config.reconnect.max_delay_ms = ms;
        self
    }

    /// Maximum reconnection attempts (0 = unlimited)
    pub fn max_reconnect_attempts(mut self, attempts: u32) -> Self {
        self.config.reconnect.max_attempts = attempts;
        self
    }

    pub fn enable_keepalive(mut self, enabled: bool) -> Self {
        self.config.enable_keepalive = enabled;
        self
    }

    pub fn ping_interval_secs(mut self, secs: u64) -> Self {
        self.config.ping_interval_secs = secs;
        self
    }

    /// Idle timeout in seconds (0 = disabled)
    pub fn idle_timeout_secs(mut self, secs: u64) -> Self {
        self.config.idle_timeout_secs = secs;
        self
    }

    pub fn max_message_size(mut self, size: usize) -> Self {
        self.config.max_message_size = size;
        self
    }

    pub fn build(self) -> StreamConfig {
        self.config
    }
}
