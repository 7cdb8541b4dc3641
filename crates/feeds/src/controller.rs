//! Live feed connection lifecycle.
//!
//! The controller owns one connection to the external price feed. It
//! reconnects with capped exponential backoff and, once the retry budget
//! is spent, degrades permanently to the synthetic generator. The UI layer
//! never sees a failure beyond at most two warning notifications.

use crate::backoff::{RetryDecision, RetrySchedule};
use crate::book::PriceBook;
use crate::error::FeedError;
use crate::parser;
use crate::simulator::Simulator;
use futures_util::{SinkExt, StreamExt};
use pulseboard_alerts::{compose, AlertSink};
use pulseboard_core::WatchedAsset;
use rand::Rng;
use std::time::Duration;
use tokio::sync::watch;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};

/// Connection warnings are emitted only for the first two consecutive
/// failures, to avoid flooding the feed.
const WARNING_LIMIT: u32 = 2;

/// Connection lifecycle state, published for observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Failing,
}

impl ConnectionState {
    pub fn as_str(self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::Failing => "failing",
        }
    }
}

/// Configuration for one controller instance.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Live feed endpoint.
    pub url: String,
    /// Assets the feed subscribes to and the simulator fabricates.
    pub watch_list: Vec<WatchedAsset>,
    /// Consecutive failures before giving up on the live feed.
    pub max_attempts: u32,
    /// Base backoff delay.
    pub backoff_base: Duration,
    /// Backoff delay cap.
    pub backoff_cap: Duration,
    /// Synthetic generator tick period.
    pub simulator_period: Duration,
    /// Chance of a price alert per applied live update.
    pub live_alert_probability: f64,
    /// Chance of a price alert per simulator tick.
    pub simulator_alert_probability: f64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: "wss://ws.coincap.io/prices?assets=bitcoin,ethereum,solana".to_string(),
            watch_list: WatchedAsset::default_watch_list(),
            max_attempts: RetrySchedule::DEFAULT_MAX_ATTEMPTS,
            backoff_base: RetrySchedule::DEFAULT_BASE,
            backoff_cap: RetrySchedule::DEFAULT_CAP,
            simulator_period: Simulator::DEFAULT_PERIOD,
            live_alert_probability: 0.1,
            simulator_alert_probability: Simulator::DEFAULT_ALERT_PROBABILITY,
        }
    }
}

/// Owns the live-feed connection for one session.
pub struct FeedController {
    config: FeedConfig,
    book: PriceBook,
    sink: AlertSink,
    schedule: RetrySchedule,
    state_tx: watch::Sender<ConnectionState>,
    shutdown: watch::Receiver<bool>,
}

impl FeedController {
    /// Create a controller. Returns the controller plus a receiver that
    /// tracks its connection state.
    pub fn new(
        config: FeedConfig,
        book: PriceBook,
        sink: AlertSink,
        shutdown: watch::Receiver<bool>,
    ) -> (Self, watch::Receiver<ConnectionState>) {
        let (state_tx, state_rx) = watch::channel(ConnectionState::Disconnected);
        let schedule = RetrySchedule::new(config.max_attempts, config.backoff_base, config.backoff_cap);
        (
            Self {
                config,
                book,
                sink,
                schedule,
                state_tx,
                shutdown,
            },
            state_rx,
        )
    }

    /// Run until shutdown. Never returns an error: every failure path ends
    /// in a retry or in simulated mode.
    pub async fn run(mut self) {
        loop {
            if self.shutdown_requested() {
                break;
            }
            self.set_state(ConnectionState::Connecting);

            match self.connect_and_stream().await {
                // Ok means the shutdown signal ended the session.
                Ok(()) => break,
                Err(err) => {
                    if self.shutdown_requested() {
                        break;
                    }
                    self.set_state(ConnectionState::Failing);

                    match self.schedule.record_failure() {
                        RetryDecision::RetryAfter(delay) => {
                            warn!(
                                error = %err,
                                attempt = self.schedule.attempts(),
                                delay_ms = delay.as_millis() as u64,
                                "live feed lost, reconnecting"
                            );
                            if self.schedule.attempts() <= WARNING_LIMIT {
                                self.sink.push(compose::connection_issue());
                            }
                            if self.wait(delay).await {
                                break;
                            }
                        }
                        RetryDecision::GiveUp => {
                            info!("retry budget exhausted, switching to simulated prices");
                            self.set_state(ConnectionState::Disconnected);
                            let sim = Simulator::new(
                                self.config.watch_list.clone(),
                                self.config.simulator_period,
                                self.config.simulator_alert_probability,
                            );
                            sim.run(
                                self.book.clone(),
                                self.sink.clone(),
                                self.shutdown.clone(),
                            )
                            .await;
                            break;
                        }
                    }
                }
            }
        }

        self.set_state(ConnectionState::Disconnected);
        info!("feed controller stopped");
    }

    /// Handle one raw transport message.
    ///
    /// Unparseable payloads are dropped without a state transition; within
    /// a parseable payload, each applied entry has a small chance of also
    /// emitting a synthetic price alert.
    pub fn on_message(&self, raw: &str) {
        match parser::parse_price_map(raw) {
            Ok(updates) => {
                let mut rng = rand::thread_rng();
                for update in updates {
                    if self.book.set_price(&update.asset_id, update.price)
                        && rng.gen_bool(self.config.live_alert_probability)
                    {
                        self.sink
                            .push(compose::live_price_alert(&mut rng, &update.asset_id));
                    }
                }
            }
            Err(err) => debug!(error = %err, "dropping malformed feed message"),
        }
    }

    async fn connect_and_stream(&mut self) -> Result<(), FeedError> {
        debug!(url = %self.config.url, "connecting to live feed");

        let mut shutdown = self.shutdown.clone();
        let ws_stream = tokio::select! {
            res = connect_async(&self.config.url) => res?.0,
            _ = shutdown.changed() => return Ok(()),
        };

        self.schedule.reset();
        self.set_state(ConnectionState::Connected);
        self.sink.push(compose::live_feed_active());
        info!("live feed connected");

        let (mut write, mut read) = ws_stream.split();

        loop {
            tokio::select! {
                msg = read.next() => match msg {
                    Some(Ok(Message::Text(text))) => self.on_message(&text),
                    Some(Ok(Message::Ping(data))) => {
                        write.send(Message::Pong(data)).await?;
                    }
                    Some(Ok(Message::Close(frame))) => {
                        return Err(FeedError::Transport(format!("connection closed: {frame:?}")));
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                    None => return Err(FeedError::Transport("stream ended".into())),
                },
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Sleep through a backoff delay. Returns true if shutdown fired.
    async fn wait(&mut self, delay: Duration) -> bool {
        let sleep = tokio::time::sleep(delay);
        tokio::pin!(sleep);
        loop {
            tokio::select! {
                _ = &mut sleep => return false,
                changed = self.shutdown.changed() => {
                    if changed.is_err() || *self.shutdown.borrow() {
                        return true;
                    }
                }
            }
        }
    }

    fn shutdown_requested(&self) -> bool {
        *self.shutdown.borrow()
    }

    fn set_state(&self, state: ConnectionState) {
        let _ = self.state_tx.send(state);
    }
}

/// Spawn a controller as a background task.
pub fn spawn_controller(
    config: FeedConfig,
    book: PriceBook,
    sink: AlertSink,
    shutdown: watch::Receiver<bool>,
) -> (
    tokio::task::JoinHandle<()>,
    watch::Receiver<ConnectionState>,
) {
    let (controller, state_rx) = FeedController::new(config, book, sink, shutdown);
    let handle = tokio::spawn(controller.run());
    (handle, state_rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use pulseboard_core::{CryptoAsset, NotificationKind};

    fn seeded_book() -> PriceBook {
        let book = PriceBook::new();
        book.initialize(CryptoAsset::seed_list());
        book
    }

    fn fast_config() -> FeedConfig {
        FeedConfig {
            // Nothing listens here; connections are refused immediately.
            url: "ws://127.0.0.1:9".to_string(),
            backoff_base: Duration::from_millis(1),
            backoff_cap: Duration::from_millis(4),
            simulator_period: Duration::from_millis(10),
            simulator_alert_probability: 0.0,
            ..FeedConfig::default()
        }
    }

    #[test]
    fn test_connection_state_labels() {
        assert_eq!(ConnectionState::Connected.as_str(), "connected");
        assert_eq!(ConnectionState::Failing.as_str(), "failing");
    }

    #[tokio::test]
    async fn test_malformed_message_leaves_state_unchanged() {
        let book = seeded_book();
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        let (controller, state_rx) =
            FeedController::new(FeedConfig::default(), book.clone(), AlertSink::new(), shutdown_rx);

        let before = book.snapshot();
        controller.on_message("not a mapping");
        controller.on_message(r#"[1,2,3]"#);

        assert_eq!(book.snapshot(), before);
        assert_eq!(*state_rx.borrow(), ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn test_valid_message_folds_into_book() {
        let book = seeded_book();
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        let (controller, _state_rx) = FeedController::new(
            FeedConfig {
                live_alert_probability: 0.0,
                ..FeedConfig::default()
            },
            book.clone(),
            AlertSink::new(),
            shutdown_rx,
        );

        controller.on_message(r#"{"bitcoin":"51000","doge":"0.1","ethereum":"bad"}"#);

        assert_eq!(book.get("bitcoin").unwrap().price, 51_000.0);
        assert_eq!(book.get("ethereum").unwrap().price, 3_000.0);
        assert!(book.get("doge").is_none());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_exhausted_retries_fall_back_to_simulator() {
        let book = seeded_book();
        let sink = AlertSink::new();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let (task, state_rx) =
            spawn_controller(fast_config(), book.clone(), sink.clone(), shutdown_rx);

        // Five refused connections then simulated ticks.
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert_eq!(*state_rx.borrow(), ConnectionState::Disconnected);

        // Exactly two connection warnings despite five failures.
        let warnings: Vec<_> = sink
            .snapshot()
            .into_iter()
            .filter(|n| n.title == "Connection issue")
            .collect();
        assert_eq!(warnings.len(), 2);
        assert!(sink
            .snapshot()
            .iter()
            .all(|n| n.kind == NotificationKind::PriceAlert));

        // The simulator is moving prices off their seeds.
        tokio::time::sleep(Duration::from_millis(200)).await;
        let seeds = [("bitcoin", 50_000.0), ("ethereum", 3_000.0), ("solana", 100.0)];
        let moved = seeds
            .iter()
            .any(|(id, seed)| book.get(id).unwrap().price != *seed);
        assert!(moved);

        shutdown_tx.send(true).unwrap();
        task.await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_shutdown_during_backoff_is_clean() {
        let book = seeded_book();
        let sink = AlertSink::new();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let config = FeedConfig {
            backoff_base: Duration::from_secs(30),
            backoff_cap: Duration::from_secs(60),
            ..fast_config()
        };
        let (task, _state_rx) = spawn_controller(config, book, sink, shutdown_rx);

        tokio::time::sleep(Duration::from_millis(100)).await;
        shutdown_tx.send(true).unwrap();
        // Repeated signal stays a no-op.
        let _ = shutdown_tx.send(true);

        task.await.unwrap();
    }
}
