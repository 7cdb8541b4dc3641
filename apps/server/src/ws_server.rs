//! WebSocket server for real-time data broadcasting to clients.
//!
//! Event-driven: clients get full snapshots on connect, then incremental
//! updates as prices move and notifications arrive. A small command set
//! lets clients mutate the alert feed and favorites.

use crate::state::SharedState;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
    routing::get,
    Router,
};
use futures_util::{SinkExt, StreamExt};
use pulseboard_alerts::SinkEvent;
use pulseboard_core::{City, CryptoAsset, FavoriteEntry, FavoriteKind, NewsArticle, Notification, PriceUpdate};
use pulseboard_feeds::ConnectionState;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info, warn};

/// Stats data for WebSocket broadcast.
#[derive(Debug, Clone, Serialize)]
pub struct WsStatsData {
    pub uptime_secs: u64,
    pub price_updates: u64,
    pub notifications: u64,
    pub unread: usize,
    pub is_running: bool,
}

/// Feed connection status for WebSocket broadcast.
#[derive(Debug, Clone, Serialize)]
pub struct WsFeedStatus {
    pub status: String,
}

/// Server-to-client message types.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum WsServerMessage {
    /// Single price update (event-driven)
    #[serde(rename = "price")]
    Price(PriceUpdate),
    /// Full asset snapshot (for initial sync)
    #[serde(rename = "prices")]
    Prices(Vec<CryptoAsset>),
    #[serde(rename = "weather")]
    Weather(Vec<City>),
    #[serde(rename = "news")]
    News(Vec<NewsArticle>),
    /// Single new notification (event-driven)
    #[serde(rename = "notification")]
    Notification(Notification),
    /// Full alert feed, newest first (initial sync and after mutations)
    #[serde(rename = "notifications")]
    Notifications(Vec<Notification>),
    #[serde(rename = "favorites")]
    Favorites(Vec<FavoriteEntry>),
    #[serde(rename = "stats")]
    Stats(WsStatsData),
    #[serde(rename = "feed_status")]
    FeedStatus(WsFeedStatus),
}

/// Client-to-server commands.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum WsClientCommand {
    MarkRead { id: String },
    MarkAllRead,
    ClearNotifications,
    ToggleFavorite {
        id: String,
        kind: FavoriteKind,
        name: String,
    },
}

/// Broadcast channel sender.
pub type BroadcastSender = broadcast::Sender<WsServerMessage>;

/// WebSocket server state.
pub struct WsServerState {
    pub app_state: SharedState,
    pub broadcast_tx: BroadcastSender,
    pub feed_state: watch::Receiver<ConnectionState>,
}

/// Create WebSocket server router.
pub fn create_ws_router(state: Arc<WsServerState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/ws", get(ws_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .with_state(state)
}

/// Health check handler.
async fn health_handler() -> &'static str {
    "OK"
}

/// WebSocket upgrade handler.
async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<WsServerState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle individual WebSocket connection.
async fn handle_socket(socket: WebSocket, state: Arc<WsServerState>) {
    let (mut sender, mut receiver) = socket.split();
    let mut broadcast_rx = state.broadcast_tx.subscribe();

    debug!("WebSocket client connected");

    // Initial sync: full snapshots of every dashboard surface.
    let app = &state.app_state;
    let initial = [
        WsServerMessage::Prices(app.book.snapshot()),
        WsServerMessage::Weather(app.cities_snapshot().await),
        WsServerMessage::News(app.news_snapshot().await),
        WsServerMessage::Notifications(app.sink.snapshot()),
        WsServerMessage::Favorites(app.favorites.snapshot()),
        WsServerMessage::Stats(collect_stats(app)),
        WsServerMessage::FeedStatus(WsFeedStatus {
            status: state.feed_state.borrow().as_str().to_string(),
        }),
    ];
    for msg in initial {
        if let Ok(json) = serde_json::to_string(&msg) {
            if sender.send(Message::Text(json)).await.is_err() {
                return;
            }
        }
    }

    // Forward broadcast messages to this client.
    let send_task = tokio::spawn(async move {
        loop {
            match broadcast_rx.recv().await {
                Ok(ws_msg) => {
                    if let Ok(json) = serde_json::to_string(&ws_msg) {
                        if sender.send(Message::Text(json)).await.is_err() {
                            break;
                        }
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!(skipped, "client receiver lagged");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    // Handle incoming commands until the client goes away.
    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => match serde_json::from_str::<WsClientCommand>(&text) {
                Ok(cmd) => apply_command(&state, cmd),
                Err(e) => debug!(error = %e, "ignoring unparseable client command"),
            },
            Ok(Message::Close(_)) => break,
            Err(e) => {
                warn!("WebSocket error: {}", e);
                break;
            }
            _ => {}
        }
    }

    send_task.abort();
    debug!("WebSocket client disconnected");
}

/// Apply one client command to shared state.
///
/// Alert-feed mutations are answered through the sink's own event stream;
/// favorites changes broadcast a fresh snapshot directly.
fn apply_command(state: &WsServerState, cmd: WsClientCommand) {
    let app = &state.app_state;
    match cmd {
        WsClientCommand::MarkRead { id } => app.sink.mark_read(&id),
        WsClientCommand::MarkAllRead => app.sink.mark_all_read(),
        WsClientCommand::ClearNotifications => app.sink.clear(),
        WsClientCommand::ToggleFavorite { id, kind, name } => {
            let now_favorite = app.favorites.toggle(&id, kind, &name);
            debug!(id, ?kind, now_favorite, "favorite toggled");
            let _ = state
                .broadcast_tx
                .send(WsServerMessage::Favorites(app.favorites.snapshot()));
        }
    }
}

/// Collect current stats from state.
fn collect_stats(state: &SharedState) -> WsStatsData {
    let summary = state.stats_summary();
    WsStatsData {
        uptime_secs: summary.uptime_secs,
        price_updates: summary.price_updates,
        notifications: summary.notifications,
        unread: state.sink.unread_count(),
        is_running: state.is_running(),
    }
}

/// Forward applied price updates to clients.
pub async fn run_price_forwarder(state: SharedState, tx: BroadcastSender) {
    let mut rx = state.book.subscribe();
    loop {
        match rx.recv().await {
            Ok(update) => {
                state.stats.record_price_update();
                let _ = tx.send(WsServerMessage::Price(update));
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                debug!(skipped, "price forwarder lagged");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

/// Forward alert-feed changes to clients.
pub async fn run_sink_forwarder(state: SharedState, tx: BroadcastSender) {
    let mut rx = state.sink.subscribe();
    loop {
        match rx.recv().await {
            Ok(SinkEvent::Pushed(notification)) => {
                state.stats.record_notification();
                let _ = tx.send(WsServerMessage::Notification(notification));
            }
            // Read/clear mutations resync the whole feed; it is capped at
            // 20 entries, so the payload stays small.
            Ok(_) => {
                let _ = tx.send(WsServerMessage::Notifications(state.sink.snapshot()));
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                debug!(skipped, "sink forwarder lagged");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

/// Forward feed connection status changes to clients.
pub async fn run_feed_status_forwarder(
    mut feed_state: watch::Receiver<ConnectionState>,
    tx: BroadcastSender,
) {
    while feed_state.changed().await.is_ok() {
        let status = feed_state.borrow().as_str().to_string();
        let _ = tx.send(WsServerMessage::FeedStatus(WsFeedStatus { status }));
    }
}

/// Broadcast a stats update.
pub fn broadcast_stats(tx: &BroadcastSender, state: &SharedState) {
    let _ = tx.send(WsServerMessage::Stats(collect_stats(state)));
}

/// Create WebSocket server and return the broadcast sender for event-driven
/// updates.
pub fn create_ws_server(
    state: SharedState,
    feed_state: watch::Receiver<ConnectionState>,
) -> (Router, BroadcastSender) {
    let (broadcast_tx, _) = broadcast::channel::<WsServerMessage>(1000);

    let ws_state = Arc::new(WsServerState {
        app_state: state,
        broadcast_tx: broadcast_tx.clone(),
        feed_state,
    });

    let app = create_ws_router(ws_state);
    (app, broadcast_tx)
}

/// Start the WebSocket server and return the broadcast sender.
pub async fn start_ws_server(
    state: SharedState,
    feed_state: watch::Receiver<ConnectionState>,
    port: u16,
) -> Result<BroadcastSender, Box<dyn std::error::Error + Send + Sync>> {
    let (app, broadcast_tx) = create_ws_server(state, feed_state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    info!("WebSocket server listening on ws://0.0.0.0:{}", port);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("WebSocket server error: {}", e);
        }
    });

    Ok(broadcast_tx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::state::create_state;
    use pretty_assertions::assert_eq;

    fn test_state() -> SharedState {
        let dir = std::env::temp_dir();
        create_state(AppConfig {
            favorites_path: dir
                .join(format!("pulseboard-ws-test-{}.json", std::process::id()))
                .to_string_lossy()
                .into_owned(),
            ..AppConfig::default()
        })
    }

    #[test]
    fn test_client_command_parsing() {
        let cmd: WsClientCommand =
            serde_json::from_str(r#"{"type":"mark_read","data":{"id":"price-bitcoin-3"}}"#)
                .unwrap();
        assert_eq!(
            cmd,
            WsClientCommand::MarkRead {
                id: "price-bitcoin-3".to_string()
            }
        );

        let cmd: WsClientCommand = serde_json::from_str(r#"{"type":"mark_all_read"}"#).unwrap();
        assert_eq!(cmd, WsClientCommand::MarkAllRead);

        let cmd: WsClientCommand = serde_json::from_str(
            r#"{"type":"toggle_favorite","data":{"id":"bitcoin","kind":"crypto","name":"Bitcoin"}}"#,
        )
        .unwrap();
        assert!(matches!(cmd, WsClientCommand::ToggleFavorite { .. }));
    }

    #[test]
    fn test_server_message_tags() {
        let json =
            serde_json::to_string(&WsServerMessage::Price(PriceUpdate::new("bitcoin", 1.0)))
                .unwrap();
        assert!(json.contains(r#""type":"price""#));

        let json = serde_json::to_string(&WsServerMessage::FeedStatus(WsFeedStatus {
            status: "connected".to_string(),
        }))
        .unwrap();
        assert!(json.contains(r#""type":"feed_status""#));
        assert!(json.contains(r#""status":"connected""#));
    }

    #[tokio::test]
    async fn test_apply_command_mutates_sink() {
        let app_state = test_state();
        let (broadcast_tx, _rx) = broadcast::channel(16);
        let (_feed_tx, feed_rx) = watch::channel(ConnectionState::Disconnected);
        let state = WsServerState {
            app_state: app_state.clone(),
            broadcast_tx,
            feed_state: feed_rx,
        };

        app_state.sink.push(Notification::new(
            pulseboard_core::NotificationKind::PriceAlert,
            "bitcoin",
            "Alert",
            "message",
        ));
        assert_eq!(app_state.sink.unread_count(), 1);

        apply_command(&state, WsClientCommand::MarkAllRead);
        assert_eq!(app_state.sink.unread_count(), 0);

        apply_command(&state, WsClientCommand::ClearNotifications);
        assert!(app_state.sink.is_empty());
    }

    #[tokio::test]
    async fn test_toggle_favorite_broadcasts_snapshot() {
        let app_state = test_state();
        let (broadcast_tx, mut rx) = broadcast::channel(16);
        let (_feed_tx, feed_rx) = watch::channel(ConnectionState::Disconnected);
        let state = WsServerState {
            app_state: app_state.clone(),
            broadcast_tx,
            feed_state: feed_rx,
        };

        let was_favorite = app_state
            .favorites
            .is_favorite("solana", FavoriteKind::Crypto);

        apply_command(
            &state,
            WsClientCommand::ToggleFavorite {
                id: "solana".to_string(),
                kind: FavoriteKind::Crypto,
                name: "Solana".to_string(),
            },
        );

        match rx.recv().await.unwrap() {
            WsServerMessage::Favorites(entries) => {
                let is_favorite = entries
                    .iter()
                    .any(|e| e.matches("solana", FavoriteKind::Crypto));
                assert_eq!(is_favorite, !was_favorite);
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }
}
