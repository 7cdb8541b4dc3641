//! Pulseboard - Dashboard Backend Server
//!
//! Streams live cryptocurrency prices, weather alerts, news headlines, and
//! notifications to dashboard clients over WebSocket.

mod config;
mod favorites;
mod news;
mod state;
mod ws_server;

use clap::Parser;
use config::AppConfig;
use state::{create_state, SharedState};
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use pulseboard_alerts::weather_alert_timer_with;
use pulseboard_feeds::{spawn_controller, FeedConfig};
use tokio::sync::watch;
use ws_server::BroadcastSender;

/// Pulseboard CLI
#[derive(Parser, Debug)]
#[command(name = "pulseboard")]
#[command(about = "Real-time dashboard backend", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.json")]
    config: String,

    /// Live feed URL (overrides the config file)
    #[arg(short, long)]
    url: Option<String>,

    /// Log level: trace, debug, info, warn, error
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// WebSocket server port for clients
    #[arg(long, default_value_t = 9100)]
    ws_port: u16,
}

fn init_logging(level: &str) {
    let level = match level {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

/// Refresh the headline set periodically.
async fn run_news_refresher(state: SharedState, tx: BroadcastSender) {
    let settings = state.config.news.clone();
    let period = Duration::from_secs(settings.refresh_secs.max(60));

    loop {
        let articles = news::headlines_or_fallback(&settings.url).await;
        state.set_news(articles.clone()).await;
        let _ = tx.send(ws_server::WsServerMessage::News(articles));

        tokio::time::sleep(period).await;
        if !state.is_running() {
            break;
        }
    }
}

/// Push a stats snapshot to clients on a fixed cadence.
async fn run_stats_loop(state: SharedState, tx: BroadcastSender) {
    let mut interval = tokio::time::interval(Duration::from_secs(10));
    interval.tick().await;

    while state.is_running() {
        interval.tick().await;
        ws_server::broadcast_stats(&tx, &state);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();
    init_logging(&args.log_level);

    info!("Pulseboard server starting");

    let mut app_config = AppConfig::load(&args.config);
    if let Some(url) = args.url {
        app_config.feed.url = url;
    }

    let state = create_state(app_config);
    state.start();

    // One shutdown signal fans out to every background task.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Live price feed with simulated fallback.
    let feed_config = FeedConfig::from(&state.config.feed);
    let (feed_task, feed_state) = spawn_controller(
        feed_config,
        state.book.clone(),
        state.sink.clone(),
        shutdown_rx.clone(),
    );

    // Weather alert simulation.
    let weather_timer = weather_alert_timer_with(
        Duration::from_secs(state.config.weather.period_secs),
        state.config.weather.alert_probability,
    );
    let weather_task = tokio::spawn(weather_timer.run(state.sink.clone(), shutdown_rx.clone()));

    // Client-facing WebSocket server.
    let broadcast_tx =
        ws_server::start_ws_server(state.clone(), feed_state.clone(), args.ws_port).await?;

    // Event forwarders and periodic work.
    tokio::spawn(ws_server::run_price_forwarder(
        state.clone(),
        broadcast_tx.clone(),
    ));
    tokio::spawn(ws_server::run_sink_forwarder(
        state.clone(),
        broadcast_tx.clone(),
    ));
    tokio::spawn(ws_server::run_feed_status_forwarder(
        feed_state,
        broadcast_tx.clone(),
    ));
    tokio::spawn(run_news_refresher(state.clone(), broadcast_tx.clone()));
    tokio::spawn(run_stats_loop(state.clone(), broadcast_tx.clone()));

    info!("Pulseboard server running, press Ctrl+C to stop");
    tokio::signal::ctrl_c().await?;

    info!("Shutting down");
    state.stop();
    let _ = shutdown_tx.send(true);

    let _ = feed_task.await;
    let _ = weather_task.await;

    info!("Pulseboard server stopped");
    Ok(())
}
