//! Application state management.

use crate::config::AppConfig;
use crate::favorites::FavoriteStore;
use pulseboard_alerts::AlertSink;
use pulseboard_core::{City, CryptoAsset, NewsArticle};
use pulseboard_feeds::PriceBook;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Server statistics.
#[derive(Debug, Default)]
pub struct ServerStats {
    /// Price updates applied to the book.
    pub price_updates: AtomicU64,
    /// Notifications pushed to the alert feed.
    pub notifications: AtomicU64,
    /// Start time in milliseconds.
    pub started_at_ms: AtomicU64,
}

impl ServerStats {
    pub fn new() -> Self {
        Self {
            started_at_ms: AtomicU64::new(now_ms()),
            ..Default::default()
        }
    }

    pub fn record_price_update(&self) {
        self.price_updates.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_notification(&self) {
        self.notifications.fetch_add(1, Ordering::Relaxed);
    }

    pub fn uptime_secs(&self) -> u64 {
        (now_ms().saturating_sub(self.started_at_ms.load(Ordering::Relaxed))) / 1000
    }

    pub fn summary(&self) -> StatsSummary {
        StatsSummary {
            price_updates: self.price_updates.load(Ordering::Relaxed),
            notifications: self.notifications.load(Ordering::Relaxed),
            uptime_secs: self.uptime_secs(),
        }
    }
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Summary of statistics.
#[derive(Debug, Clone)]
pub struct StatsSummary {
    pub price_updates: u64,
    pub notifications: u64,
    pub uptime_secs: u64,
}

/// Application state shared across components.
pub struct AppState {
    /// Configuration.
    pub config: AppConfig,
    /// Tracked asset prices.
    pub book: PriceBook,
    /// Weather conditions per city.
    pub cities: RwLock<Vec<City>>,
    /// Current news headlines.
    pub news: RwLock<Vec<NewsArticle>>,
    /// Alert feed.
    pub sink: AlertSink,
    /// Durable favorites.
    pub favorites: FavoriteStore,
    /// Server statistics.
    pub stats: ServerStats,
    /// Running flag.
    pub running: AtomicBool,
}

impl AppState {
    /// Create new application state with seeded dashboard data.
    pub fn new(config: AppConfig) -> Self {
        let book = PriceBook::new();
        book.initialize(CryptoAsset::seed_list());

        let favorites = FavoriteStore::open(&config.favorites_path);

        Self {
            config,
            book,
            cities: RwLock::new(City::seed_list()),
            news: RwLock::new(Vec::new()),
            sink: AlertSink::new(),
            favorites,
            stats: ServerStats::new(),
            running: AtomicBool::new(false),
        }
    }

    pub fn start(&self) {
        self.running.store(true, Ordering::SeqCst);
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Replace the headline set.
    pub async fn set_news(&self, articles: Vec<NewsArticle>) {
        let mut news = self.news.write().await;
        *news = articles;
    }

    pub async fn news_snapshot(&self) -> Vec<NewsArticle> {
        self.news.read().await.clone()
    }

    pub async fn cities_snapshot(&self) -> Vec<City> {
        self.cities.read().await.clone()
    }

    pub fn stats_summary(&self) -> StatsSummary {
        self.stats.summary()
    }
}

/// Shared state handle.
pub type SharedState = Arc<AppState>;

/// Create shared state.
pub fn create_state(config: AppConfig) -> SharedState {
    Arc::new(AppState::new(config))
}
