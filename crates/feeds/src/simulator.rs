//! Synthetic price generator for degraded mode.
//!
//! When the live feed is given up on, this task fabricates plausible price
//! movement so the dashboard keeps updating.

use crate::book::PriceBook;
use pulseboard_alerts::{compose, AlertSink};
use pulseboard_core::WatchedAsset;
use rand::Rng;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info};

/// Per-tick price variation bound: U(-1%, +1%).
const VARIATION_LIMIT: f64 = 0.01;

/// Periodic random-walk price generator.
pub struct Simulator {
    watch_list: Vec<WatchedAsset>,
    period: Duration,
    alert_probability: f64,
}

impl Simulator {
    pub const DEFAULT_PERIOD: Duration = Duration::from_secs(5);
    pub const DEFAULT_ALERT_PROBABILITY: f64 = 0.05;

    pub fn new(watch_list: Vec<WatchedAsset>, period: Duration, alert_probability: f64) -> Self {
        Self {
            watch_list,
            period,
            alert_probability,
        }
    }

    /// Run until the shutdown signal flips to `true`.
    ///
    /// Each tick picks one asset uniformly at random, moves its price by
    /// `base * (1 + U(-0.01, 0.01))`, and with `alert_probability` also
    /// emits a simulated price alert.
    pub async fn run(self, book: PriceBook, sink: AlertSink, mut shutdown: watch::Receiver<bool>) {
        if self.watch_list.is_empty() {
            info!("simulator has an empty watch-list, nothing to do");
            return;
        }

        info!(
            assets = self.watch_list.len(),
            period_secs = self.period.as_secs(),
            "price simulator started"
        );

        let mut interval =
            tokio::time::interval_at(tokio::time::Instant::now() + self.period, self.period);
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let mut rng = rand::thread_rng();
                    let asset = &self.watch_list[rng.gen_range(0..self.watch_list.len())];
                    let variation = rng.gen_range(-VARIATION_LIMIT..VARIATION_LIMIT);
                    let price = asset.base_price * (1.0 + variation);

                    book.set_price(&asset.id, price);
                    debug!(asset = %asset.id, price, "simulated tick");

                    if rng.gen_bool(self.alert_probability) {
                        sink.push(compose::simulated_price_alert(&asset.id, variation));
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("price simulator stopped");
    }
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new(
            WatchedAsset::default_watch_list(),
            Self::DEFAULT_PERIOD,
            Self::DEFAULT_ALERT_PROBABILITY,
        )
    }
}
