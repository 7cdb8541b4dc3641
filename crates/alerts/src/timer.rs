//! Periodic probabilistic alert generator.
//!
//! One timer abstraction covers every "every N seconds, maybe emit an
//! alert" feature; instances differ only in period, probability, and the
//! payload generator.

use crate::sink::AlertSink;
use pulseboard_core::Notification;
use rand::rngs::ThreadRng;
use rand::Rng;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info};

/// Closure that fabricates one notification when the timer fires.
pub type AlertGenerator = Box<dyn FnMut(&mut ThreadRng) -> Notification + Send>;

/// Fires every `period`; with `probability` per tick, pushes one generated
/// notification into the sink.
pub struct AlertTimer {
    name: &'static str,
    period: Duration,
    probability: f64,
    generator: AlertGenerator,
}

impl AlertTimer {
    pub fn new(
        name: &'static str,
        period: Duration,
        probability: f64,
        generator: AlertGenerator,
    ) -> Self {
        Self {
            name,
            period,
            probability,
            generator,
        }
    }

    /// Run until the shutdown signal flips to `true`.
    ///
    /// The first tick fires one full period after start.
    pub async fn run(mut self, sink: AlertSink, mut shutdown: watch::Receiver<bool>) {
        info!(timer = self.name, period_secs = self.period.as_secs(), "alert timer started");

        let mut interval = tokio::time::interval_at(
            tokio::time::Instant::now() + self.period,
            self.period,
        );
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let mut rng = rand::thread_rng();
                    if rng.gen_bool(self.probability) {
                        let notification = (self.generator)(&mut rng);
                        debug!(timer = self.name, id = %notification.id, "alert fired");
                        sink.push(notification);
                    }
                }
                changed = shutdown.changed() => {
                    // A dropped sender also means teardown.
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!(timer = self.name, "alert timer stopped");
    }
}

/// Weather alert simulation: every 30s, 20% chance of a random
/// city/category warning.
pub fn weather_alert_timer() -> AlertTimer {
    weather_alert_timer_with(Duration::from_secs(30), 0.2)
}

/// Weather alert timer with custom period and probability.
pub fn weather_alert_timer_with(period: Duration, probability: f64) -> AlertTimer {
    const CITIES: [&str; 3] = ["New York", "London", "Tokyo"];
    const CATEGORIES: [&str; 4] = [
        "Heavy Rain",
        "Extreme Heat",
        "Strong Winds",
        "Thunderstorm",
    ];

    AlertTimer::new(
        "weather",
        period,
        probability,
        Box::new(|rng| {
            let city = CITIES[rng.gen_range(0..CITIES.len())];
            let category = CATEGORIES[rng.gen_range(0..CATEGORIES.len())];
            crate::compose::weather_alert(city, category)
        }),
    )
}
