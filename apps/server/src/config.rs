//! Application configuration.

use pulseboard_core::WatchedAsset;
use pulseboard_feeds::{FeedConfig, RetrySchedule, Simulator};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::warn;

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Live price feed settings.
    pub feed: FeedSettings,
    /// Weather alert timer settings.
    pub weather: WeatherSettings,
    /// News headline settings.
    pub news: NewsSettings,
    /// Favorites persistence file.
    pub favorites_path: String,
    /// Logging level.
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            feed: FeedSettings::default(),
            weather: WeatherSettings::default(),
            news: NewsSettings::default(),
            favorites_path: "favorites.json".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file, falling back to defaults when
    /// the file is absent.
    pub fn load(path: &str) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => config,
                Err(e) => {
                    warn!(path, error = %e, "invalid config file, using defaults");
                    Self::default()
                }
            },
            Err(_) if !Path::new(path).exists() => Self::default(),
            Err(e) => {
                warn!(path, error = %e, "unreadable config file, using defaults");
                Self::default()
            }
        }
    }
}

/// Live feed settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedSettings {
    /// Feed endpoint URL.
    pub url: String,
    /// Consecutive failures tolerated before simulated mode.
    pub max_attempts: u32,
    /// Simulator tick period in seconds.
    pub simulator_period_secs: u64,
    /// Chance of a price alert per applied live update.
    pub live_alert_probability: f64,
    /// Chance of a price alert per simulator tick.
    pub simulator_alert_probability: f64,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            url: "wss://ws.coincap.io/prices?assets=bitcoin,ethereum,solana".to_string(),
            max_attempts: RetrySchedule::DEFAULT_MAX_ATTEMPTS,
            simulator_period_secs: Simulator::DEFAULT_PERIOD.as_secs(),
            live_alert_probability: 0.1,
            simulator_alert_probability: Simulator::DEFAULT_ALERT_PROBABILITY,
        }
    }
}

impl From<&FeedSettings> for FeedConfig {
    fn from(settings: &FeedSettings) -> Self {
        FeedConfig {
            url: settings.url.clone(),
            watch_list: WatchedAsset::default_watch_list(),
            max_attempts: settings.max_attempts,
            simulator_period: Duration::from_secs(settings.simulator_period_secs),
            live_alert_probability: settings.live_alert_probability,
            simulator_alert_probability: settings.simulator_alert_probability,
            ..FeedConfig::default()
        }
    }
}

/// Weather alert timer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherSettings {
    /// Tick period in seconds.
    pub period_secs: u64,
    /// Chance of an alert per tick.
    pub alert_probability: f64,
}

impl Default for WeatherSettings {
    fn default() -> Self {
        Self {
            period_secs: 30,
            alert_probability: 0.2,
        }
    }
}

/// News headline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsSettings {
    /// Headline source URL; empty disables fetching.
    pub url: String,
    /// Refresh period in seconds.
    pub refresh_secs: u64,
}

impl Default for NewsSettings {
    fn default() -> Self {
        Self {
            url: String::new(),
            refresh_secs: 3600,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_app_config_default() {
        let config = AppConfig::default();
        assert_eq!(config.feed.max_attempts, 5);
        assert_eq!(config.weather.period_secs, 30);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_feed_settings_to_config() {
        let settings = FeedSettings::default();
        let config: FeedConfig = (&settings).into();
        assert_eq!(config.url, settings.url);
        assert_eq!(config.simulator_period, Duration::from_secs(5));
        assert_eq!(config.live_alert_probability, 0.1);
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.feed.url, config.feed.url);
        assert_eq!(parsed.weather.alert_probability, 0.2);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = AppConfig::load("definitely-not-a-real-config.json");
        assert_eq!(config.feed.max_attempts, 5);
    }
}
