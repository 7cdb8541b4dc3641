//! Randomized alert text builders.
//!
//! Price-change notifications are deliberately synthetic: direction and
//! magnitude are random rather than derived from an old/new price
//! comparison. The trigger is a demo signal, and the text matches it.

use pulseboard_core::{Notification, NotificationKind};
use rand::Rng;

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Build a price alert for a live-feed update.
///
/// Direction is a coin flip; magnitude is uniform in 1..6 percent.
pub fn live_price_alert<R: Rng>(rng: &mut R, asset_id: &str) -> Notification {
    let direction = if rng.gen_bool(0.5) {
        "increased"
    } else {
        "decreased"
    };
    let change_percent = rng.gen_range(1.0..6.0);
    let name = capitalize(asset_id);

    Notification::new(
        NotificationKind::PriceAlert,
        asset_id,
        &format!("{name} Price Alert"),
        &format!("{name} has {direction} by {change_percent:.2}% in the last hour."),
    )
}

/// Build a price alert for a simulator tick.
///
/// Here the tick's own variation supplies direction and magnitude.
pub fn simulated_price_alert(asset_id: &str, variation: f64) -> Notification {
    let direction = if variation >= 0.0 {
        "increased"
    } else {
        "decreased"
    };
    let change_percent = (variation * 100.0).abs();
    let name = capitalize(asset_id);

    Notification::new(
        NotificationKind::PriceAlert,
        asset_id,
        &format!("{name} Price Alert (Simulated)"),
        &format!("{name} has {direction} by {change_percent:.2}% in the last hour."),
    )
}

/// Build a weather alert for a city and category.
pub fn weather_alert(city: &str, category: &str) -> Notification {
    Notification::new(
        NotificationKind::WeatherAlert,
        &city.to_lowercase().replace(' ', "-"),
        &format!("Weather Alert: {city}"),
        &format!("{category} warning for {city}. Take necessary precautions."),
    )
}

/// Informational notice that the live feed is up.
pub fn live_feed_active() -> Notification {
    Notification::new(
        NotificationKind::PriceAlert,
        "feed",
        "Real-time updates active",
        "You're now receiving live cryptocurrency updates.",
    )
}

/// Warning that the live feed dropped and simulated data is in use.
pub fn connection_issue() -> Notification {
    Notification::new(
        NotificationKind::PriceAlert,
        "feed",
        "Connection issue",
        "Using simulated data for crypto updates. Will retry connection.",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_live_price_alert_text() {
        let mut rng = rand::thread_rng();
        let n = live_price_alert(&mut rng, "bitcoin");
        assert_eq!(n.title, "Bitcoin Price Alert");
        assert!(n.message.starts_with("Bitcoin has "));
        assert!(n.message.ends_with("% in the last hour."));
    }

    #[test]
    fn test_simulated_alert_uses_variation() {
        let up = simulated_price_alert("solana", 0.0071);
        assert!(up.title.contains("(Simulated)"));
        assert!(up.message.contains("increased by 0.71%"));

        let down = simulated_price_alert("solana", -0.004);
        assert!(down.message.contains("decreased by 0.40%"));
    }

    #[test]
    fn test_weather_alert_text() {
        let n = weather_alert("New York", "Heavy Rain");
        assert_eq!(n.title, "Weather Alert: New York");
        assert_eq!(
            n.message,
            "Heavy Rain warning for New York. Take necessary precautions."
        );
        assert!(n.id.starts_with("weather-new-york-"));
    }
}
