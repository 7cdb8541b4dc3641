//! Notification records for the dashboard alert feed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Maximum number of notifications retained; oldest evicted first.
pub const NOTIFICATION_CAP: usize = 20;

/// Kind of notification shown in the alert feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    PriceAlert,
    WeatherAlert,
}

impl NotificationKind {
    fn id_prefix(self) -> &'static str {
        match self {
            NotificationKind::PriceAlert => "price",
            NotificationKind::WeatherAlert => "weather",
        }
    }
}

/// A single alert-feed entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Unique id, e.g. "price-bitcoin-17"
    pub id: String,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub read: bool,
}

// Process-wide sequence keeps ids unique even when two notifications are
// created within the same millisecond.
static NOTIFICATION_SEQ: AtomicU64 = AtomicU64::new(0);

impl Notification {
    /// Create an unread notification with a fresh unique id.
    pub fn new(kind: NotificationKind, subject: &str, title: &str, message: &str) -> Self {
        let seq = NOTIFICATION_SEQ.fetch_add(1, Ordering::Relaxed);
        Self {
            id: format!("{}-{}-{}", kind.id_prefix(), subject, seq),
            kind,
            title: title.to_string(),
            message: message.to_string(),
            created_at: Utc::now(),
            read: false,
        }
    }
}
