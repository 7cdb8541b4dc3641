//! Capped notification list with change broadcast.

use pulseboard_core::{Notification, NOTIFICATION_CAP};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;
use tracing::debug;

/// Change events observers receive from the sink.
#[derive(Debug, Clone)]
pub enum SinkEvent {
    /// A notification was pushed (after eviction was applied).
    Pushed(Notification),
    /// A notification was marked read.
    Read(String),
    /// Every notification was marked read.
    AllRead,
    /// The feed was cleared.
    Cleared,
}

/// Append-only, capped notification feed, newest first.
///
/// Holds at most [`NOTIFICATION_CAP`] entries; once the cap is exceeded the
/// oldest entry is evicted. Observers subscribe via [`AlertSink::subscribe`]
/// rather than polling.
#[derive(Clone)]
pub struct AlertSink {
    items: Arc<Mutex<VecDeque<Notification>>>,
    events: broadcast::Sender<SinkEvent>,
}

impl AlertSink {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            items: Arc::new(Mutex::new(VecDeque::new())),
            events,
        }
    }

    /// Insert at the front; truncate to the most recent cap entries.
    pub fn push(&self, notification: Notification) {
        {
            let mut items = self.items.lock().expect("sink lock poisoned");
            items.push_front(notification.clone());
            while items.len() > NOTIFICATION_CAP {
                items.pop_back();
            }
        }
        debug!(id = %notification.id, "notification pushed");
        let _ = self.events.send(SinkEvent::Pushed(notification));
    }

    /// Mark one notification read. Unknown ids are ignored.
    pub fn mark_read(&self, id: &str) {
        let mut found = false;
        {
            let mut items = self.items.lock().expect("sink lock poisoned");
            if let Some(n) = items.iter_mut().find(|n| n.id == id) {
                n.read = true;
                found = true;
            }
        }
        if found {
            let _ = self.events.send(SinkEvent::Read(id.to_string()));
        }
    }

    /// Mark every notification read.
    pub fn mark_all_read(&self) {
        {
            let mut items = self.items.lock().expect("sink lock poisoned");
            for n in items.iter_mut() {
                n.read = true;
            }
        }
        let _ = self.events.send(SinkEvent::AllRead);
    }

    /// Remove every notification.
    pub fn clear(&self) {
        self.items.lock().expect("sink lock poisoned").clear();
        let _ = self.events.send(SinkEvent::Cleared);
    }

    /// Current feed contents, newest first.
    pub fn snapshot(&self) -> Vec<Notification> {
        self.items
            .lock()
            .expect("sink lock poisoned")
            .iter()
            .cloned()
            .collect()
    }

    /// Number of unread notifications.
    pub fn unread_count(&self) -> usize {
        self.items
            .lock()
            .expect("sink lock poisoned")
            .iter()
            .filter(|n| !n.read)
            .count()
    }

    pub fn len(&self) -> usize {
        self.items.lock().expect("sink lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Subscribe to change events.
    pub fn subscribe(&self) -> broadcast::Receiver<SinkEvent> {
        self.events.subscribe()
    }
}

impl Default for AlertSink {
    fn default() -> Self {
        Self::new()
    }
}
