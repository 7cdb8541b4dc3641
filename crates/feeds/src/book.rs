//! Price store for tracked assets.
//!
//! The book is the single mutation surface for price data: components call
//! `initialize` and `set_price`; everything else observes, either through
//! snapshots or the change broadcast.

use dashmap::DashMap;
use pulseboard_core::{AssetId, CryptoAsset, PriceUpdate};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::trace;

/// Bounds for the 24h-change field, in percent.
const CHANGE_24H_LIMIT: f64 = 15.0;

/// Damping factor applied to the instantaneous delta when folding it into
/// the 24h-change field.
const CHANGE_24H_WEIGHT: f64 = 0.1;

/// Thread-safe keyed store of tracked assets.
#[derive(Clone)]
pub struct PriceBook {
    assets: Arc<DashMap<AssetId, CryptoAsset>>,
    updates: broadcast::Sender<PriceUpdate>,
}

impl PriceBook {
    pub fn new() -> Self {
        let (updates, _) = broadcast::channel(256);
        Self {
            assets: Arc::new(DashMap::new()),
            updates,
        }
    }

    /// Replace the tracked asset set. Only initialization inserts; price
    /// updates fold into existing entries.
    pub fn initialize(&self, assets: Vec<CryptoAsset>) {
        self.assets.clear();
        for asset in assets {
            self.assets.insert(asset.id.clone(), asset);
        }
    }

    /// Fold a price update into an existing entry.
    ///
    /// Unknown asset ids are a no-op (returns `false`), not an error. On a
    /// real update the 24h-change field is recomputed as
    /// `clamp(old + 0.1 * pct_delta, -15, 15)` and subscribers are
    /// notified.
    pub fn set_price(&self, id: &str, price: f64) -> bool {
        let Some(mut entry) = self.assets.get_mut(id) else {
            trace!(asset = id, "price update for unknown asset dropped");
            return false;
        };

        let old_price = entry.price;
        entry.price = price;

        if old_price != 0.0 {
            let pct_delta = (price - old_price) / old_price * 100.0;
            entry.price_change_24h = (entry.price_change_24h + CHANGE_24H_WEIGHT * pct_delta)
                .clamp(-CHANGE_24H_LIMIT, CHANGE_24H_LIMIT);
        }
        drop(entry);

        let _ = self.updates.send(PriceUpdate::new(id, price));
        true
    }

    /// Get a copy of one asset.
    pub fn get(&self, id: &str) -> Option<CryptoAsset> {
        self.assets.get(id).map(|r| r.clone())
    }

    /// All tracked assets, ordered by id for stable output.
    pub fn snapshot(&self) -> Vec<CryptoAsset> {
        let mut assets: Vec<CryptoAsset> = self.assets.iter().map(|r| r.clone()).collect();
        assets.sort_by(|a, b| a.id.cmp(&b.id));
        assets
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Subscribe to applied price updates.
    pub fn subscribe(&self) -> broadcast::Receiver<PriceUpdate> {
        self.updates.subscribe()
    }
}

impl Default for PriceBook {
    fn default() -> Self {
        Self::new()
    }
}
