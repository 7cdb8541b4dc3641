//! Cryptocurrency asset definitions.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Identifier for a tracked asset (e.g., "bitcoin").
pub type AssetId = CompactString;

/// A tracked cryptocurrency with its last-known market data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CryptoAsset {
    /// Asset identifier (e.g., "bitcoin")
    pub id: AssetId,
    /// Display name (e.g., "Bitcoin")
    pub name: CompactString,
    /// Ticker symbol (e.g., "btc")
    pub symbol: CompactString,
    /// Last-known price in USD
    pub price: f64,
    /// Bounded 24h change in percent, clamped to [-15, 15]
    pub price_change_24h: f64,
    /// Market capitalization in USD
    pub market_cap: f64,
    /// 24h trading volume in USD
    pub volume_24h: f64,
    /// Circulating supply in units of the asset
    pub circulating_supply: f64,
    /// All-time-high price in USD
    pub all_time_high: f64,
}

impl CryptoAsset {
    /// Create an asset with only identity and price; market fields zeroed.
    pub fn new(id: &str, name: &str, symbol: &str, price: f64) -> Self {
        Self {
            id: CompactString::new(id),
            name: CompactString::new(name),
            symbol: CompactString::new(symbol),
            price,
            price_change_24h: 0.0,
            market_cap: 0.0,
            volume_24h: 0.0,
            circulating_supply: 0.0,
            all_time_high: 0.0,
        }
    }

    fn with_market(
        mut self,
        change: f64,
        market_cap: f64,
        volume: f64,
        supply: f64,
        ath: f64,
    ) -> Self {
        self.price_change_24h = change;
        self.market_cap = market_cap;
        self.volume_24h = volume;
        self.circulating_supply = supply;
        self.all_time_high = ath;
        self
    }

    /// The fixed asset list the dashboard tracks at startup.
    pub fn seed_list() -> Vec<CryptoAsset> {
        vec![
            CryptoAsset::new("bitcoin", "Bitcoin", "btc", 50_000.0).with_market(
                2.5,
                950_000_000_000.0,
                30_000_000_000.0,
                19_000_000.0,
                69_000.0,
            ),
            CryptoAsset::new("ethereum", "Ethereum", "eth", 3_000.0).with_market(
                -1.2,
                350_000_000_000.0,
                15_000_000_000.0,
                120_000_000.0,
                4_800.0,
            ),
            CryptoAsset::new("solana", "Solana", "sol", 100.0).with_market(
                5.8,
                40_000_000_000.0,
                2_000_000_000.0,
                400_000_000.0,
                260.0,
            ),
            CryptoAsset::new("cardano", "Cardano", "ada", 0.5).with_market(
                -0.7,
                18_000_000_000.0,
                500_000_000.0,
                35_000_000_000.0,
                3.1,
            ),
            CryptoAsset::new("polkadot", "Polkadot", "dot", 7.0).with_market(
                1.3,
                9_000_000_000.0,
                300_000_000.0,
                1_200_000_000.0,
                55.0,
            ),
            CryptoAsset::new("ripple", "XRP", "xrp", 0.6).with_market(
                3.2,
                32_000_000_000.0,
                1_500_000_000.0,
                50_000_000_000.0,
                3.4,
            ),
        ]
    }
}

/// An asset the synthetic generator knows how to fabricate prices for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchedAsset {
    pub id: AssetId,
    /// Anchor price the random walk oscillates around
    pub base_price: f64,
}

impl WatchedAsset {
    pub fn new(id: &str, base_price: f64) -> Self {
        Self {
            id: CompactString::new(id),
            base_price,
        }
    }

    /// Default watch-list for the live feed subscription and the simulator.
    pub fn default_watch_list() -> Vec<WatchedAsset> {
        vec![
            WatchedAsset::new("bitcoin", 50_000.0),
            WatchedAsset::new("ethereum", 3_000.0),
            WatchedAsset::new("solana", 100.0),
        ]
    }
}

/// A transient price update folded into the price book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceUpdate {
    pub asset_id: AssetId,
    pub price: f64,
}

impl PriceUpdate {
    pub fn new(asset_id: &str, price: f64) -> Self {
        Self {
            asset_id: CompactString::new(asset_id),
            price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_seed_list_contents() {
        let assets = CryptoAsset::seed_list();
        assert_eq!(assets.len(), 6);

        let btc = &assets[0];
        assert_eq!(btc.id.as_str(), "bitcoin");
        assert_eq!(btc.symbol.as_str(), "btc");
        assert_eq!(btc.price, 50_000.0);
        assert_eq!(btc.all_time_high, 69_000.0);
    }

    #[test]
    fn test_watch_list_matches_seeds() {
        let watch = WatchedAsset::default_watch_list();
        let seeds = CryptoAsset::seed_list();

        for w in &watch {
            assert!(seeds.iter().any(|a| a.id == w.id), "unknown {}", w.id);
        }
    }

    #[test]
    fn test_price_update_serialization() {
        let update = PriceUpdate::new("bitcoin", 51_234.5);
        let json = serde_json::to_string(&update).unwrap();
        let parsed: PriceUpdate = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, update);
    }
}
