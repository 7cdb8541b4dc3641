//! Inbound transport message parsing.
//!
//! The feed sends one message shape: a JSON object mapping asset symbol to
//! a string-encoded decimal price, e.g.
//! `{"bitcoin":"50123.45","ethereum":"2998.10"}`.

use crate::error::FeedError;
use pulseboard_core::PriceUpdate;
use serde_json::Value;
use tracing::debug;

/// Parse a raw feed payload into price updates.
///
/// A payload that is not a JSON object is a [`FeedError::MessageFormat`]
/// and the whole message is dropped. Within an object, entries whose price
/// does not parse as a finite float are skipped; the rest still apply.
pub fn parse_price_map(raw: &str) -> Result<Vec<PriceUpdate>, FeedError> {
    let value: Value = serde_json::from_str(raw)?;
    let map = value
        .as_object()
        .ok_or_else(|| FeedError::MessageFormat("expected a symbol-to-price object".into()))?;

    let mut updates = Vec::with_capacity(map.len());
    for (asset, price) in map {
        let parsed = match price {
            Value::String(s) => s.parse::<f64>().ok(),
            Value::Number(n) => n.as_f64(),
            _ => None,
        };
        match parsed {
            Some(price) if price.is_finite() => updates.push(PriceUpdate::new(asset, price)),
            _ => debug!(asset = %asset, "skipping entry with unparseable price"),
        }
    }
    Ok(updates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_price_map() {
        let updates =
            parse_price_map(r#"{"bitcoin":"50123.45","ethereum":"2998.10"}"#).unwrap();
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0], PriceUpdate::new("bitcoin", 50123.45));
        assert_eq!(updates[1], PriceUpdate::new("ethereum", 2998.10));
    }

    #[test]
    fn test_numeric_prices_accepted() {
        let updates = parse_price_map(r#"{"solana":101.5}"#).unwrap();
        assert_eq!(updates, vec![PriceUpdate::new("solana", 101.5)]);
    }

    #[test]
    fn test_non_object_payload_is_format_error() {
        assert!(matches!(
            parse_price_map(r#"["bitcoin","50000"]"#),
            Err(FeedError::MessageFormat(_))
        ));
        assert!(matches!(
            parse_price_map("not json at all"),
            Err(FeedError::MessageFormat(_))
        ));
    }

    #[test]
    fn test_bad_entries_skipped_others_apply() {
        let updates = parse_price_map(
            r#"{"bitcoin":"oops","ethereum":"3000","solana":null,"cardano":"NaN"}"#,
        )
        .unwrap();
        assert_eq!(updates, vec![PriceUpdate::new("ethereum", 3000.0)]);
    }

    #[test]
    fn test_empty_object_yields_no_updates() {
        assert_eq!(parse_price_map("{}").unwrap(), vec![]);
    }
}
