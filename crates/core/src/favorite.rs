//! User favorites pinned for quick access.

use chrono::{DateTime, Utc};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// What kind of item a favorite refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FavoriteKind {
    Crypto,
    Weather,
}

/// A user-marked entry, persisted locally.
///
/// At most one entry exists per `(id, kind)` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteEntry {
    pub id: CompactString,
    pub kind: FavoriteKind,
    pub name: CompactString,
    pub added_at: DateTime<Utc>,
}

impl FavoriteEntry {
    pub fn new(id: &str, kind: FavoriteKind, name: &str) -> Self {
        Self {
            id: CompactString::new(id),
            kind,
            name: CompactString::new(name),
            added_at: Utc::now(),
        }
    }

    /// Whether this entry refers to the given `(id, kind)` pair.
    pub fn matches(&self, id: &str, kind: FavoriteKind) -> bool {
        self.id == id && self.kind == kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_matches() {
        let entry = FavoriteEntry::new("btc", FavoriteKind::Crypto, "Bitcoin");
        assert!(entry.matches("btc", FavoriteKind::Crypto));
        assert!(!entry.matches("btc", FavoriteKind::Weather));
        assert!(!entry.matches("eth", FavoriteKind::Crypto));
    }

    #[test]
    fn test_entry_roundtrip() {
        let entry = FavoriteEntry::new("london", FavoriteKind::Weather, "London");
        let json = serde_json::to_string(&entry).unwrap();
        let parsed: FavoriteEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, entry);
    }
}
