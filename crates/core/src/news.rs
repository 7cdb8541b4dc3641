//! News headline definitions.

use chrono::{DateTime, Utc};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// A single news headline shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsArticle {
    pub id: CompactString,
    pub title: String,
    pub url: String,
    pub source: CompactString,
    pub published_at: DateTime<Utc>,
}

impl NewsArticle {
    pub fn new(id: &str, title: &str, url: &str, source: &str, published_at: DateTime<Utc>) -> Self {
        Self {
            id: CompactString::new(id),
            title: title.to_string(),
            url: url.to_string(),
            source: CompactString::new(source),
            published_at,
        }
    }
}
