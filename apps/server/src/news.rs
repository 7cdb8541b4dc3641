//! News headlines for the dashboard.
//!
//! Headlines come from an optional JSON endpoint; when no source is
//! configured or a fetch fails, the bundled set keeps the panel populated.

use chrono::{Duration, Utc};
use pulseboard_core::NewsArticle;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum NewsError {
    #[error("news request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Wire shape of the headline endpoint.
#[derive(Debug, Deserialize)]
struct ArticlePayload {
    articles: Vec<NewsArticle>,
}

/// Fetch headlines from the configured endpoint.
pub async fn fetch_headlines(url: &str) -> Result<Vec<NewsArticle>, NewsError> {
    let payload: ArticlePayload = reqwest::get(url).await?.error_for_status()?.json().await?;
    debug!(count = payload.articles.len(), "fetched headlines");
    Ok(payload.articles)
}

/// Fetch headlines, falling back to the bundled set on any failure.
pub async fn headlines_or_fallback(url: &str) -> Vec<NewsArticle> {
    if url.is_empty() {
        return fallback_headlines();
    }
    match fetch_headlines(url).await {
        Ok(articles) if !articles.is_empty() => articles,
        Ok(_) => {
            debug!("headline endpoint returned nothing, using bundled set");
            fallback_headlines()
        }
        Err(e) => {
            warn!(error = %e, "headline fetch failed, using bundled set");
            fallback_headlines()
        }
    }
}

/// Bundled headlines used when no live source is available.
pub fn fallback_headlines() -> Vec<NewsArticle> {
    let now = Utc::now();
    vec![
        NewsArticle::new(
            "1",
            "Bitcoin Surges Past Previous Resistance Levels",
            "https://example.com/news/1",
            "Crypto Daily",
            now - Duration::hours(1),
        ),
        NewsArticle::new(
            "2",
            "Ethereum Upgrade Brings Lower Transaction Fees",
            "https://example.com/news/2",
            "Block Herald",
            now - Duration::hours(3),
        ),
        NewsArticle::new(
            "3",
            "Central Banks Weigh Digital Currency Pilots",
            "https://example.com/news/3",
            "Finance Wire",
            now - Duration::hours(5),
        ),
        NewsArticle::new(
            "4",
            "Solana Ecosystem Sees Record Developer Activity",
            "https://example.com/news/4",
            "Chain Report",
            now - Duration::hours(8),
        ),
        NewsArticle::new(
            "5",
            "Market Analysts Split on Altcoin Season Timing",
            "https://example.com/news/5",
            "Crypto Daily",
            now - Duration::hours(12),
        ),
    ]
}
