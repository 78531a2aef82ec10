use chrono::{DateTime, Utc};
use pnp_core::NewsArticle;

/// An article before scoring. `ticker` is `None` until it has been mapped.
#[derive(Debug, Clone, PartialEq)]
pub struct RawArticle {
    pub published: Option<DateTime<Utc>>,
    pub ticker: Option<String>,
    pub title: String,
    pub summary: String,
    pub link: String,
    pub source: String,
}

/// Output of a scoring backend. `sentiment` is `None` when the backend
/// produced no value for this article.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredArticle {
    pub article: RawArticle,
    pub sentiment: Option<f64>,
}

impl ScoredArticle {
    /// Finalise into a [`NewsArticle`], using `fallback` when the backend gave
    /// no finite sentiment. Unmapped articles yield `None`.
    pub(crate) fn into_news_article(self, fallback: impl FnOnce(&str) -> f64) -> Option<NewsArticle> {
        let RawArticle {
            published,
            ticker,
            title,
            summary,
            link,
            source,
        } = self.article;
        let ticker = ticker?;
        let sentiment = self
            .sentiment
            .filter(|s| s.is_finite())
            .unwrap_or_else(|| fallback(&title))
            .clamp(-1.0, 1.0);
        Some(NewsArticle {
            published,
            ticker,
            title,
            summary,
            link,
            source,
            sentiment,
        })
    }
}
