//! Scored news coverage and the lookback window.

use chrono::{DateTime, NaiveTime, TimeDelta, Utc};
use serde::Serialize;

/// One scored unit of coverage for a ticker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsArticle {
    /// Publication time; `None` when the feed date could not be parsed.
    pub published: Option<DateTime<Utc>>,
    pub ticker: String,
    pub title: String,
    pub summary: String,
    pub link: String,
    pub source: String,
    /// Sentiment in `[-1.0, 1.0]`.
    pub sentiment: f64,
}

/// Start of the lookback window: midnight UTC of `now`'s date, minus `days`.
///
/// Windows reaching past the earliest representable instant start there.
#[must_use]
pub fn lookback_cutoff(now: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    let midnight = now.date_naive().and_time(NaiveTime::MIN).and_utc();
    TimeDelta::try_days(i64::from(days))
        .and_then(|span| midnight.checked_sub_signed(span))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Whether a publication time falls inside the window. Unknown dates never do.
#[must_use]
pub fn within_window(published: Option<DateTime<Utc>>, cutoff: DateTime<Utc>) -> bool {
    published.is_some_and(|p| p >= cutoff)
}

/// All articles of one aggregation run, in merge order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ArticleSet {
    articles: Vec<NewsArticle>,
}

impl ArticleSet {
    #[must_use]
    pub fn new(articles: Vec<NewsArticle>) -> Self {
        Self { articles }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.articles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NewsArticle> {
        self.articles.iter()
    }

    pub fn for_ticker<'a, 'b>(
        &'a self,
        ticker: &'b str,
    ) -> impl Iterator<Item = &'a NewsArticle> + use<'a, 'b> {
        self.articles.iter().filter(move |a| a.ticker == ticker)
    }

    #[must_use]
    pub fn count_for(&self, ticker: &str) -> usize {
        self.for_ticker(ticker).count()
    }

    /// Articles for `ticker`, newest first. Undated articles sort last.
    #[must_use]
    pub fn newest_first(&self, ticker: &str) -> Vec<&NewsArticle> {
        let mut out: Vec<&NewsArticle> = self.for_ticker(ticker).collect();
        out.sort_by(|a, b| b.published.cmp(&a.published));
        out
    }

    /// Mean sentiment for `ticker`, `None` when it has no articles.
    #[must_use]
    pub fn mean_sentiment(&self, ticker: &str) -> Option<f64> {
        let (sum, count) = self
            .for_ticker(ticker)
            .fold((0.0_f64, 0_u32), |(s, n), a| (s + a.sentiment, n + 1));
        (count > 0).then(|| sum / f64::from(count))
    }

    /// Drop every article published before `cutoff` or with no date.
    pub fn retain_since(&mut self, cutoff: DateTime<Utc>) {
        self.articles.retain(|a| within_window(a.published, cutoff));
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<NewsArticle> {
        self.articles
    }
}

impl<'a> IntoIterator for &'a ArticleSet {
    type Item = &'a NewsArticle;
    type IntoIter = std::slice::Iter<'a, NewsArticle>;

    fn into_iter(self) -> Self::IntoIter {
        self.articles.iter()
    }
}
