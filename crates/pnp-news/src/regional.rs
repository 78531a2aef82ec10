//! Regional fallback retrieval for tickers the primary pipeline did not cover.

use std::sync::Arc;

use pnp_core::{lookback_cutoff, within_window, AliasSet, RegionConfig};

use crate::clock::Clock;
use crate::sources::{FeedLocale, FeedSearch};
use crate::types::RawArticle;

/// Searches a regional news feed using a ticker's aliases.
pub struct RegionalFallbackFetcher {
    source: Arc<dyn FeedSearch>,
    region: RegionConfig,
    locale: FeedLocale,
    clock: Arc<dyn Clock>,
}

impl RegionalFallbackFetcher {
    #[must_use]
    pub fn new(source: Arc<dyn FeedSearch>, region: RegionConfig, clock: Arc<dyn Clock>) -> Self {
        let locale = FeedLocale::from(&region);
        Self {
            source,
            region,
            locale,
            clock,
        }
    }

    /// `("alias 1" OR "alias 2" ...) AND <restriction clause>`.
    ///
    /// Falls back to the bare ticker when it has no resolved aliases.
    #[must_use]
    pub fn build_query(&self, ticker: &str, aliases: &AliasSet) -> String {
        let resolved = aliases.get(ticker);
        let terms: Vec<&str> = if resolved.is_empty() {
            vec![ticker]
        } else {
            resolved.iter().map(String::as_str).collect()
        };

        let disjunction = terms
            .iter()
            .map(|t| t.replace('"', ""))
            .filter(|t| !t.trim().is_empty())
            .map(|t| format!("\"{}\"", t.trim()))
            .collect::<Vec<_>>()
            .join(" OR ");

        let clause = self.region.restriction_clause.trim();
        if clause.is_empty() {
            format!("({disjunction})")
        } else {
            format!("({disjunction}) AND {clause}")
        }
    }

    /// Fetch up to `max_items` entries for `ticker` inside the lookback window.
    ///
    /// Entries with no parseable date or dated before the cutoff are dropped.
    /// Any retrieval failure yields an empty list.
    pub async fn fetch(
        &self,
        ticker: &str,
        aliases: &AliasSet,
        lookback_days: u32,
        max_items: usize,
    ) -> Vec<RawArticle> {
        let query = self.build_query(ticker, aliases);
        let entries = match self.source.search(&query, &self.locale).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(
                    ticker,
                    source = "regional_feed",
                    error = %e,
                    "regional fallback fetch failed"
                );
                return Vec::new();
            }
        };

        let cutoff = lookback_cutoff(self.clock.now(), lookback_days);
        let articles: Vec<RawArticle> = entries
            .into_iter()
            .take(max_items)
            .filter(|entry| within_window(entry.published, cutoff))
            .map(|entry| RawArticle {
                published: entry.published,
                ticker: Some(ticker.to_string()),
                title: entry.title,
                summary: String::new(),
                link: entry.link,
                source: entry
                    .source
                    .unwrap_or_else(|| self.region.default_source_label.clone()),
            })
            .collect();

        tracing::debug!(ticker, count = articles.len(), "regional fallback entries kept");
        articles
    }
}
