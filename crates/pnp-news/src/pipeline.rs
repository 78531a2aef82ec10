//! News aggregation: primary pipeline, per-ticker regional fallback, one
//! authoritative lookback filter over the merged set.

use std::sync::Arc;

use futures::future::join_all;
use pnp_core::{dedupe_keep_order, lookback_cutoff, AliasSet, ArticleSet, NewsArticle};

use crate::clock::Clock;
use crate::primary::PrimaryNewsPipeline;
use crate::regional::RegionalFallbackFetcher;
use crate::scorer::keyword_score;
use crate::types::{RawArticle, ScoredArticle};

const DEFAULT_REGIONAL_MAX_ITEMS: usize = 50;

pub struct NewsAggregator {
    primary: Option<Arc<dyn PrimaryNewsPipeline>>,
    regional: Option<RegionalFallbackFetcher>,
    clock: Arc<dyn Clock>,
    regional_max_items: usize,
}

impl NewsAggregator {
    /// Either collaborator may be absent; the run then degrades to whatever
    /// the other one provides.
    #[must_use]
    pub fn new(
        primary: Option<Arc<dyn PrimaryNewsPipeline>>,
        regional: Option<RegionalFallbackFetcher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            primary,
            regional,
            clock,
            regional_max_items: DEFAULT_REGIONAL_MAX_ITEMS,
        }
    }

    #[must_use]
    pub fn with_regional_max_items(mut self, max_items: usize) -> Self {
        self.regional_max_items = max_items;
        self
    }

    /// Collect scored coverage for `tickers` published since the lookback cutoff.
    ///
    /// Tickers are processed in first-seen order. Primary articles come first
    /// in the result, followed by fallback articles grouped by ticker. A
    /// ticker with any primary coverage is never sent to the fallback path.
    pub async fn aggregate(
        &self,
        tickers: &[String],
        aliases: &AliasSet,
        backend: &str,
        lookback_days: u32,
    ) -> ArticleSet {
        let tickers = dedupe_keep_order(tickers);

        let primary_articles = self.run_primary(&tickers, backend).await;
        let primary_set = ArticleSet::new(primary_articles);

        let candidates: Vec<&String> = tickers
            .iter()
            .filter(|t| primary_set.count_for(t) == 0)
            .collect();
        tracing::info!(
            primary = primary_set.len(),
            fallback_candidates = candidates.len(),
            "primary news stage complete"
        );

        let mut merged = primary_set.into_inner();
        if let Some(regional) = &self.regional {
            let fetched = join_all(candidates.iter().map(|t| {
                regional.fetch(t, aliases, lookback_days, self.regional_max_items)
            }))
            .await;

            for (ticker, raw) in candidates.iter().zip(fetched) {
                if raw.is_empty() {
                    tracing::info!(ticker = %ticker, "no regional coverage");
                    continue;
                }
                let scored = self.score_fallback(raw, backend).await;
                tracing::info!(ticker = %ticker, count = scored.len(), "regional fallback articles");
                merged.extend(scored);
            }
        } else if !candidates.is_empty() {
            tracing::debug!("regional fallback disabled");
        }

        let mut articles = ArticleSet::new(merged);
        articles.retain_since(lookback_cutoff(self.clock.now(), lookback_days));
        articles
    }

    async fn run_primary(&self, tickers: &[String], backend: &str) -> Vec<NewsArticle> {
        let Some(primary) = &self.primary else {
            return Vec::new();
        };
        if tickers.is_empty() {
            return Vec::new();
        }

        let fetched = match primary.fetch(tickers).await {
            Ok(articles) => articles,
            Err(e) => {
                tracing::warn!(stage = "fetch", error = %e, "primary news pipeline failed");
                return Vec::new();
            }
        };
        if fetched.is_empty() {
            return Vec::new();
        }

        let mapped = match primary.map_to_tickers(fetched, tickers) {
            Ok(articles) => articles,
            Err(e) => {
                tracing::warn!(stage = "map", error = %e, "primary news pipeline failed");
                return Vec::new();
            }
        };
        if mapped.is_empty() {
            return Vec::new();
        }

        match primary.score(mapped, backend).await {
            Ok(scored) => finalize(scored),
            Err(e) => {
                tracing::warn!(stage = "score", backend, error = %e, "primary news pipeline failed");
                Vec::new()
            }
        }
    }

    /// Score fallback articles with the primary backend when possible, per
    /// headline keyword scoring otherwise.
    async fn score_fallback(&self, raw: Vec<RawArticle>, backend: &str) -> Vec<NewsArticle> {
        if let Some(primary) = &self.primary {
            match primary.score(raw.clone(), backend).await {
                Ok(scored) if scored.len() == raw.len() => return finalize(scored),
                Ok(scored) => {
                    tracing::warn!(
                        expected = raw.len(),
                        got = scored.len(),
                        "primary scorer dropped fallback articles; using keyword scores"
                    );
                }
                Err(e) => {
                    tracing::warn!(error = %e, "primary scorer unavailable for fallback articles");
                }
            }
        }
        raw.into_iter()
            .filter_map(|article| {
                ScoredArticle {
                    article,
                    sentiment: None,
                }
                .into_news_article(keyword_score)
            })
            .collect()
    }
}

fn finalize(scored: Vec<ScoredArticle>) -> Vec<NewsArticle> {
    scored
        .into_iter()
        .filter_map(|s| s.into_news_article(keyword_score))
        .collect()
}
