//! The primary news pipeline contract and its feed-backed implementation.

use std::collections::HashSet;

use async_trait::async_trait;
use futures::future::join_all;
use pnp_core::AliasSet;
use regex::{Regex, RegexBuilder};

use crate::error::Unavailable;
use crate::scorer::{keyword_score, lexicon_match};
use crate::sources::YahooHeadlines;
use crate::types::{RawArticle, ScoredArticle};

const DEFAULT_SOURCE_LABEL: &str = "Yahoo Finance";
const DEFAULT_MAX_PER_TICKER: usize = 25;

/// Fetch, attribute and score articles for a set of tickers.
///
/// Any stage may come back empty; that means "no coverage". `Err` means the
/// stage could not run at all.
#[async_trait]
pub trait PrimaryNewsPipeline: Send + Sync {
    async fn fetch(&self, tickers: &[String]) -> Result<Vec<RawArticle>, Unavailable>;

    /// Attach articles to tickers. Unmatched articles are dropped.
    fn map_to_tickers(
        &self,
        articles: Vec<RawArticle>,
        tickers: &[String],
    ) -> Result<Vec<RawArticle>, Unavailable>;

    /// Score already-attributed articles with the named backend.
    async fn score(
        &self,
        articles: Vec<RawArticle>,
        backend: &str,
    ) -> Result<Vec<ScoredArticle>, Unavailable>;
}

/// Scoring backends selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringBackend {
    /// Finance word lexicon over title and summary.
    Lexicon,
    /// Keyword heuristic over the headline only.
    Keyword,
}

impl ScoringBackend {
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "lexicon" => Some(Self::Lexicon),
            "keyword" => Some(Self::Keyword),
            _ => None,
        }
    }

    /// `None` when the lexicon finds nothing to score, so the caller's
    /// headline fallback applies.
    #[must_use]
    pub fn score(self, article: &RawArticle) -> Option<f64> {
        match self {
            Self::Lexicon => lexicon_match(&format!("{} {}", article.title, article.summary)),
            Self::Keyword => Some(keyword_score(&article.title)),
        }
    }
}

/// [`PrimaryNewsPipeline`] over Yahoo Finance per-ticker headline feeds.
pub struct FeedPipeline {
    headlines: YahooHeadlines,
    aliases: AliasSet,
    max_per_ticker: usize,
}

impl FeedPipeline {
    #[must_use]
    pub fn new(headlines: YahooHeadlines, aliases: AliasSet) -> Self {
        Self {
            headlines,
            aliases,
            max_per_ticker: DEFAULT_MAX_PER_TICKER,
        }
    }

    #[must_use]
    pub fn with_max_per_ticker(mut self, max_per_ticker: usize) -> Self {
        self.max_per_ticker = max_per_ticker;
        self
    }

    fn ticker_pattern(&self, ticker: &str) -> Result<Regex, Unavailable> {
        let resolved = self.aliases.get(ticker);
        let terms: Vec<String> = if resolved.is_empty() {
            vec![regex::escape(ticker)]
        } else {
            resolved.iter().map(|a| regex::escape(a)).collect()
        };
        let pattern = format!(
            r"(?:^|[^\p{{L}}\p{{N}}])(?:{})(?:$|[^\p{{L}}\p{{N}}])",
            terms.join("|")
        );
        RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| Unavailable::new("feed_pipeline", format!("alias pattern for {ticker}: {e}")))
    }
}

#[async_trait]
impl PrimaryNewsPipeline for FeedPipeline {
    async fn fetch(&self, tickers: &[String]) -> Result<Vec<RawArticle>, Unavailable> {
        let results = join_all(
            tickers
                .iter()
                .map(|t| self.headlines.fetch_ticker(t, self.max_per_ticker)),
        )
        .await;

        let mut seen = HashSet::new();
        let mut articles = Vec::new();
        let mut failures = 0_usize;
        for (ticker, result) in tickers.iter().zip(results) {
            match result {
                Ok(entries) => {
                    for entry in entries {
                        if !entry.link.is_empty() && !seen.insert(entry.link.clone()) {
                            continue;
                        }
                        articles.push(RawArticle {
                            published: entry.published,
                            ticker: None,
                            title: entry.title,
                            summary: entry.summary,
                            link: entry.link,
                            source: entry
                                .source
                                .unwrap_or_else(|| DEFAULT_SOURCE_LABEL.to_string()),
                        });
                    }
                }
                Err(e) => {
                    failures += 1;
                    tracing::warn!(ticker = %ticker, error = %e, "headline feed fetch failed");
                }
            }
        }

        if !tickers.is_empty() && failures == tickers.len() {
            return Err(Unavailable::new(
                "feed_pipeline",
                "every headline feed request failed",
            ));
        }
        tracing::debug!(count = articles.len(), "headline feed articles fetched");
        Ok(articles)
    }

    fn map_to_tickers(
        &self,
        articles: Vec<RawArticle>,
        tickers: &[String],
    ) -> Result<Vec<RawArticle>, Unavailable> {
        let patterns = tickers
            .iter()
            .map(|t| self.ticker_pattern(t).map(|re| (t, re)))
            .collect::<Result<Vec<_>, _>>()?;

        let mut mapped = Vec::new();
        for article in articles {
            let haystack = format!("{} {}", article.title, article.summary);
            for (ticker, re) in &patterns {
                if re.is_match(&haystack) {
                    mapped.push(RawArticle {
                        ticker: Some((*ticker).clone()),
                        ..article.clone()
                    });
                }
            }
        }
        Ok(mapped)
    }

    async fn score(
        &self,
        articles: Vec<RawArticle>,
        backend: &str,
    ) -> Result<Vec<ScoredArticle>, Unavailable> {
        let Some(backend) = ScoringBackend::from_name(backend) else {
            return Err(Unavailable::new(
                "feed_pipeline",
                format!("unknown scoring backend '{backend}'"),
            ));
        };
        Ok(articles
            .into_iter()
            .map(|article| {
                let sentiment = backend.score(&article);
                ScoredArticle { article, sentiment }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pnp_core::{merge_aliases, UserAliases};

    use super::*;

    fn raw(title: &str, summary: &str) -> RawArticle {
        RawArticle {
            published: None,
            ticker: None,
            title: title.to_string(),
            summary: summary.to_string(),
            link: format!("https://news.example.com/{}", title.len()),
            source: "test".to_string(),
        }
    }

    fn pipeline(tickers: &[&str], dynamic: &[(&str, &[&str])]) -> FeedPipeline {
        let tickers: Vec<String> = tickers.iter().map(ToString::to_string).collect();
        let dynamic: HashMap<String, Vec<String>> = dynamic
            .iter()
            .map(|(t, a)| ((*t).to_string(), a.iter().map(ToString::to_string).collect()))
            .collect();
        let aliases = merge_aliases(&tickers, &UserAliases::default(), &dynamic);
        let headlines = YahooHeadlines::with_base_url(reqwest::Client::new(), "http://127.0.0.1:9");
        FeedPipeline::new(headlines, aliases)
    }

    fn tickers(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn backend_names_resolve() {
        assert_eq!(ScoringBackend::from_name("lexicon"), Some(ScoringBackend::Lexicon));
        assert_eq!(ScoringBackend::from_name(" Keyword "), Some(ScoringBackend::Keyword));
        assert_eq!(ScoringBackend::from_name("finbert"), None);
    }

    #[test]
    fn maps_on_whole_word_alias_only() {
        let p = pipeline(&["AAPL"], &[("AAPL", &["Apple"])]);
        let mapped = p
            .map_to_tickers(
                vec![
                    raw("Apple beats estimates", ""),
                    raw("Pineapple prices rise", ""),
                    raw("Markets wrap", "shares of apple rose"),
                ],
                &tickers(&["AAPL"]),
            )
            .unwrap();
        assert_eq!(mapped.len(), 2);
        assert!(mapped.iter().all(|a| a.ticker.as_deref() == Some("AAPL")));
        assert_eq!(mapped[1].title, "Markets wrap");
    }

    #[test]
    fn article_matching_two_tickers_is_emitted_twice() {
        let p = pipeline(
            &["MSFT", "NVDA"],
            &[("MSFT", &["Microsoft"]), ("NVDA", &["Nvidia"])],
        );
        let mapped = p
            .map_to_tickers(
                vec![raw("Microsoft and Nvidia expand AI partnership", "")],
                &tickers(&["MSFT", "NVDA"]),
            )
            .unwrap();
        let owners: Vec<_> = mapped.iter().filter_map(|a| a.ticker.as_deref()).collect();
        assert_eq!(owners, vec!["MSFT", "NVDA"]);
    }

    #[test]
    fn alias_metacharacters_are_literal() {
        let p = pipeline(&["BRK.B"], &[]);
        let mapped = p
            .map_to_tickers(
                vec![raw("BRK.B holds steady", ""), raw("BRKXB is not a ticker", "")],
                &tickers(&["BRK.B"]),
            )
            .unwrap();
        assert_eq!(mapped.len(), 1);
    }

    #[tokio::test]
    async fn lexicon_backend_scores_title_and_summary() {
        let p = pipeline(&["AAPL"], &[]);
        let mut article = raw("Apple update", "profit surges");
        article.ticker = Some("AAPL".to_string());
        let scored = p.score(vec![article], "lexicon").await.unwrap();
        let sentiment = scored[0].sentiment.unwrap();
        assert!(sentiment > 0.0, "got {sentiment}");
    }

    #[tokio::test]
    async fn lexicon_backend_leaves_unmatched_text_unscored() {
        let p = pipeline(&["YPF"], &[]);
        let scored = p
            .score(vec![raw("YPF anuncia récord de producción", "")], "lexicon")
            .await
            .unwrap();
        assert_eq!(scored[0].sentiment, None);
    }

    #[tokio::test]
    async fn keyword_backend_scores_headline() {
        let p = pipeline(&["YPF"], &[]);
        let scored = p
            .score(vec![raw("YPF anuncia récord de producción", "")], "keyword")
            .await
            .unwrap();
        assert!((scored[0].sentiment.unwrap() - 0.2).abs() < 1e-12);
    }

    #[tokio::test]
    async fn unknown_backend_is_unavailable() {
        let p = pipeline(&["AAPL"], &[]);
        let err = p.score(vec![raw("x", "")], "finbert").await.unwrap_err();
        assert!(err.to_string().contains("finbert"), "got {err}");
    }
}
