//! Google News RSS search.

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::Client;

use super::{fetch_body, rss_helpers, FeedEntry, FeedLocale, FeedSearch};
use crate::error::{NewsError, Unavailable};

const DEFAULT_BASE_URL: &str = "https://news.google.com/rss/search";

/// Google News RSS search endpoint, parameterised by locale.
pub struct GoogleNewsSearch {
    client: Client,
    base_url: String,
}

impl GoogleNewsSearch {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self::with_base_url(client, DEFAULT_BASE_URL)
    }

    /// Point the search at another endpoint (used by tests).
    #[must_use]
    pub fn with_base_url(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub(crate) fn search_url(&self, query: &str, locale: &FeedLocale) -> String {
        let enc = |v: &str| utf8_percent_encode(v, NON_ALPHANUMERIC).to_string();
        format!(
            "{}?q={}&hl={}&gl={}&ceid={}",
            self.base_url,
            enc(query),
            enc(&locale.language),
            enc(&locale.country),
            enc(&locale.edition),
        )
    }

    async fn fetch(&self, query: &str, locale: &FeedLocale) -> Result<Vec<FeedEntry>, NewsError> {
        let body = fetch_body(&self.client, &self.search_url(query, locale)).await?;
        rss_helpers::parse_feed(&body)
    }
}

#[async_trait]
impl FeedSearch for GoogleNewsSearch {
    async fn search(&self, query: &str, locale: &FeedLocale) -> Result<Vec<FeedEntry>, Unavailable> {
        self.fetch(query, locale)
            .await
            .map_err(|e| Unavailable::new("google_news", e.to_string()))
    }
}
