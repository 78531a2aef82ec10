//! Yahoo Finance per-ticker headline RSS.

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::Client;

use super::{fetch_body, rss_helpers, FeedEntry};
use crate::error::NewsError;

const DEFAULT_BASE_URL: &str = "https://feeds.finance.yahoo.com/rss/2.0/headline";

pub struct YahooHeadlines {
    client: Client,
    base_url: String,
}

impl YahooHeadlines {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self::with_base_url(client, DEFAULT_BASE_URL)
    }

    #[must_use]
    pub fn with_base_url(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch up to `max_items` headlines for one ticker.
    ///
    /// # Errors
    ///
    /// Returns [`NewsError`] on network failure, non-2xx status, or malformed XML.
    pub async fn fetch_ticker(&self, ticker: &str, max_items: usize) -> Result<Vec<FeedEntry>, NewsError> {
        let encoded = utf8_percent_encode(ticker, NON_ALPHANUMERIC).to_string();
        let url = format!("{}?s={encoded}&region=US&lang=en-US", self.base_url);

        let body = fetch_body(&self.client, &url).await?;
        if !body.contains("<rss") && !body.contains("<feed") {
            return Ok(Vec::new());
        }
        let mut entries = rss_helpers::parse_feed(&body)?;
        entries.truncate(max_items);
        Ok(entries)
    }
}
