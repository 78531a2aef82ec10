//! Feed sources and the regional search contract.

mod google_news;
pub(crate) mod rss_helpers;
mod yahoo_rss;

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pnp_core::RegionConfig;
use reqwest::Client;

use crate::error::{NewsError, Unavailable};

pub use google_news::GoogleNewsSearch;
pub use yahoo_rss::YahooHeadlines;

/// One parsed feed entry, before it is attributed to a ticker.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedEntry {
    pub title: String,
    pub link: String,
    pub summary: String,
    /// Published date, falling back to the updated date. `None` if unparseable.
    pub published: Option<DateTime<Utc>>,
    pub source: Option<String>,
}

/// Locale parameters of a feed search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedLocale {
    pub language: String,
    pub country: String,
    pub edition: String,
}

impl From<&RegionConfig> for FeedLocale {
    fn from(region: &RegionConfig) -> Self {
        Self {
            language: region.language.clone(),
            country: region.country.clone(),
            edition: region.edition(),
        }
    }
}

/// Keyword search over a news feed service.
#[async_trait]
pub trait FeedSearch: Send + Sync {
    /// Run `query` and return the parsed entries in feed order.
    async fn search(&self, query: &str, locale: &FeedLocale) -> Result<Vec<FeedEntry>, Unavailable>;
}

/// Build the shared HTTP client with the configured timeout and `User-Agent`.
///
/// # Errors
///
/// Returns [`NewsError::Http`] if the client cannot be constructed.
pub fn http_client(timeout_secs: u64, user_agent: &str) -> Result<Client, NewsError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(user_agent)
        .build()?;
    Ok(client)
}

/// GET `url` and return the body, treating non-2xx as an error.
pub(crate) async fn fetch_body(client: &Client, url: &str) -> Result<String, NewsError> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(NewsError::UnexpectedStatus {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }
    Ok(response.text().await?)
}
