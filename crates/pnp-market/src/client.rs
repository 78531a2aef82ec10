//! HTTP client for the Yahoo Finance v8 chart endpoint.

use std::time::Duration;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::Client;

use crate::error::MarketError;
use crate::rate_limit::retry_with_backoff;
use crate::types::{ChartResponse, ChartResult};

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Yahoo Finance chart client.
///
/// Throttling (429) and network failures are retried with exponential
/// backoff up to `max_retries` additional attempts.
pub struct YahooClient {
    client: Client,
    base_url: String,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl YahooClient {
    /// Build a client with the given timeout, `User-Agent` and retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, MarketError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            max_retries,
            backoff_base_secs,
        })
    }

    /// Point the client at another host (used by tests).
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub(crate) fn chart_url(&self, symbol: &str) -> String {
        let encoded = utf8_percent_encode(symbol, NON_ALPHANUMERIC);
        format!(
            "{}/v8/finance/chart/{encoded}?range=5d&interval=1d",
            self.base_url
        )
    }

    /// Fetch the five-day daily chart for `symbol`.
    ///
    /// # Errors
    ///
    /// - [`MarketError::RateLimited`]: HTTP 429 after all retries.
    /// - [`MarketError::NotFound`]: HTTP 404 (not retried).
    /// - [`MarketError::UnexpectedStatus`]: any other non-2xx status.
    /// - [`MarketError::Http`]: network failure after all retries.
    /// - [`MarketError::Deserialize`]: body is not a chart payload.
    /// - [`MarketError::NoData`]: payload carries an error or no result.
    pub async fn fetch_chart(&self, symbol: &str) -> Result<ChartResult, MarketError> {
        let url = self.chart_url(symbol);

        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.clone();
            async move {
                let response = self
                    .client
                    .get(&url)
                    .header(reqwest::header::ACCEPT, "application/json")
                    .send()
                    .await?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(60);
                    return Err(MarketError::RateLimited {
                        symbol: symbol.to_owned(),
                        retry_after_secs,
                    });
                }

                if status == reqwest::StatusCode::NOT_FOUND {
                    return Err(MarketError::NotFound {
                        symbol: symbol.to_owned(),
                    });
                }

                if !status.is_success() {
                    return Err(MarketError::UnexpectedStatus {
                        status: status.as_u16(),
                        url,
                    });
                }

                let body = response.text().await?;
                let parsed = serde_json::from_str::<ChartResponse>(&body).map_err(|e| {
                    MarketError::Deserialize {
                        context: format!("chart for {symbol}"),
                        source: e,
                    }
                })?;

                first_result(symbol, parsed)
            }
        })
        .await
    }
}

fn first_result(symbol: &str, response: ChartResponse) -> Result<ChartResult, MarketError> {
    if let Some(err) = response.chart.error {
        let reason = err
            .description
            .or(err.code)
            .unwrap_or_else(|| "unknown error".to_string());
        return Err(MarketError::NoData {
            symbol: symbol.to_owned(),
            reason,
        });
    }
    response
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| MarketError::NoData {
            symbol: symbol.to_owned(),
            reason: "empty result".to_string(),
        })
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
