use thiserror::Error;

#[derive(Debug, Error)]
pub enum MarketError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate limited fetching {symbol} (retry after {retry_after_secs}s)")]
    RateLimited {
        symbol: String,
        retry_after_secs: u64,
    },

    #[error("symbol not found: {symbol}")]
    NotFound { symbol: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("chart for {symbol} returned no result: {reason}")]
    NoData { symbol: String, reason: String },
}
