//! Retry with exponential backoff for market-data requests.
//!
//! Only throttling (HTTP 429) and network-level failures are retried. A
//! missing symbol or an unparseable payload will not change on a second try.

use std::future::Future;
use std::time::Duration;

use crate::error::MarketError;

fn is_retriable(err: &MarketError) -> bool {
    matches!(err, MarketError::RateLimited { .. } | MarketError::Http(_))
}

/// Run `operation`, retrying transient failures up to `max_retries` times.
///
/// The wait before retry `n` (1-based) is `backoff_base_secs * 2^(n-1)`
/// seconds. After the last attempt the final error is returned.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, MarketError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, MarketError>>,
{
    let mut attempt = 0u32;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if !is_retriable(&err) || attempt >= max_retries => return Err(err),
            Err(err) => err,
        };

        let delay_secs = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
        tracing::warn!(
            attempt,
            max_retries,
            delay_secs,
            error = %err,
            "transient market data error, retrying after backoff"
        );
        tokio::time::sleep(Duration::from_secs(delay_secs)).await;
        attempt += 1;
    }
}
