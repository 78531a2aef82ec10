//! Current price lookup.

use async_trait::async_trait;

use crate::client::YahooClient;
use crate::types::ChartResult;

/// Latest price for a ticker. `None` means "unavailable", never an error.
#[async_trait]
pub trait PriceLookup: Send + Sync {
    async fn current_price(&self, ticker: &str) -> Option<f64>;
}

/// `regularMarketPrice`, else the last close of the range. Zero, negative
/// and non-finite values count as missing.
#[must_use]
pub fn chart_price(chart: &ChartResult) -> Option<f64> {
    let valid = |p: f64| p.is_finite() && p > 0.0;
    chart
        .meta
        .regular_market_price
        .filter(|p| valid(*p))
        .or_else(|| chart.last_close().filter(|p| valid(*p)))
}

#[async_trait]
impl PriceLookup for YahooClient {
    async fn current_price(&self, ticker: &str) -> Option<f64> {
        match self.fetch_chart(ticker).await {
            Ok(chart) => {
                let price = chart_price(&chart);
                if price.is_none() {
                    tracing::warn!(ticker, "chart carried no usable price");
                }
                price
            }
            Err(e) => {
                tracing::warn!(ticker, error = %e, "price lookup failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart(json: &str) -> ChartResult {
        serde_json::from_str(json).expect("valid chart result")
    }

    #[test]
    fn market_price_wins_over_close() {
        let c = chart(
            r#"{"meta":{"regularMarketPrice":227.5},"indicators":{"quote":[{"close":[220.0,225.0]}]}}"#,
        );
        assert_eq!(chart_price(&c), Some(227.5));
    }

    #[test]
    fn falls_back_to_last_close() {
        let c = chart(r#"{"meta":{},"indicators":{"quote":[{"close":[20.0,null,21.5,null]}]}}"#);
        assert_eq!(chart_price(&c), Some(21.5));
    }

    #[test]
    fn non_positive_market_price_uses_close() {
        let c = chart(r#"{"meta":{"regularMarketPrice":0.0},"indicators":{"quote":[{"close":[12.0]}]}}"#);
        assert_eq!(chart_price(&c), Some(12.0));
    }

    #[test]
    fn nothing_usable_is_none() {
        let c = chart(r#"{"meta":{"regularMarketPrice":-1.0},"indicators":{"quote":[{"close":[null]}]}}"#);
        assert_eq!(chart_price(&c), None);
        assert_eq!(chart_price(&chart(r#"{"meta":{}}"#)), None);
    }
}
