//! Wire types for the Yahoo Finance v8 chart endpoint.
//!
//! Only the fields the price and alias collaborators read are modelled;
//! everything else in the payload is ignored.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ChartResponse {
    pub chart: ChartEnvelope,
}

#[derive(Debug, Deserialize)]
pub struct ChartEnvelope {
    #[serde(default)]
    pub result: Option<Vec<ChartResult>>,
    #[serde(default)]
    pub error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
pub struct ChartError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartResult {
    pub meta: ChartMeta,
    #[serde(default)]
    pub indicators: Option<Indicators>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub regular_market_price: Option<f64>,
    #[serde(default)]
    pub long_name: Option<String>,
    #[serde(default)]
    pub short_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<Quote>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Quote {
    /// Daily closes; `null` for sessions without a print.
    #[serde(default)]
    pub close: Vec<Option<f64>>,
}

impl ChartResult {
    /// Most recent non-null close in the returned range.
    #[must_use]
    pub fn last_close(&self) -> Option<f64> {
        self.indicators
            .as_ref()?
            .quote
            .first()?
            .close
            .iter()
            .rev()
            .find_map(|c| *c)
    }
}
