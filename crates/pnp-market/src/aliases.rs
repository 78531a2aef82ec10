//! Dynamic alias generation from company names.
//!
//! Names come from the chart metadata (`longName`, `shortName`). Corporate
//! suffixes are stripped and the remainder is split on separators so that
//! "Alphabet Inc." also matches "Alphabet", and "Foo - Class A" matches "Foo".

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use async_trait::async_trait;
use futures::future::join_all;
use regex::Regex;

use crate::client::YahooClient;

static CORP_SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i),?\s+(?:inc\.?|incorporated|corporation|corp\.?|company|co\.?|ltd\.?|plc|s\.?a\.?)$",
    )
    .expect("valid regex")
});

static SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[/\-–—:|]").expect("valid regex"));

/// Suggests search aliases per ticker.
#[async_trait]
pub trait AliasGenerator: Send + Sync {
    /// Aliases per ticker, `extra` appended after the generated names.
    async fn build(
        &self,
        tickers: &[String],
        extra: &HashMap<String, Vec<String>>,
    ) -> HashMap<String, Vec<String>>;
}

/// Remove trailing corporate designators, repeatedly, so "Foo Holdings Co., Ltd." loses both.
#[must_use]
pub fn strip_corp_suffix(name: &str) -> String {
    let mut current = name.trim().to_string();
    loop {
        let stripped = CORP_SUFFIX_RE.replace(&current, "").trim().to_string();
        if stripped == current || stripped.is_empty() {
            return current;
        }
        current = stripped;
    }
}

/// Candidate names in priority order: long, short, stripped long, then each
/// separator-delimited part of the stripped long name.
#[must_use]
pub fn name_variants(long_name: Option<&str>, short_name: Option<&str>) -> Vec<String> {
    let long_name = long_name.or(short_name);
    let mut out: Vec<String> = [long_name, short_name]
        .into_iter()
        .flatten()
        .map(str::to_string)
        .collect();

    if let Some(long) = long_name {
        let base = strip_corp_suffix(long);
        let parts: Vec<String> = SEPARATOR_RE
            .split(&base)
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();
        out.push(base);
        out.extend(parts);
    }
    out
}

fn dedupe(items: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && seen.insert(s.to_lowercase()))
        .collect()
}

impl YahooClient {
    async fn aliases_for(&self, ticker: &str, extra: &[String]) -> Vec<String> {
        let names = match self.fetch_chart(ticker).await {
            Ok(chart) => name_variants(chart.meta.long_name.as_deref(), chart.meta.short_name.as_deref()),
            Err(e) => {
                tracing::warn!(ticker, error = %e, "company name lookup failed");
                Vec::new()
            }
        };
        dedupe(
            names
                .into_iter()
                .chain(std::iter::once(ticker.to_string()))
                .chain(extra.iter().cloned()),
        )
    }
}

#[async_trait]
impl AliasGenerator for YahooClient {
    async fn build(
        &self,
        tickers: &[String],
        extra: &HashMap<String, Vec<String>>,
    ) -> HashMap<String, Vec<String>> {
        let lists = join_all(tickers.iter().map(|t| {
            let more = extra.get(t).map(Vec::as_slice).unwrap_or_default();
            self.aliases_for(t, more)
        }))
        .await;
        tickers.iter().cloned().zip(lists).collect()
    }
}
