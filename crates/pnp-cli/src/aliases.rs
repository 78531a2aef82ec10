//! `aliases` subcommand: write generated aliases for a ticker list as JSON.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use pnp_core::{dedupe_keep_order, parse_extra_aliases, AppConfig};
use pnp_market::{AliasGenerator, YahooClient};

pub(crate) const DEFAULT_TICKERS: [&str; 9] = [
    "EXC", "XEL", "AEP", "CEG", "MSFT", "GOOG", "AAPL", "AMZN", "NVDA",
];

/// Ticker list for the run: explicit tickers win, then the ticker file,
/// then the built-in defaults. Blank lines and `#` comments are skipped.
pub(crate) fn resolve_tickers(explicit: Vec<String>, file_content: Option<&str>) -> Vec<String> {
    let raw: Vec<String> = match file_content {
        _ if !explicit.is_empty() => explicit,
        Some(content) => content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .map(str::to_string)
            .collect(),
        None => DEFAULT_TICKERS.iter().map(ToString::to_string).collect(),
    };
    dedupe_keep_order(raw.iter().map(|t| t.to_uppercase()))
}

pub(crate) async fn run_aliases(
    config: &AppConfig,
    tickers: Vec<String>,
    from_file: Option<&Path>,
    extra_aliases: Option<&str>,
    output: &Path,
) -> anyhow::Result<()> {
    let file_content = from_file
        .map(|path| {
            std::fs::read_to_string(path)
                .with_context(|| format!("failed to read ticker file {}", path.display()))
        })
        .transpose()?;
    let tickers = resolve_tickers(tickers, file_content.as_deref());
    let extra = extra_aliases.map(parse_extra_aliases).unwrap_or_default();

    let client = YahooClient::new(
        config.http_timeout_secs,
        &config.user_agent,
        config.max_retries,
        config.retry_backoff_base_secs,
    )
    .context("failed to build market data client")?;

    let generated = client.build(&tickers, &extra).await;
    let ordered: BTreeMap<_, _> = generated.into_iter().collect();
    let json = serde_json::to_string_pretty(&ordered)?;
    std::fs::write(output, json + "\n")
        .with_context(|| format!("failed to write {}", output.display()))?;

    tracing::info!(
        tickers = ordered.len(),
        path = %output.display(),
        "wrote alias file"
    );
    Ok(())
}
