//! `report` subcommand: price the portfolio, aggregate news, render.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use futures::future::join_all;
use pnp_core::{
    dedupe_keep_order, ensure_template, load_portfolio, load_user_aliases, merge_aliases,
    parse_extra_aliases, summarize, unique_tickers, AppConfig, PortfolioPosition, UserAliases,
};
use pnp_market::{AliasGenerator, PriceLookup, YahooClient};
use pnp_news::{
    http_client, Clock, FeedPipeline, GoogleNewsSearch, NewsAggregator, PrimaryNewsPipeline,
    RegionalFallbackFetcher, SystemClock, YahooHeadlines,
};

use crate::render::{render, Report};
use crate::OutputFormat;

#[derive(Debug)]
pub(crate) struct ReportOptions {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub format: OutputFormat,
    pub extra_aliases: Option<String>,
}

/// Fill `current_price` on every position from one lookup per unique ticker.
pub(crate) async fn apply_prices(
    positions: &mut [PortfolioPosition],
    tickers: &[String],
    prices: Option<&dyn PriceLookup>,
) {
    let Some(prices) = prices else {
        return;
    };
    let looked_up = join_all(tickers.iter().map(|t| prices.current_price(t))).await;
    let by_ticker: HashMap<&str, Option<f64>> = tickers
        .iter()
        .map(String::as_str)
        .zip(looked_up)
        .collect();
    for position in positions.iter_mut() {
        position.current_price = by_ticker.get(position.ticker.as_str()).copied().flatten();
    }
}

/// Dynamic aliases from the generator, or user aliases plus the ticker when
/// no generator is available.
pub(crate) async fn dynamic_aliases(
    tickers: &[String],
    user: &UserAliases,
    generator: Option<&dyn AliasGenerator>,
) -> HashMap<String, Vec<String>> {
    if let Some(generator) = generator {
        return generator.build(tickers, &user.to_lists()).await;
    }
    tickers
        .iter()
        .map(|t| {
            let from_user: Vec<&str> = user.get(t).map(|v| v.values()).unwrap_or_default();
            let combined = from_user.into_iter().chain(std::iter::once(t.as_str()));
            (t.clone(), dedupe_keep_order(combined))
        })
        .collect()
}

pub(crate) async fn run_report(config: &AppConfig, options: &ReportOptions) -> anyhow::Result<()> {
    if ensure_template(&options.input)
        .with_context(|| format!("failed to create template {}", options.input.display()))?
    {
        tracing::info!(path = %options.input.display(), "portfolio input missing; wrote template");
    }

    let mut positions = load_portfolio(&options.input)?;
    let tickers = unique_tickers(&positions);
    tracing::info!(positions = positions.len(), tickers = tickers.len(), "portfolio loaded");

    let market = match YahooClient::new(
        config.http_timeout_secs,
        &config.user_agent,
        config.max_retries,
        config.retry_backoff_base_secs,
    ) {
        Ok(client) => Some(client),
        Err(e) => {
            tracing::warn!(error = %e, "market data client unavailable");
            None
        }
    };

    apply_prices(
        &mut positions,
        &tickers,
        market.as_ref().map(|m| m as &dyn PriceLookup),
    )
    .await;

    let mut user = load_user_aliases(&config.aliases_path);
    if let Some(expr) = &options.extra_aliases {
        user.merge_extra(parse_extra_aliases(expr));
    }
    let dynamic = dynamic_aliases(
        &tickers,
        &user,
        market.as_ref().map(|m| m as &dyn AliasGenerator),
    )
    .await;
    let alias_set = merge_aliases(&tickers, &user, &dynamic);

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let aggregator = build_aggregator(config, alias_set.clone(), Arc::clone(&clock));
    let articles = aggregator
        .aggregate(&tickers, &alias_set, &config.news_backend, config.news_days)
        .await;

    let summary = summarize(&positions, &articles);
    let report = Report {
        generated_at: clock.now(),
        news_days: config.news_days,
        tickers: &tickers,
        summary: &summary,
        news: &articles,
    };
    let rendered = render(&report, options.format)?;

    match &options.output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("failed to write report {}", path.display()))?;
            tracing::info!(path = %path.display(), "wrote report");
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

fn build_aggregator(
    config: &AppConfig,
    aliases: pnp_core::AliasSet,
    clock: Arc<dyn Clock>,
) -> NewsAggregator {
    let client = match http_client(config.http_timeout_secs, &config.user_agent) {
        Ok(client) => Some(client),
        Err(e) => {
            tracing::warn!(error = %e, "news HTTP client unavailable");
            None
        }
    };

    let primary: Option<Arc<dyn PrimaryNewsPipeline>> = client.clone().map(|c| {
        Arc::new(FeedPipeline::new(YahooHeadlines::new(c), aliases)) as Arc<dyn PrimaryNewsPipeline>
    });

    let regional = client.filter(|_| config.regional_fallback).map(|c| {
        RegionalFallbackFetcher::new(
            Arc::new(GoogleNewsSearch::new(c)),
            config.region.clone(),
            Arc::clone(&clock),
        )
    });

    NewsAggregator::new(primary, regional, clock).with_regional_max_items(config.regional_max_items)
}
