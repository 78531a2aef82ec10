//! Report rendering: markdown tables or a JSON document.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use pnp_core::{ArticleSet, PortfolioSummary};
use serde::Serialize;

use crate::OutputFormat;

/// Everything one report shows.
#[derive(Debug, Serialize)]
pub(crate) struct Report<'a> {
    pub generated_at: DateTime<Utc>,
    pub news_days: u32,
    #[serde(skip)]
    pub tickers: &'a [String],
    pub summary: &'a PortfolioSummary,
    pub news: &'a ArticleSet,
}

pub(crate) fn render(report: &Report<'_>, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Markdown => Ok(render_markdown(report)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)? + "\n"),
    }
}

fn fmt_money(value: Option<f64>) -> String {
    value.map_or_else(String::new, |v| format!("{v:.2}"))
}

fn fmt_pct(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.2}%", v * 100.0),
        Some(_) => "n/a".to_string(),
        None => String::new(),
    }
}

fn fmt_sentiment(value: Option<f64>) -> String {
    value.map_or_else(String::new, |v| format!("{v:.3}"))
}

fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

pub(crate) fn render_markdown(report: &Report<'_>) -> String {
    let mut out = String::new();
    let generated = report.generated_at.format("%Y-%m-%d %H:%M UTC");

    // Writing to a String cannot fail.
    let _ = writeln!(out, "# Portfolio News Report");
    let _ = writeln!(out);
    let _ = writeln!(out, "**Generated**: {generated}");
    let _ = writeln!(out, "**News window**: {} days", report.news_days);
    let _ = writeln!(out, "**Articles**: {}", report.news.len());
    let _ = writeln!(out);
    let _ = writeln!(out, "## Summary");
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "| Ticker | Buy Price | Buy Date | Shares | Current Price | P/L Abs | P/L % | Avg Sentiment |"
    );
    let _ = writeln!(out, "|---|---|---|---|---|---|---|---|");

    for row in &report.summary.rows {
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} | {} | {} | {} | {} |",
            cell(&row.ticker),
            fmt_money(row.buy_price),
            cell(&row.buy_date),
            row.shares,
            fmt_money(row.current_price),
            fmt_money(row.pl_abs),
            fmt_pct(row.pl_pct),
            fmt_sentiment(row.avg_sentiment),
        );
    }

    let total = &report.summary.total;
    let _ = writeln!(
        out,
        "| **{}** | {} |  | {} | {} | {} | {} |  |",
        total.ticker,
        fmt_money(Some(total.cost_basis)),
        total.shares,
        fmt_money(Some(total.current_value)),
        fmt_money(Some(total.pl_abs)),
        fmt_pct(Some(total.pl_pct)),
    );

    for ticker in report.tickers {
        let _ = writeln!(out);
        let _ = writeln!(out, "## News - {ticker}");
        let _ = writeln!(out);

        let articles = report.news.newest_first(ticker);
        if articles.is_empty() {
            let _ = writeln!(out, "_No articles in the window._");
            continue;
        }

        let _ = writeln!(out, "| Date | Source | Title | Link | Sentiment |");
        let _ = writeln!(out, "|---|---|---|---|---|");
        for article in articles {
            let date = article
                .published
                .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default();
            let _ = writeln!(
                out,
                "| {date} | {} | {} | {} | {:.3} |",
                cell(&article.source),
                cell(&article.title),
                cell(&article.link),
                article.sentiment,
            );
        }
    }

    out
}
