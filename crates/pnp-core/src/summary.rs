//! Per-position profit/loss joined with news sentiment, plus a portfolio TOTAL.

use serde::Serialize;

use crate::article::ArticleSet;
use crate::portfolio::PortfolioPosition;

/// Ticker label of the synthetic portfolio row.
pub const TOTAL_LABEL: &str = "TOTAL";

/// One summary line per portfolio position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub ticker: String,
    pub buy_price: Option<f64>,
    pub buy_date: String,
    pub shares: u64,
    pub current_price: Option<f64>,
    /// `(current - buy) * shares`; `None` if either price is missing.
    pub pl_abs: Option<f64>,
    /// `(current - buy) / buy` as a fraction. Non-finite when the buy price is zero.
    pub pl_pct: Option<f64>,
    /// Mean article sentiment; `None` when the ticker has no coverage.
    pub avg_sentiment: Option<f64>,
}

/// Portfolio-wide rollup, rendered last in the summary.
///
/// The buy-price and current-price columns carry the total cost basis and the
/// total current value respectively. There is no portfolio-wide sentiment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TotalRow {
    pub ticker: &'static str,
    pub cost_basis: f64,
    pub shares: u64,
    pub current_value: f64,
    pub pl_abs: f64,
    pub pl_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioSummary {
    pub rows: Vec<SummaryRow>,
    pub total: TotalRow,
}

#[allow(clippy::cast_precision_loss)]
fn shares_f64(shares: u64) -> f64 {
    shares as f64
}

fn summary_row(position: &PortfolioPosition, articles: &ArticleSet) -> SummaryRow {
    let (pl_abs, pl_pct) = match (position.buy_price, position.current_price) {
        (Some(buy), Some(current)) => {
            let diff = current - buy;
            (Some(diff * shares_f64(position.shares)), Some(diff / buy))
        }
        _ => (None, None),
    };

    SummaryRow {
        ticker: position.ticker.clone(),
        buy_price: position.buy_price,
        buy_date: position.buy_date.clone(),
        shares: position.shares,
        current_price: position.current_price,
        pl_abs,
        pl_pct,
        avg_sentiment: articles.mean_sentiment(&position.ticker),
    }
}

fn total_row(positions: &[PortfolioPosition], rows: &[SummaryRow]) -> TotalRow {
    // Folding from +0.0 keeps empty totals from rendering as -0.00.
    let cost_basis = positions
        .iter()
        .filter_map(|p| p.buy_price.map(|b| b * shares_f64(p.shares)))
        .fold(0.0_f64, |acc, x| acc + x);
    let current_value = positions
        .iter()
        .filter_map(|p| p.current_price.map(|c| c * shares_f64(p.shares)))
        .fold(0.0_f64, |acc, x| acc + x);
    let pl_abs = rows
        .iter()
        .filter_map(|r| r.pl_abs)
        .fold(0.0_f64, |acc, x| acc + x);
    let shares = positions
        .iter()
        .fold(0_u64, |acc, p| acc.saturating_add(p.shares));

    let pl_pct = if cost_basis == 0.0 {
        0.0
    } else {
        (current_value - cost_basis) / cost_basis
    };

    TotalRow {
        ticker: TOTAL_LABEL,
        cost_basis,
        shares,
        current_value,
        pl_abs,
        pl_pct,
    }
}

/// Build one [`SummaryRow`] per position, in input order, and the [`TotalRow`].
///
/// A zero buy price yields a non-finite `pl_pct` on that row rather than a
/// substituted value; the total guards its own division.
#[must_use]
pub fn summarize(positions: &[PortfolioPosition], articles: &ArticleSet) -> PortfolioSummary {
    let rows: Vec<SummaryRow> = positions
        .iter()
        .map(|p| summary_row(p, articles))
        .collect();
    let total = total_row(positions, &rows);
    PortfolioSummary { rows, total }
}

#[cfg(test)]
mod tests {
    use crate::article::NewsArticle;

    use super::*;

    fn position(ticker: &str, buy: Option<f64>, shares: u64, current: Option<f64>) -> PortfolioPosition {
        PortfolioPosition {
            ticker: ticker.to_string(),
            buy_price: buy,
            buy_date: "2024-01-02".to_string(),
            shares,
            current_price: current,
        }
    }

    fn scored(ticker: &str, sentiment: f64) -> NewsArticle {
        NewsArticle {
            published: None,
            ticker: ticker.to_string(),
            title: "headline".to_string(),
            summary: String::new(),
            link: "https://news.example.com/a".to_string(),
            source: "test".to_string(),
            sentiment,
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn single_position_without_news() {
        let summary = summarize(
            &[position("AAPL", Some(100.0), 10, Some(120.0))],
            &ArticleSet::default(),
        );
        let row = &summary.rows[0];
        assert!(approx(row.pl_abs.unwrap(), 200.0));
        assert!(approx(row.pl_pct.unwrap(), 0.20));
        assert_eq!(row.avg_sentiment, None);

        let total = &summary.total;
        assert_eq!(total.ticker, "TOTAL");
        assert!(approx(total.cost_basis, 1000.0));
        assert!(approx(total.current_value, 1200.0));
        assert!(approx(total.pl_abs, 200.0));
        assert!(approx(total.pl_pct, 0.20));
        assert_eq!(total.shares, 10);
    }

    #[test]
    fn empty_portfolio_totals_are_positive_zero() {
        let summary = summarize(&[], &ArticleSet::default());
        let total = &summary.total;
        assert!(summary.rows.is_empty());
        assert!(total.cost_basis.is_sign_positive());
        assert!(total.current_value.is_sign_positive());
        assert!(total.pl_abs.is_sign_positive());
        assert!(total.pl_pct.is_sign_positive());
        assert_eq!(format!("{:.2}", total.cost_basis), "0.00");
    }

    #[test]
    fn unpriced_portfolio_totals_are_positive_zero() {
        let summary = summarize(&[position("AAPL", None, 3, None)], &ArticleSet::default());
        assert!(summary.total.cost_basis.is_sign_positive());
        assert!(summary.total.current_value.is_sign_positive());
        assert!(summary.total.pl_abs.is_sign_positive());
    }

    #[test]
    fn zero_buy_price_propagates_non_finite_pct() {
        let summary = summarize(
            &[position("ZERO", Some(0.0), 5, Some(50.0))],
            &ArticleSet::default(),
        );
        let row = &summary.rows[0];
        assert!(approx(row.pl_abs.unwrap(), 250.0));
        assert!(!row.pl_pct.unwrap().is_finite());
        assert!(approx(summary.total.pl_pct, 0.0));
    }

    #[test]
    fn missing_prices_leave_pl_absent() {
        let summary = summarize(
            &[
                position("NOBUY", None, 5, Some(50.0)),
                position("NOCUR", Some(10.0), 5, None),
            ],
            &ArticleSet::default(),
        );
        assert!(summary.rows.iter().all(|r| r.pl_abs.is_none() && r.pl_pct.is_none()));
        assert!(approx(summary.total.cost_basis, 50.0));
        assert!(approx(summary.total.current_value, 250.0));
        assert!(approx(summary.total.pl_abs, 0.0));
        assert!(approx(summary.total.pl_pct, 4.0));
    }

    #[test]
    fn total_is_independent_of_row_order() {
        let a = position("AAPL", Some(100.0), 10, Some(120.0));
        let b = position("MSFT", Some(250.0), 4, Some(200.0));
        let c = position("NVDA", None, 3, Some(90.0));

        let forward = summarize(&[a.clone(), b.clone(), c.clone()], &ArticleSet::default());
        let reverse = summarize(&[c, b, a], &ArticleSet::default());

        assert!(approx(forward.total.cost_basis, 2000.0));
        assert_eq!(forward.total, reverse.total);
    }

    #[test]
    fn empty_portfolio_has_zeroed_total() {
        let summary = summarize(&[], &ArticleSet::default());
        assert!(summary.rows.is_empty());
        assert!(approx(summary.total.cost_basis, 0.0));
        assert!(approx(summary.total.pl_pct, 0.0));
        assert_eq!(summary.total.shares, 0);
    }

    #[test]
    fn duplicate_tickers_share_sentiment() {
        let articles = ArticleSet::new(vec![scored("YPF", 0.2), scored("YPF", 0.4)]);
        let summary = summarize(
            &[
                position("YPF", Some(10.0), 5, Some(12.0)),
                position("YPF", Some(11.0), 8, Some(12.0)),
            ],
            &articles,
        );
        assert_eq!(summary.rows.len(), 2);
        assert_eq!(summary.rows[0].avg_sentiment, summary.rows[1].avg_sentiment);
        assert!(approx(summary.rows[0].avg_sentiment.unwrap(), 0.3));
        assert_eq!(summary.rows[0].shares, 5);
        assert_eq!(summary.rows[1].shares, 8);
        assert_eq!(summary.total.shares, 13);
    }
}
