//! Portfolio input: one position per CSV row.
//!
//! Header cells are matched case-insensitively against a small synonym table
//! so spreadsheets exported with `Symbol`/`Qty`/`Entry Price` still load. All
//! four canonical columns are mandatory; a missing one aborts the run.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

pub const TICKER_COLUMN: &str = "Ticker";
pub const BUY_PRICE_COLUMN: &str = "Buy Price";
pub const BUY_DATE_COLUMN: &str = "Buy Date";
pub const SHARES_COLUMN: &str = "Shares";

/// Canonical header row, in template order.
pub const TEMPLATE_HEADERS: [&str; 4] =
    [TICKER_COLUMN, BUY_PRICE_COLUMN, BUY_DATE_COLUMN, SHARES_COLUMN];

#[derive(Debug, Error)]
pub enum PortfolioError {
    #[error("failed to access portfolio file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column: {0}")]
    MissingColumn(&'static str),
}

/// One holding as read from the portfolio input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioPosition {
    pub ticker: String,
    /// `None` when the cell was empty or not a number.
    pub buy_price: Option<f64>,
    /// Kept verbatim; never computed on.
    pub buy_date: String,
    pub shares: u64,
    /// Filled in after price lookup; `None` when unavailable.
    pub current_price: Option<f64>,
}

fn canonical_column(header: &str) -> Option<&'static str> {
    match header.trim().to_lowercase().as_str() {
        "ticker" | "symbol" => Some(TICKER_COLUMN),
        "buy price" | "buyprice" | "price" | "entry price" => Some(BUY_PRICE_COLUMN),
        "buy date" | "date" | "entry date" => Some(BUY_DATE_COLUMN),
        "shares" | "qty" | "amounts of share" | "amounts of shares" | "quantity" => {
            Some(SHARES_COLUMN)
        }
        _ => None,
    }
}

fn parse_price(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| !matches!(c, '$' | ',')).collect();
    cleaned.trim().parse::<f64>().ok().filter(|p| p.is_finite())
}

/// Shares coerce to zero when missing, unparseable, negative or non-finite.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn parse_shares(raw: &str) -> u64 {
    let cleaned: String = raw.chars().filter(|c| *c != ',').collect();
    match cleaned.trim().parse::<f64>() {
        Ok(n) if n.is_finite() && n >= 0.0 => n.trunc() as u64,
        _ => 0,
    }
}

/// Parse portfolio CSV content.
///
/// # Errors
///
/// Returns [`PortfolioError::MissingColumn`] naming the first absent mandatory
/// column, or [`PortfolioError::Csv`] if the CSV itself is unreadable.
pub fn parse_portfolio<R: Read>(reader: R) -> Result<Vec<PortfolioPosition>, PortfolioError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let column_index = |name: &'static str| -> Result<usize, PortfolioError> {
        headers
            .iter()
            .position(|h| canonical_column(h) == Some(name))
            .ok_or(PortfolioError::MissingColumn(name))
    };

    let ticker_idx = column_index(TICKER_COLUMN)?;
    let buy_price_idx = column_index(BUY_PRICE_COLUMN)?;
    let buy_date_idx = column_index(BUY_DATE_COLUMN)?;
    let shares_idx = column_index(SHARES_COLUMN)?;

    let mut positions = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let cell = |idx: usize| record.get(idx).unwrap_or("");

        let ticker = cell(ticker_idx).trim().to_uppercase();
        if ticker.is_empty() {
            continue;
        }

        positions.push(PortfolioPosition {
            ticker,
            buy_price: parse_price(cell(buy_price_idx)),
            buy_date: cell(buy_date_idx).to_string(),
            shares: parse_shares(cell(shares_idx)),
            current_price: None,
        });
    }

    Ok(positions)
}

/// Load the portfolio CSV at `path`.
///
/// # Errors
///
/// Returns [`PortfolioError::Io`] if the file cannot be opened, otherwise
/// see [`parse_portfolio`].
pub fn load_portfolio(path: &Path) -> Result<Vec<PortfolioPosition>, PortfolioError> {
    let file = std::fs::File::open(path).map_err(|e| PortfolioError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_portfolio(file)
}

/// Write a header-only template if `path` does not exist yet.
///
/// Returns `true` when a template was created.
///
/// # Errors
///
/// Returns [`PortfolioError`] if the template cannot be written.
pub fn ensure_template(path: &Path) -> Result<bool, PortfolioError> {
    if path.exists() {
        return Ok(false);
    }
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(TEMPLATE_HEADERS)?;
    writer.flush().map_err(|e| PortfolioError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    tracing::info!(path = %path.display(), "created portfolio template");
    Ok(true)
}

/// Distinct tickers in first-seen order.
#[must_use]
pub fn unique_tickers(positions: &[PortfolioPosition]) -> Vec<String> {
    let mut seen = HashSet::new();
    positions
        .iter()
        .filter(|p| seen.insert(p.ticker.as_str()))
        .map(|p| p.ticker.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_headers() {
        let csv = "Ticker,Buy Price,Buy Date,Shares\naapl,100,2024-01-02,10\n";
        let positions = parse_portfolio(csv.as_bytes()).unwrap();
        assert_eq!(
            positions,
            vec![PortfolioPosition {
                ticker: "AAPL".to_string(),
                buy_price: Some(100.0),
                buy_date: "2024-01-02".to_string(),
                shares: 10,
                current_price: None,
            }]
        );
    }

    #[test]
    fn header_synonyms_are_normalized() {
        let csv = "Symbol , Entry Price,DATE,Qty\nMSFT,\"$1,250.50\",2023-05-01,3\n";
        let positions = parse_portfolio(csv.as_bytes()).unwrap();
        assert_eq!(positions[0].ticker, "MSFT");
        assert_eq!(positions[0].buy_price, Some(1250.5));
        assert_eq!(positions[0].shares, 3);
    }

    #[test]
    fn missing_column_is_fatal_and_named() {
        let csv = "Ticker,Buy Price,Shares\nAAPL,100,10\n";
        let err = parse_portfolio(csv.as_bytes()).unwrap_err();
        assert!(
            matches!(err, PortfolioError::MissingColumn(BUY_DATE_COLUMN)),
            "unexpected error: {err}"
        );
        assert_eq!(err.to_string(), "missing required column: Buy Date");
    }

    #[test]
    fn blank_tickers_are_dropped() {
        let csv = "Ticker,Buy Price,Buy Date,Shares\n  ,100,,1\nYPF,20,,5\n";
        let positions = parse_portfolio(csv.as_bytes()).unwrap();
        assert_eq!(positions.len(), 1);
        assert_eq!(positions[0].ticker, "YPF");
    }

    #[test]
    fn unparseable_values_coerce() {
        let csv = "Ticker,Buy Price,Buy Date,Shares\nAAPL,n/a,,lots\nMSFT,10,,-4\nNVDA,10,,7.9\nGOOG,10\n";
        let positions = parse_portfolio(csv.as_bytes()).unwrap();
        assert_eq!(positions[0].buy_price, None);
        assert_eq!(positions[0].shares, 0);
        assert_eq!(positions[1].shares, 0);
        assert_eq!(positions[2].shares, 7);
        assert_eq!(positions[3].shares, 0);
        assert_eq!(positions[3].buy_date, "");
    }

    #[test]
    fn unique_tickers_keeps_first_seen_order() {
        let csv = "Ticker,Buy Price,Buy Date,Shares\nYPF,1,,1\nAAPL,1,,1\nypf,1,,2\n";
        let positions = parse_portfolio(csv.as_bytes()).unwrap();
        assert_eq!(unique_tickers(&positions), vec!["YPF".to_string(), "AAPL".to_string()]);
    }

    #[test]
    fn ensure_template_writes_headers_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portfolio.csv");

        assert!(ensure_template(&path).unwrap());
        assert!(!ensure_template(&path).unwrap());

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.trim_end(), "Ticker,Buy Price,Buy Date,Shares");
        assert!(load_portfolio(&path).unwrap().is_empty());
    }

    #[test]
    fn load_portfolio_missing_file_is_io_error() {
        let err = load_portfolio(Path::new("/no/such/portfolio.csv")).unwrap_err();
        assert!(matches!(err, PortfolioError::Io { .. }));
    }
}
