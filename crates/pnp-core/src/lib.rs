//! Domain types and pure aggregation logic for pnp.
//!
//! Nothing in this crate touches the network: alias merging, portfolio input
//! parsing, and the profit/loss summary are all functions of their inputs.

pub mod aliases;
pub mod app_config;
pub mod article;
pub mod config;
pub mod portfolio;
pub mod summary;

use thiserror::Error;

pub use aliases::{
    dedupe_keep_order, load_user_aliases, merge_aliases, parse_extra_aliases, AliasSet,
    AliasValue, UserAliases,
};
pub use app_config::{AppConfig, RegionConfig};
pub use article::{lookback_cutoff, within_window, ArticleSet, NewsArticle};
pub use config::{load_app_config, load_app_config_from_env};
pub use portfolio::{
    ensure_template, load_portfolio, parse_portfolio, unique_tickers, PortfolioError,
    PortfolioPosition,
};
pub use summary::{summarize, PortfolioSummary, SummaryRow, TotalRow, TOTAL_LABEL};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
