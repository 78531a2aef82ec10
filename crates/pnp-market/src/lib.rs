//! Market-data collaborators: current prices and company-name aliases, both
//! read from the Yahoo Finance chart endpoint.

pub mod aliases;
pub mod client;
pub mod error;
pub mod price;
pub(crate) mod rate_limit;
pub mod types;

pub use aliases::{name_variants, strip_corp_suffix, AliasGenerator};
pub use client::YahooClient;
pub use error::MarketError;
pub use price::{chart_price, PriceLookup};
pub use types::{ChartMeta, ChartResult};
