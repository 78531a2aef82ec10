//! News retrieval and sentiment for portfolio tickers.
//!
//! [`NewsAggregator`] runs a [`PrimaryNewsPipeline`] over every ticker and
//! sends only the tickers it left uncovered to the
//! [`RegionalFallbackFetcher`]. Fallback headlines are scored with the primary
//! backend when it is available, else with [`keyword_score`].

pub mod clock;
pub mod error;
pub mod pipeline;
pub mod primary;
pub mod regional;
pub mod scorer;
pub mod sources;
pub mod types;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{NewsError, Unavailable};
pub use pipeline::NewsAggregator;
pub use primary::{FeedPipeline, PrimaryNewsPipeline, ScoringBackend};
pub use regional::RegionalFallbackFetcher;
pub use scorer::{keyword_score, lexicon_match, lexicon_score};
pub use sources::{
    http_client, FeedEntry, FeedLocale, FeedSearch, GoogleNewsSearch, YahooHeadlines,
};
pub use types::{RawArticle, ScoredArticle};
