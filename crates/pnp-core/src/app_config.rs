use std::path::PathBuf;

/// Locale and query settings for the regional fallback news search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionConfig {
    /// `hl` parameter, e.g. `es-419`.
    pub language: String,
    /// `gl` parameter, e.g. `AR`.
    pub country: String,
    /// Clause ANDed to the alias disjunction, e.g. `(Argentina OR .ar)`.
    pub restriction_clause: String,
    /// Source label used when a feed entry carries none.
    pub default_source_label: String,
}

impl RegionConfig {
    /// The `ceid` edition parameter, `{country}:{language}`.
    #[must_use]
    pub fn edition(&self) -> String {
        format!("{}:{}", self.country, self.language)
    }
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            language: "es-419".to_string(),
            country: "AR".to_string(),
            restriction_clause: "(Argentina OR .ar)".to_string(),
            default_source_label: "Google News AR".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub news_backend: String,
    pub news_days: u32,
    pub aliases_path: PathBuf,
    pub regional_fallback: bool,
    pub regional_max_items: usize,
    pub region: RegionConfig,
    pub http_timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_secs: u64,
}
